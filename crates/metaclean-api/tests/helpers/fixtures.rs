//! Test fixtures: images carrying metadata.

use image::{ImageFormat, Rgb, RgbImage};
use img_parts::jpeg::Jpeg;
use img_parts::png::Png;
use img_parts::ImageEXIF;
use std::io::Cursor;

fn encode(format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(32, 32, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 128]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture image");
    buffer
}

/// Big-endian TIFF header padded to `len` bytes, standing in for an EXIF block.
fn exif_block(len: usize) -> Vec<u8> {
    let mut exif = b"MM\x00\x2a\x00\x00\x00\x08".to_vec();
    exif.resize(len.max(8), 0);
    exif
}

/// JPEG with an EXIF (APP1) segment of `exif_len` bytes.
pub fn jpeg_with_exif(exif_len: usize) -> Vec<u8> {
    let mut jpeg = Jpeg::from_bytes(encode(ImageFormat::Jpeg).into()).expect("Invalid JPEG");
    jpeg.set_exif(Some(exif_block(exif_len).into()));
    jpeg.encoder().bytes().to_vec()
}

/// PNG with an eXIf chunk of `exif_len` bytes.
pub fn png_with_exif(exif_len: usize) -> Vec<u8> {
    let mut png = Png::from_bytes(encode(ImageFormat::Png).into()).expect("Invalid PNG");
    png.set_exif(Some(exif_block(exif_len).into()));
    png.encoder().bytes().to_vec()
}

/// True if the JPEG still carries an EXIF segment.
pub fn jpeg_has_exif(data: &[u8]) -> bool {
    Jpeg::from_bytes(data.to_vec().into())
        .expect("Invalid JPEG")
        .exif()
        .is_some()
}
