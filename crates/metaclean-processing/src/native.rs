//! Native engine - strips metadata from JPEG, PNG and WebP without external tools

use crate::engine::{EngineError, MetadataEngine};
use async_trait::async_trait;
use bytes::Bytes;
use img_parts::jpeg::Jpeg;
use img_parts::png::Png;
use img_parts::webp::WebP;
use img_parts::{ImageEXIF, ImageICC};
use std::path::Path;

/// JPEG APP1..APP15 carry EXIF, XMP, ICC, IPTC and vendor blocks. APP0 (JFIF) is kept.
const JPEG_APP1: u8 = 0xE1;
const JPEG_APP15: u8 = 0xEF;
const JPEG_COM: u8 = 0xFE;

/// PNG ancillary chunks that hold metadata rather than pixels or colour rendering hints.
const PNG_METADATA_CHUNKS: [[u8; 4]; 6] = [*b"eXIf", *b"tEXt", *b"zTXt", *b"iTXt", *b"tIME", *b"iCCP"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageKind {
    Jpeg,
    Png,
    WebP,
}

fn sniff(data: &[u8]) -> Option<ImageKind> {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(ImageKind::Jpeg)
    } else if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some(ImageKind::Png)
    } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some(ImageKind::WebP)
    } else {
        None
    }
}

pub struct NativeEngine;

impl NativeEngine {
    /// Remove all metadata from an in-memory image.
    pub fn strip(data: Vec<u8>) -> Result<Vec<u8>, EngineError> {
        let kind = sniff(&data).ok_or_else(|| {
            EngineError::UnsupportedFormat(
                "only JPEG, PNG and WebP files are supported by the native engine".to_string(),
            )
        })?;
        let bytes = Bytes::from(data);

        match kind {
            ImageKind::Jpeg => {
                let mut jpeg = Jpeg::from_bytes(bytes)
                    .map_err(|e| EngineError::Failed(format!("Corrupt JPEG: {}", e)))?;
                jpeg.segments_mut().retain(|segment| {
                    let marker = segment.marker();
                    !((JPEG_APP1..=JPEG_APP15).contains(&marker) || marker == JPEG_COM)
                });
                Ok(jpeg.encoder().bytes().to_vec())
            }
            ImageKind::Png => {
                let mut png = Png::from_bytes(bytes)
                    .map_err(|e| EngineError::Failed(format!("Corrupt PNG: {}", e)))?;
                png.chunks_mut()
                    .retain(|chunk| !PNG_METADATA_CHUNKS.contains(&chunk.kind()));
                Ok(png.encoder().bytes().to_vec())
            }
            ImageKind::WebP => {
                let mut webp = WebP::from_bytes(bytes)
                    .map_err(|e| EngineError::Failed(format!("Corrupt WebP: {}", e)))?;
                webp.set_exif(None);
                webp.set_icc_profile(None);
                Ok(webp.encoder().bytes().to_vec())
            }
        }
    }
}

#[async_trait]
impl MetadataEngine for NativeEngine {
    fn name(&self) -> &'static str {
        "native"
    }

    #[tracing::instrument(skip(self, path), fields(engine = "native"))]
    async fn clear_metadata(&self, path: &Path) -> Result<(), EngineError> {
        let data = tokio::fs::read(path).await?;
        // Parsing and re-encoding is CPU-bound; run off the async pool.
        let cleaned = tokio::task::spawn_blocking(move || NativeEngine::strip(data))
            .await
            .map_err(|e| EngineError::Failed(format!("Native engine task failed: {}", e)))??;
        tokio::fs::write(path, cleaned).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode(format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_pixel(16, 16, Rgb([200, 30, 30]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
        buffer
    }

    fn jpeg_with_exif(exif_len: usize) -> Vec<u8> {
        let mut jpeg = Jpeg::from_bytes(encode(ImageFormat::Jpeg).into()).unwrap();
        let mut exif = b"MM\x00\x2a\x00\x00\x00\x08".to_vec();
        exif.resize(exif_len, 0);
        jpeg.set_exif(Some(exif.into()));
        jpeg.encoder().bytes().to_vec()
    }

    #[test]
    fn test_strip_jpeg_removes_exif() {
        let original = jpeg_with_exif(200);
        let cleaned = NativeEngine::strip(original.clone()).unwrap();

        assert!(cleaned.len() < original.len());
        let jpeg = Jpeg::from_bytes(cleaned.into()).unwrap();
        assert!(jpeg.exif().is_none());
    }

    #[test]
    fn test_strip_jpeg_keeps_decodable_image() {
        let cleaned = NativeEngine::strip(jpeg_with_exif(64)).unwrap();
        let decoded = image::load_from_memory(&cleaned).unwrap();
        assert_eq!(decoded.width(), 16);
    }

    #[test]
    fn test_strip_is_idempotent() {
        let once = NativeEngine::strip(jpeg_with_exif(128)).unwrap();
        let twice = NativeEngine::strip(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_strip_png_removes_text_chunks() {
        let mut png = Png::from_bytes(encode(ImageFormat::Png).into()).unwrap();
        png.set_exif(Some(Bytes::from_static(b"MM\x00\x2a\x00\x00\x00\x08")));
        let original = png.encoder().bytes().to_vec();

        let cleaned = NativeEngine::strip(original.clone()).unwrap();
        assert!(cleaned.len() < original.len());
        let png = Png::from_bytes(cleaned.into()).unwrap();
        assert!(png.exif().is_none());
        assert!(png.chunks().iter().all(|c| &c.kind() != b"eXIf"));
    }

    #[test]
    fn test_strip_rejects_unknown_format() {
        let err = NativeEngine::strip(b"notbase64".to_vec()).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_strip_rejects_truncated_jpeg() {
        let err = NativeEngine::strip(vec![0xFF, 0xD8, 0xFF, 0xE1, 0x00]).unwrap_err();
        assert!(matches!(err, EngineError::Failed(_)));
    }

    #[tokio::test]
    async fn test_clear_metadata_rewrites_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        let original = jpeg_with_exif(200);
        tokio::fs::write(&path, &original).await.unwrap();

        NativeEngine.clear_metadata(&path).await.unwrap();

        let cleaned = tokio::fs::read(&path).await.unwrap();
        assert!(cleaned.len() < original.len());
    }
}
