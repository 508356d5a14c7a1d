use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Metadata rewrite engine implementations
///
/// Defined in core because it is part of the configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// External `exiftool` process, one per request
    ExifTool,
    /// In-process JPEG/PNG/WebP stripper
    Native,
}

impl FromStr for EngineKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exiftool" => Ok(EngineKind::ExifTool),
            "native" => Ok(EngineKind::Native),
            _ => Err(anyhow::anyhow!("Invalid metadata engine: {}", s)),
        }
    }
}

impl Display for EngineKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            EngineKind::ExifTool => write!(f, "exiftool"),
            EngineKind::Native => write!(f, "native"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_engine_kind() {
        assert_eq!("exiftool".parse::<EngineKind>().unwrap(), EngineKind::ExifTool);
        assert_eq!(" Native ".parse::<EngineKind>().unwrap(), EngineKind::Native);
        assert!("ffmpeg".parse::<EngineKind>().is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        for kind in [EngineKind::ExifTool, EngineKind::Native] {
            assert_eq!(kind.to_string().parse::<EngineKind>().unwrap(), kind);
        }
    }
}
