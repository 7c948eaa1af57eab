use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::{Result, MkvStampError};

/// The fixed ASS document injected into every output file: one style, one
/// dialogue line shown for the first 25 seconds.
const BRANDING_DOCUMENT: &str = r"[Script Info]
Title: Default Google file
ScriptType: v4.00+
WrapStyle: 0
ScaledBorderAndShadow: yes
YCbCr Matrix: None

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial Black,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,-1,-1,0,0,100,100,0,0,1,2,0,2,10,10,10,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Dialogue: 0,0:00:00.00,0:00:25.00,Default,,0,0,0,,{\b1\c&H16EB22&}Downloaded From {\c&HFFAB00&}Google.in{\b0}";

/// Write the branding subtitle document to `output_path`, overwriting any
/// existing file.
pub async fn write_branding_subtitle<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!("Generating subtitle file: {}", output_path.display());

    fs::write(output_path, BRANDING_DOCUMENT)
        .await
        .map_err(MkvStampError::Io)?;

    info!("Subtitle file generated successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_branding_subtitle_creates_ass_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie_new_subtitle.ass");

        write_branding_subtitle(&path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[Script Info]"));
        assert!(content.contains("[V4+ Styles]"));
        assert!(content.contains("Dialogue: 0,0:00:00.00,0:00:25.00,Default"));
    }

    #[tokio::test]
    async fn test_write_branding_subtitle_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie_new_subtitle.ass");
        std::fs::write(&path, "stale content").unwrap();

        write_branding_subtitle(&path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale content"));
        assert!(content.starts_with("[Script Info]"));
    }

    #[tokio::test]
    async fn test_write_branding_subtitle_fails_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("movie_new_subtitle.ass");

        let result = write_branding_subtitle(&path).await;
        assert!(result.is_err());
    }
}
