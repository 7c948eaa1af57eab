use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::ToolsConfig;
use crate::error::{Result, MkvStampError};
use crate::tracks::{parse_identify_json, parse_mkvinfo_text, TrackDescriptor};
use super::{MkvCommandBuilder, MkvToolkit};

/// MKVToolNix-backed toolkit implementation
pub struct MkvToolkitImpl {
    command_builder: MkvCommandBuilder,
}

impl MkvToolkitImpl {
    pub fn new(config: ToolsConfig) -> Self {
        let command_builder = MkvCommandBuilder::new(
            config.mkvmerge_path,
            config.mkvpropedit_path,
            config.mkvinfo_path,
        );

        Self { command_builder }
    }

    fn temp_output_path(output: &Path) -> PathBuf {
        PathBuf::from(format!("{}.tmp.mkv", output.display()))
    }

    async fn identify_tracks(&self, input: &Path) -> Result<Vec<TrackDescriptor>> {
        let stdout = self.command_builder.identify_json(input).execute_capture().await?;
        parse_identify_json(&stdout)
    }

    async fn inspect_tracks_text(&self, input: &Path) -> Result<Vec<TrackDescriptor>> {
        // A clean exit with no track blocks is a valid (empty) listing; the
        // caller simply has nothing to rename.
        let stdout = self.command_builder.info_text(input).execute_capture().await?;
        Ok(parse_mkvinfo_text(&stdout))
    }
}

#[async_trait]
impl MkvToolkit for MkvToolkitImpl {
    async fn add_subtitle_track(
        &self,
        input: &Path,
        output: &Path,
        subtitle: &Path,
        language: &str,
        track_name: &str,
    ) -> Result<()> {
        let temp_output = Self::temp_output_path(output);
        info!(
            "Adding subtitle {} as the last track of {}",
            subtitle.display(),
            output.display()
        );

        let command = self.command_builder.merge_subtitle(
            input,
            subtitle,
            temp_output.as_path(),
            language,
            track_name,
        );

        if let Err(e) = command.execute().await {
            if temp_output.exists() {
                if let Err(cleanup_err) = fs::remove_file(&temp_output).await {
                    warn!(
                        "Failed to remove temporary file {}: {}",
                        temp_output.display(),
                        cleanup_err
                    );
                }
            }
            return Err(e);
        }

        // The merge wrote a complete container; swap it in atomically.
        fs::rename(&temp_output, output).await?;

        info!("Subtitle track added to {}", output.display());
        Ok(())
    }

    async fn set_container_title(&self, target: &Path, title: &str) -> Result<()> {
        info!("Setting container title to '{}' for {}", title, target.display());

        self.command_builder
            .set_container_title(target, title)
            .execute()
            .await
    }

    async fn set_track_name(&self, target: &Path, track_number: u64, name: &str) -> Result<()> {
        info!(
            "Setting name of track {} to '{}' in {}",
            track_number,
            name,
            target.display()
        );

        self.command_builder
            .set_track_name(target, track_number, name)
            .execute()
            .await
    }

    async fn list_tracks(&self, input: &Path) -> Result<Vec<TrackDescriptor>> {
        match self.identify_tracks(input).await {
            Ok(tracks) => Ok(tracks),
            Err(e) => {
                warn!(
                    "JSON identification failed for {} ({}), falling back to text info",
                    input.display(),
                    e
                );
                self.inspect_tracks_text(input).await
            }
        }
    }

    async fn check_availability(&self) -> Result<()> {
        for command in self.command_builder.version_checks() {
            let binary = command.binary_path.clone();
            command.execute().await.map_err(|e| {
                MkvStampError::Config(format!("MKVToolNix binary '{}' not usable: {}", binary, e))
            })?;
            debug!("Binary '{}' is available", binary);
        }

        info!("All MKVToolNix binaries are available");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_output_path_is_adjacent_to_output() {
        let temp = MkvToolkitImpl::temp_output_path(Path::new("/out/movie.mkv"));
        assert_eq!(temp, PathBuf::from("/out/movie.mkv.tmp.mkv"));
    }

    #[tokio::test]
    async fn test_add_subtitle_track_failure_leaves_no_temp_residue() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.mkv");
        let output = dir.path().join("out.mkv");
        let subtitle = dir.path().join("sub.ass");
        std::fs::write(&input, "container").unwrap();
        std::fs::write(&output, "copy").unwrap();
        std::fs::write(&subtitle, "ass").unwrap();

        // Point at a binary that cannot exist so the merge fails to spawn.
        let toolkit = MkvToolkitImpl::new(ToolsConfig {
            mkvmerge_path: dir.path().join("no-such-mkvmerge").display().to_string(),
            mkvpropedit_path: "mkvpropedit".to_string(),
            mkvinfo_path: "mkvinfo".to_string(),
        });

        let result = toolkit
            .add_subtitle_track(&input, &output, &subtitle, "eng", "Google Subtitle")
            .await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "copy");
        assert!(!MkvToolkitImpl::temp_output_path(&output).exists());
    }

    #[tokio::test]
    async fn test_check_availability_reports_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let toolkit = MkvToolkitImpl::new(ToolsConfig {
            mkvmerge_path: dir.path().join("no-such-mkvmerge").display().to_string(),
            mkvpropedit_path: "mkvpropedit".to_string(),
            mkvinfo_path: "mkvinfo".to_string(),
        });

        let result = toolkit.check_availability().await;
        assert!(matches!(result, Err(MkvStampError::Config(_))));
    }
}
