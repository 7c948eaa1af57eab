use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Result, MkvStampError};
use crate::fsops::{remove_with_sync, unique_destination};
use crate::mkv::{MkvToolkit, MkvToolkitFactory};
use crate::subtitle::write_branding_subtitle;
use crate::tracks::TrackDescriptor;

/// Last stage a file reached before the pipeline finished or abandoned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Copied,
    Subtitled,
    Retitled,
    TrackNamed,
    SourceDeleted,
}

/// Per-batch result counters
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

pub struct Pipeline {
    config: Config,
    toolkit: Box<dyn MkvToolkit>,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let toolkit = MkvToolkitFactory::create_toolkit(config.tools.clone());

        Self { config, toolkit }
    }

    #[cfg(test)]
    pub(crate) fn with_toolkit(config: Config, toolkit: Box<dyn MkvToolkit>) -> Self {
        Self { config, toolkit }
    }

    /// Verify that the configured MKVToolNix binaries are usable
    pub async fn check_tools(&self) -> Result<()> {
        self.toolkit.check_availability().await
    }

    /// List the tracks of a single file
    pub async fn list_tracks(&self, input: &Path) -> Result<Vec<TrackDescriptor>> {
        if !input.exists() {
            return Err(MkvStampError::FileNotFound(input.display().to_string()));
        }

        self.toolkit.list_tracks(input).await
    }

    /// Process a single MKV file into `output_dir`
    pub async fn process_single_file(&self, input: &Path, output_dir: &Path) -> Result<Stage> {
        info!("Processing single file: {}", input.display());

        if !input.exists() {
            return Err(MkvStampError::FileNotFound(input.display().to_string()));
        }

        fs::create_dir_all(output_dir).await?;

        self.process_file(input, output_dir).await
    }

    /// Process every matching file of `input_dir` into `output_dir`.
    ///
    /// Per-file failures are logged and counted; the batch always runs to
    /// completion.
    pub async fn process_directory(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchSummary> {
        info!("Processing directory: {}", input_dir.display());

        if !input_dir.is_dir() {
            return Err(MkvStampError::Config(
                "Input path is not a directory".to_string(),
            ));
        }

        fs::create_dir_all(output_dir).await?;

        let mut container_files: Vec<PathBuf> = WalkDir::new(input_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| {
                        ext.eq_ignore_ascii_case(&self.config.batch.extension)
                    })
            })
            .map(|entry| entry.path().to_path_buf())
            .collect();
        container_files.sort();

        info!("Found {} container files to process", container_files.len());

        let progress = ProgressBar::new(container_files.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut summary = BatchSummary::default();
        for container_path in container_files {
            progress.set_message(
                container_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );

            match self.process_file(&container_path, output_dir).await {
                Ok(stage) => {
                    info!(
                        "Successfully processed {} (reached {:?})",
                        container_path.display(),
                        stage
                    );
                    summary.processed += 1;
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", container_path.display(), e);
                    summary.failed += 1;
                }
            }

            progress.inc(1);
        }

        progress.finish_with_message("batch complete");
        Ok(summary)
    }

    /// Run one file through the stage machine
    /// Copied -> Subtitled -> Retitled -> TrackNamed -> SourceDeleted.
    ///
    /// Copy, title, and inspection failures abandon the file; subtitle and
    /// per-track failures only skip their own step.
    async fn process_file(&self, input: &Path, output_dir: &Path) -> Result<Stage> {
        let file_name = input
            .file_name()
            .ok_or_else(|| MkvStampError::Config("Invalid container filename".to_string()))?
            .to_string_lossy();
        let file_stem = input
            .file_stem()
            .ok_or_else(|| MkvStampError::Config("Invalid container filename".to_string()))?
            .to_string_lossy();

        let destination = unique_destination(output_dir, &file_name);

        info!("Copying {} to {}", input.display(), destination.display());
        fs::copy(input, &destination).await?;
        let mut stage = Stage::Copied;

        // Inject the generated subtitle; the destination stays a plain copy
        // if either generation or injection fails.
        let subtitle_path = output_dir.join(format!("{}_new_subtitle.ass", file_stem));
        match write_branding_subtitle(&subtitle_path).await {
            Ok(()) => {
                match self
                    .toolkit
                    .add_subtitle_track(
                        input,
                        &destination,
                        &subtitle_path,
                        &self.config.branding.subtitle_language,
                        &self.config.branding.subtitle_track_name,
                    )
                    .await
                {
                    Ok(()) => stage = Stage::Subtitled,
                    Err(e) => warn!(
                        "Failed to add subtitle track to {}: {}",
                        destination.display(),
                        e
                    ),
                }

                // The asset is transient either way.
                remove_with_sync(&subtitle_path, self.config.batch.sync_after_delete).await;
            }
            Err(e) => warn!(
                "Failed to generate subtitle file {}, skipping injection: {}",
                subtitle_path.display(),
                e
            ),
        }

        if let Err(e) = self
            .toolkit
            .set_container_title(&destination, &self.config.branding.container_title)
            .await
        {
            warn!(
                "Abandoning {} after {:?}: {}",
                destination.display(),
                stage,
                e
            );
            return Err(e);
        }
        stage = Stage::Retitled;

        // Track numbering is read from the source; the injected subtitle
        // track deliberately keeps its merge-time name.
        let tracks = match self.toolkit.list_tracks(input).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(
                    "Abandoning {} after {:?}: {}",
                    destination.display(),
                    stage,
                    e
                );
                return Err(e);
            }
        };

        for track in tracks.iter().filter(|t| t.track_type.is_recognized()) {
            if let Err(e) = self
                .toolkit
                .set_track_name(&destination, track.number, &self.config.branding.track_label)
                .await
            {
                warn!(
                    "Failed to set name of {} track {} in {}: {}",
                    track.track_type,
                    track.number,
                    destination.display(),
                    e
                );
            }
        }
        stage = Stage::TrackNamed;

        if self.config.batch.delete_source {
            remove_with_sync(input, self.config.batch.sync_after_delete).await;
            stage = Stage::SourceDeleted;
        }

        info!("Done with {}", destination.display());
        Ok(stage)
    }
}
