// MKVToolNix invocation layer
//
// This module wraps the three external binaries behind one trait:
// - Commands: argument assembly and subprocess execution
// - Toolkit: the MKVToolNix-backed implementation

pub mod commands;
pub mod toolkit;

use async_trait::async_trait;
use std::path::Path;

pub use commands::*;
pub use toolkit::*;

use crate::config::ToolsConfig;
use crate::error::Result;
use crate::tracks::TrackDescriptor;

/// Main trait for MKV container mutation and inspection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MkvToolkit: Send + Sync {
    /// Append a subtitle file as the last track of `input`, atomically
    /// replacing `output` on success. On failure `output` is left untouched.
    async fn add_subtitle_track(
        &self,
        input: &Path,
        output: &Path,
        subtitle: &Path,
        language: &str,
        track_name: &str,
    ) -> Result<()>;

    /// Set the container-level title of `target`
    async fn set_container_title(&self, target: &Path, title: &str) -> Result<()>;

    /// Set the display name of track `track_number` (1-based) in `target`
    async fn set_track_name(&self, target: &Path, track_number: u64, name: &str) -> Result<()>;

    /// List the tracks of `input` as (number, type) descriptors
    async fn list_tracks(&self, input: &Path) -> Result<Vec<TrackDescriptor>>;

    /// Check that all configured binaries respond to a version probe
    async fn check_availability(&self) -> Result<()>;
}

/// Factory for creating toolkit instances
pub struct MkvToolkitFactory;

impl MkvToolkitFactory {
    /// Create the default MKVToolNix-backed toolkit
    pub fn create_toolkit(config: ToolsConfig) -> Box<dyn MkvToolkit> {
        Box::new(toolkit::MkvToolkitImpl::new(config))
    }
}
