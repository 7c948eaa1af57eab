use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, MkvStampError};

/// Abstract MKVToolNix command representation
#[derive(Debug, Clone)]
pub struct MkvCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl MkvCommand {
    /// Create a new MKVToolNix command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add a path argument
    pub fn path_arg<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Execute the command, requiring a clean exit
    pub async fn execute(&self) -> Result<()> {
        self.run().await.map(|_| ())
    }

    /// Execute the command and return its captured stdout
    pub async fn execute_capture(&self) -> Result<String> {
        self.run().await
    }

    async fn run(&self) -> Result<String> {
        debug!("Executing MKVToolNix command: {} {:?}", self.binary_path, self.args);
        debug!("Description: {}", self.description);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| {
                MkvStampError::Tool(format!("Failed to execute {}: {}", self.binary_path, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(MkvStampError::Tool(format!(
                "{} failed (exit {:?}): {}{}",
                self.description,
                output.status.code(),
                stdout.trim(),
                stderr.trim(),
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Builder for the MKVToolNix invocations the pipeline needs
pub struct MkvCommandBuilder {
    mkvmerge_path: String,
    mkvpropedit_path: String,
    mkvinfo_path: String,
}

impl MkvCommandBuilder {
    pub fn new<S1, S2, S3>(mkvmerge_path: S1, mkvpropedit_path: S2, mkvinfo_path: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self {
            mkvmerge_path: mkvmerge_path.into(),
            mkvpropedit_path: mkvpropedit_path.into(),
            mkvinfo_path: mkvinfo_path.into(),
        }
    }

    /// Build the merge command that appends a subtitle track to a container.
    /// The `--language`/`--track-name` options apply to track 0 of the next
    /// input, which is the subtitle file.
    pub fn merge_subtitle<P: AsRef<Path>>(
        &self,
        input: P,
        subtitle: P,
        temp_output: P,
        language: &str,
        track_name: &str,
    ) -> MkvCommand {
        MkvCommand::new(&self.mkvmerge_path, "Subtitle track merge")
            .arg("-o")
            .path_arg(temp_output)
            .path_arg(input)
            .arg("--language")
            .arg(format!("0:{}", language))
            .arg("--track-name")
            .arg(format!("0:{}", track_name))
            .path_arg(subtitle)
    }

    /// Build the property edit that sets the container-level title
    pub fn set_container_title<P: AsRef<Path>>(&self, target: P, title: &str) -> MkvCommand {
        MkvCommand::new(&self.mkvpropedit_path, "Container title edit")
            .path_arg(target)
            .arg("--edit")
            .arg("info")
            .arg("--set")
            .arg(format!("title={}", title))
    }

    /// Build the property edit that sets one track's display name
    pub fn set_track_name<P: AsRef<Path>>(
        &self,
        target: P,
        track_number: u64,
        name: &str,
    ) -> MkvCommand {
        MkvCommand::new(&self.mkvpropedit_path, "Track name edit")
            .path_arg(target)
            .arg("--edit")
            .arg(format!("track:{}", track_number))
            .arg("--set")
            .arg(format!("name={}", name))
    }

    /// Build the machine-readable identify command (JSON output on stdout)
    pub fn identify_json<P: AsRef<Path>>(&self, input: P) -> MkvCommand {
        MkvCommand::new(&self.mkvmerge_path, "Track identification")
            .arg("--identification-format")
            .arg("json")
            .arg("--identify")
            .path_arg(input)
    }

    /// Build the text info command (fallback track listing)
    pub fn info_text<P: AsRef<Path>>(&self, input: P) -> MkvCommand {
        MkvCommand::new(&self.mkvinfo_path, "Track info dump").path_arg(input)
    }

    /// Build version checks for all three binaries
    pub fn version_checks(&self) -> Vec<MkvCommand> {
        [
            &self.mkvmerge_path,
            &self.mkvpropedit_path,
            &self.mkvinfo_path,
        ]
        .into_iter()
        .map(|binary| MkvCommand::new(binary, "Version check").arg("--version"))
        .collect()
    }
}
