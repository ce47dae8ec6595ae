use std::path::PathBuf;

use thiserror::Error;

use crate::provision::ConfigArtifact;

pub type Result<T> = std::result::Result<T, WifiModeError>;

#[derive(Error, Debug)]
pub enum WifiModeError {
    #[error("Probe '{probe}' failed: {source}")]
    Probe {
        probe: String,
        #[source]
        source: CommandError,
    },

    #[error("Failed to read template for {artifact} from {}: {source}", .path.display())]
    TemplateRead {
        artifact: ConfigArtifact,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render template for {artifact}: {source}")]
    TemplateRender {
        artifact: ConfigArtifact,
        #[source]
        source: tera::Error,
    },

    #[error("Failed to write {artifact} to {}: {source}", .path.display())]
    FileWrite {
        artifact: ConfigArtifact,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not supported yet: {0}")]
    NotSupported(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl WifiModeError {
    /// Name of the probe or artifact that failed, if the error belongs to a stage.
    pub fn stage(&self) -> Option<&str> {
        match self {
            WifiModeError::Probe { probe, .. } => Some(probe.as_str()),
            WifiModeError::TemplateRead { artifact, .. }
            | WifiModeError::TemplateRender { artifact, .. }
            | WifiModeError::FileWrite { artifact, .. } => Some(artifact.name()),
            WifiModeError::NotSupported(_) | WifiModeError::Config(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("command not found: {0}")]
    NotFound(String),

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("exited with status {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    #[error("timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}
