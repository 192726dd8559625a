use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::domain::AudioFile;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioLoadError {
    #[error("audio file path must not be empty")]
    EmptyPath,
    #[error("failed to read audio file {path}: {message}")]
    Io { path: String, message: String },
}

impl AudioLoadError {
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyPath => "Select an audio file before uploading.".to_string(),
            Self::Io { path, .. } => {
                format!("Could not read '{path}'. Check the file path and permissions.")
            }
        }
    }
}

/// MIME type guessed from the extension, the way a browser tags picked files.
pub fn mime_type_for_path(path: impl AsRef<Path>) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_string()
}

/// Reads the whole file. The MIME type is not checked here; slots decide what they accept.
pub fn load_audio_file(path: impl AsRef<Path>) -> Result<AudioFile, AudioLoadError> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(AudioLoadError::EmptyPath);
    }

    let bytes = fs::read(path).map_err(|error| AudioLoadError::Io {
        path: path.display().to_string(),
        message: error.to_string(),
    })?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| path.display().to_string());

    Ok(AudioFile::new(name, mime_type_for_path(path), bytes))
}
