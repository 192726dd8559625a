use std::path::{Path, PathBuf};

use shortgen::domain::{AudioFile, SubmissionPayload, has_audio_mime_type};
use shortgen::infra::audio::{AudioLoadError, load_audio_file, mime_type_for_path};
use tracing::info;

use super::DEBUG_PROMPT_PREVIEW_CHARS;

pub(super) fn log_submission(payload: &SubmissionPayload, include_prompt_preview: bool) {
    let prompt_chars = payload.prompt.chars().count();
    if include_prompt_preview {
        let preview = prompt_preview(&payload.prompt, DEBUG_PROMPT_PREVIEW_CHARS);
        info!(
            cta = payload.cta.name(),
            bgm = payload.bgm.name(),
            prompt_chars,
            prompt_preview = ?preview,
            "submitting to webhook"
        );
    } else {
        info!(
            cta = payload.cta.name(),
            bgm = payload.bgm.name(),
            prompt_chars,
            "submitting to webhook"
        );
    }
}

pub(super) fn prompt_preview(prompt: &str, max_chars: usize) -> String {
    let mut chars = prompt.chars();
    let mut preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        preview.push_str("...");
    }
    preview
}

/// Describes every dropped path but only reads the first audio candidate from disk;
/// the rest are never stored.
pub(super) fn dropped_audio_files(paths: &[PathBuf]) -> Result<Vec<AudioFile>, AudioLoadError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let mime_type = mime_type_for_path(path);
        if has_audio_mime_type(&mime_type) {
            files.push(load_audio_file(path)?);
            break;
        }
        files.push(AudioFile::new(
            display_file_name(path),
            mime_type,
            Vec::new(),
        ));
    }
    Ok(files)
}

pub(super) fn display_file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| path.display().to_string())
}
