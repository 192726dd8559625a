use std::fmt;
use std::sync::Arc;

use serde::Serialize;

const AUDIO_MIME_PREFIX: &str = "audio/";
const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

pub fn has_audio_mime_type(mime_type: &str) -> bool {
    mime_type.starts_with(AUDIO_MIME_PREFIX)
}

/// Audio content attached to a form slot. Cloning shares the bytes.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AudioFile {
    name: String,
    mime_type: String,
    size_bytes: u64,
    #[serde(skip)]
    bytes: Arc<[u8]>,
}

impl AudioFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size_bytes = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn has_audio_mime_type(&self) -> bool {
        has_audio_mime_type(&self.mime_type)
    }

    pub fn size_label(&self) -> String {
        format!("{:.1} MB", self.size_bytes as f64 / BYTES_PER_MIB)
    }
}

impl fmt::Debug for AudioFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.size_bytes)
            .finish()
    }
}
