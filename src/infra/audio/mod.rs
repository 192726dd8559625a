mod loader;

pub use loader::{AudioLoadError, load_audio_file, mime_type_for_path};
