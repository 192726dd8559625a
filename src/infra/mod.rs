pub mod audio;
pub mod env;
pub mod webhook;
