pub mod format;
pub mod settings;
