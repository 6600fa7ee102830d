pub mod entry;
pub mod translation;
