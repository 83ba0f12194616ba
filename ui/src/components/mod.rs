pub mod describe;
mod file_loader;
pub mod icons;

pub use file_loader::{FileLoader, PickedFile};
