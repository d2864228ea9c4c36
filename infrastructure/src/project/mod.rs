//! Project definition files.

mod loader;

pub use loader::{ProjectLoadError, load_project};
