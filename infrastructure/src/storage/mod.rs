//! State store adapters.
//!
//! Both stores hold the same [`StoreState`] document; the file-backed one
//! rewrites it after every mutation.

mod json_file;
mod memory;
mod state;

pub use json_file::JsonFileStateStore;
pub use memory::InMemoryStateStore;
pub use state::StoreState;
