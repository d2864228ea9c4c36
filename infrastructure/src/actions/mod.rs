//! Domain action executors.

mod github;
mod research;

pub use github::GitHubActionExecutor;
pub use research::ResearchActionExecutor;
