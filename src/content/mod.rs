pub mod model;
pub mod store;

// Re-export the main types for convenience
pub use model::{Choice, Cloud, CodeIssue, CodeSnippet, Difficulty, Question};
pub use store::ContentStore;
