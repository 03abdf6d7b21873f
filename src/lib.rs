// Library surface for the binary and for headless/integration tests.
// Terminal rendering stays in main.rs and ui/.
pub mod app_dirs;
pub mod availability;
pub mod clock;
pub mod config;
pub mod content;
pub mod countdown;
pub mod error;
pub mod runtime;
pub mod scoring;
pub mod selection;
pub mod session;
pub mod settings;

pub use error::{ContentError, SessionError, ValidationError};
pub use session::{Interview, Phase};
