pub mod task;
pub mod project;
pub mod session;
pub mod config;

pub use task::*;
pub use project::*;
pub use session::*;
pub use config::*;
