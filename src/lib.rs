pub mod action;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod format;
pub mod scanner;
pub mod server;
pub mod targets;
pub mod throttle;
pub mod walk;

pub use action::{Action, ActionResponse};
pub use cleaner::CleanResult;
pub use config::Config;
pub use error::{ActionError, WalkError};
pub use scanner::ScanResult;
pub use targets::Targets;
pub use throttle::Throttle;
