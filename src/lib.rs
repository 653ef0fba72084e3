pub mod error;
pub mod http;
pub mod logger;
pub mod notify;
pub mod parser;
pub mod runner;
pub mod status;
pub mod variable;

// Re-export commonly used types
pub use error::{Result, RuprobeError};
pub use runner::check_alerts;
