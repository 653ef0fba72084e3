pub mod client;
pub mod response;

// Re-export commonly used types for convenient access
pub use client::{HttpExecutor, REQUEST_TIMEOUT, RequestExecutor};
pub use response::{ExecError, Outcome};
