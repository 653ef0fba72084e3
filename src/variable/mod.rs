pub mod config;
pub mod resolver;
pub mod types;

pub use config::{AlertConfig, SmtpConfig};
pub use resolver::VariableResolver;
pub use types::VariableTable;
