pub mod expectation;
pub mod http_file;
pub mod types;

// Re-export commonly used types
pub use expectation::parse_expectation;
pub use http_file::HttpFileParser;
pub use types::{
    Expectation, ParseError, ParseResult, ParseWarning, ParsedDocument, RequestSpec,
};
