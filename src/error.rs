use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuprobeError {
    #[error("HTTP 客户端初始化失败: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<crate::parser::ParseError> for RuprobeError {
    fn from(err: crate::parser::ParseError) -> Self {
        match err {
            crate::parser::ParseError::Io(e) => RuprobeError::IoError(e),
        }
    }
}

/// Result type for ruprobe crate
pub type Result<T> = std::result::Result<T, RuprobeError>;
