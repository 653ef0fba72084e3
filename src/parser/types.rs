use std::collections::HashMap;
use std::path::PathBuf;

use crate::variable::VariableTable;

/// 未指定时期望的状态码
pub const DEFAULT_EXPECTED_STATUS: u16 = 200;

/// 单个请求的期望结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    /// 期望状态码，0 表示不检查
    pub status: u16,

    /// 响应体需包含的子串，空串表示不检查
    pub body: String,

    /// 可忽略的错误子串，错误信息包含其中任一项即不告警
    pub ignore: Vec<String>,
}

impl Default for Expectation {
    fn default() -> Self {
        Self {
            status: DEFAULT_EXPECTED_STATUS,
            body: String::new(),
            ignore: Vec::new(),
        }
    }
}

impl Expectation {
    pub fn matches_status(&self, actual: u16) -> bool {
        self.status == 0 || self.status == actual
    }

    pub fn matches_body(&self, actual: &str) -> bool {
        self.body.is_empty() || actual.contains(&self.body)
    }

    /// 状态码和响应体同时满足才算 up
    pub fn is_up(&self, status: u16, body: &str) -> bool {
        self.matches_status(status) && self.matches_body(body)
    }

    /// 返回命中的 ignore 子串（如果有）
    pub fn ignored_by(&self, error_message: &str) -> Option<&str> {
        self.ignore
            .iter()
            .map(String::as_str)
            .find(|pattern| error_message.contains(pattern))
    }
}

/// 单个解析后的请求定义
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestSpec {
    /// HTTP 方法，原样保留
    pub method: String,

    /// 变量替换后的 URL
    pub url: String,

    /// Headers，同名后写覆盖
    pub headers: HashMap<String, String>,

    /// 请求体，可以为空
    pub body: String,

    pub expected: Expectation,

    /// `###` 分隔行所在行号（从 1 开始）
    pub line_number: usize,
}

impl RequestSpec {
    pub fn new(line_number: usize) -> Self {
        Self {
            line_number,
            ..Default::default()
        }
    }

    /// 用于日志和告警消息的 "METHOD URL"
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

/// 解析过程中可恢复的问题，对应行的效果被跳过
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}

/// 整个文档的解析结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    /// 按文档顺序排列的请求，下标即状态存储中的位置
    pub requests: Vec<RequestSpec>,

    /// 扫描结束时的变量表
    pub variables: VariableTable,

    pub warnings: Vec<ParseWarning>,

    /// 源文件路径（用于日志）
    pub source_path: Option<PathBuf>,
}

impl ParsedDocument {
    pub fn with_source_path(mut self, path: PathBuf) -> Self {
        self.source_path = Some(path);
        self
    }
}

/// 解析错误类型，只有读取文档失败是致命的
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 解析结果类型别名
pub type ParseResult<T> = Result<T, ParseError>;
