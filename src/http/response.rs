use std::error::Error as StdError;
use std::time::Duration;

/// 单次请求的成功结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: u16,
    pub body: String, // 完整响应体文本
    pub duration: Duration,
}

impl Outcome {
    pub fn new(status: u16, body: impl Into<String>, duration: Duration) -> Self {
        Self {
            status,
            body: body.into(),
            duration,
        }
    }
}

/// 请求执行失败
///
/// 两种失败对调用方是同一类结果，区分只为日志可读。
/// Display 输出会被拿去与 ignore 子串匹配。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    /// 请求本身无法构造（方法、URL、header 非法）
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// DNS、连接、超时、读取响应体等传输错误
    #[error("request failed: {0}")]
    Transport(String),
}

impl ExecError {
    pub fn transport(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timeout: "
        } else if err.is_connect() {
            "connect: "
        } else if err.is_body() || err.is_decode() {
            "body: "
        } else {
            ""
        };
        ExecError::Transport(format!("{}{}", kind, error_chain(err)))
    }
}

/// 拼接错误及其全部 source，reqwest 的顶层消息往往不含根因
pub fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}
