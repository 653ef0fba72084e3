use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::Result;
use crate::http::response::{ExecError, Outcome};
use crate::parser::RequestSpec;

/// 单个请求的固定超时
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// 请求执行器：执行一个请求定义，返回状态码和响应体
///
/// 只尝试一次，不做重试。
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, spec: &RequestSpec) -> std::result::Result<Outcome, ExecError>;
}

/// 基于 reqwest 的执行器
#[derive(Clone)]
pub struct HttpExecutor {
    inner: reqwest::Client,
}

impl HttpExecutor {
    pub fn new() -> Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self {
            inner: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    /// 把请求定义转换为 reqwest 请求
    fn build(&self, spec: &RequestSpec) -> std::result::Result<reqwest::Request, ExecError> {
        let method = reqwest::Method::from_bytes(spec.method.as_bytes())
            .map_err(|_| ExecError::InvalidRequest(format!("invalid method '{}'", spec.method)))?;
        let url = url::Url::parse(&spec.url)
            .map_err(|e| ExecError::InvalidRequest(format!("invalid url '{}': {}", spec.url, e)))?;

        // 文档中的 header 名不做 trim，发送前再处理
        let mut headers = HeaderMap::new();
        for (name, value) in &spec.headers {
            let header_name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|e| {
                ExecError::InvalidRequest(format!("invalid header name '{}': {}", name, e))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                ExecError::InvalidRequest(format!("invalid header value for '{}': {}", name, e))
            })?;
            headers.insert(header_name, header_value);
        }

        let mut req = self.inner.request(method, url).headers(headers);
        if !spec.body.is_empty() {
            req = req.body(spec.body.clone());
        }

        req.build()
            .map_err(|e| ExecError::InvalidRequest(crate::http::response::error_chain(&e)))
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, spec: &RequestSpec) -> std::result::Result<Outcome, ExecError> {
        let request = self.build(spec)?;

        let start = Instant::now();
        let response = self
            .inner
            .execute(request)
            .await
            .map_err(|e| ExecError::transport(&e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| ExecError::transport(&e))?;
        let duration = start.elapsed();

        debug!(request = %spec.label(), status, elapsed_ms = duration.as_millis() as u64, "request completed");
        Ok(Outcome::new(status, body, duration))
    }
}
