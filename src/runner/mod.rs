pub mod engine;
pub mod reporter;
pub mod types;

pub use engine::AlertEngine;
pub use reporter::CheckReporter;
pub use types::{CheckResult, Delivery, RunSummary, Verdict};

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::Result;
use crate::http::HttpExecutor;
use crate::notify::SmtpNotifier;
use crate::parser::HttpFileParser;
use crate::status::StatusStore;
use crate::variable::AlertConfig;

/// 完整的一轮检查：解析文档 → 加载状态 → 执行并比较 → 保存状态
///
/// 读取文档或已有状态文件失败会直接返回错误，此时还没有发出任何请求。
pub async fn check_alerts<P, Q>(http_file: P, status_file: Q) -> Result<RunSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let http_file = http_file.as_ref();
    let status_file = status_file.as_ref();

    let document = HttpFileParser::parse_file(http_file)?;
    let store = StatusStore::load(status_file)?;
    info!(
        file = %http_file.display(),
        requests = document.requests.len(),
        warnings = document.warnings.len(),
        "document parsed"
    );

    let engine = build_engine(&document.variables)?;
    let (store, summary) = engine.run(document.requests, store).await;

    store.save(status_file)?;
    Ok(summary)
}

/// 根据文档变量组装引擎，smtp 配置不完整时只检查不通知
pub fn build_engine(vars: &crate::variable::VariableTable) -> Result<AlertEngine> {
    let engine = AlertEngine::new(Arc::new(HttpExecutor::new()?));

    let Some(config) = AlertConfig::from_variables(vars) else {
        return Ok(engine);
    };

    match SmtpNotifier::new(&config.smtp) {
        Ok(notifier) => Ok(engine.with_notifier(Arc::new(notifier), config.recipients)),
        Err(e) => {
            warn!(error = %format!("{:#}", e), "failed to set up smtp notifier, alerts will not be sent");
            Ok(engine)
        }
    }
}
