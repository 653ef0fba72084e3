use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::http::RequestExecutor;
use crate::notify::Notifier;
use crate::parser::RequestSpec;
use crate::runner::types::{
    CheckResult, Delivery, RunSummary, Verdict, compose_message, detect_transition,
};
use crate::status::StatusStore;

/// 告警引擎：并发执行全部请求，与上次状态比较，只在状态变化时通知
pub struct AlertEngine {
    executor: Arc<dyn RequestExecutor>,
    notifier: Option<Arc<dyn Notifier>>,
    recipients: Arc<Vec<String>>,
}

/// 一轮检查内所有任务共享的上下文
struct RunContext {
    executor: Arc<dyn RequestExecutor>,
    notifier: Option<Arc<dyn Notifier>>,
    recipients: Arc<Vec<String>>,
    /// 本轮开始时的状态快照，读取不加锁
    previous: StatusStore,
    /// 本轮写入，只在检测到状态变化时更新
    current: Mutex<StatusStore>,
}

impl AlertEngine {
    /// 创建不发送通知的引擎
    pub fn new(executor: Arc<dyn RequestExecutor>) -> Self {
        Self {
            executor,
            notifier: None,
            recipients: Arc::new(Vec::new()),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>, recipients: Vec<String>) -> Self {
        self.notifier = Some(notifier);
        self.recipients = Arc::new(recipients);
        self
    }

    pub fn can_notify(&self) -> bool {
        self.notifier.is_some() && !self.recipients.is_empty()
    }

    /// 执行一轮检查
    ///
    /// 每个请求一个任务，不限并发；等待全部任务结束后返回更新后的状态。
    /// 单个任务崩溃只记日志，不影响其他检查。
    pub async fn run(
        &self,
        requests: Vec<RequestSpec>,
        store: StatusStore,
    ) -> (StatusStore, RunSummary) {
        let started_at = Utc::now();
        let ctx = Arc::new(RunContext {
            executor: Arc::clone(&self.executor),
            notifier: if self.can_notify() {
                self.notifier.clone()
            } else {
                None
            },
            recipients: Arc::clone(&self.recipients),
            previous: store.clone(),
            current: Mutex::new(store),
        });

        info!(requests = requests.len(), "starting checks");

        let mut tasks = JoinSet::new();
        for (position, spec) in requests.into_iter().enumerate() {
            let ctx = Arc::clone(&ctx);
            tasks.spawn(async move { ctx.check(position, spec).await });
        }

        let mut results = Vec::with_capacity(tasks.len());
        let mut aborted = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => {
                    aborted += 1;
                    error!(error = %e, "check task aborted");
                }
            }
        }

        let store = match Arc::try_unwrap(ctx) {
            Ok(ctx) => ctx.current.into_inner(),
            Err(ctx) => ctx.current.lock().await.clone(),
        };

        let summary = RunSummary::from_results(results, aborted, started_at);
        info!(
            total = summary.total,
            up = summary.up,
            down = summary.down,
            ignored = summary.ignored,
            transitions = summary.transitions,
            "checks finished"
        );
        (store, summary)
    }
}

impl RunContext {
    /// 单个请求：执行 → 判定 → 与上次状态比较 → 通知并更新
    async fn check(&self, position: usize, spec: RequestSpec) -> CheckResult {
        let label = spec.label();

        let (status, body, failure, duration_ms) = match self.executor.execute(&spec).await {
            Ok(outcome) => (
                outcome.status,
                outcome.body,
                None,
                outcome.duration.as_millis() as u64,
            ),
            Err(err) => {
                let message = err.to_string();
                if let Some(pattern) = spec.expected.ignored_by(&message) {
                    info!(position, request = %label, pattern, error = %message, "ignored failed request");
                    let mut result = CheckResult::new(position, &spec, Verdict::Ignored);
                    result.error = Some(message);
                    result.previous = self.previous.get(position);
                    return result;
                }
                warn!(position, request = %label, error = %message, "request failed");
                (0, String::new(), Some(message), 0)
            }
        };

        let up = spec.expected.is_up(status, &body);
        let previous = self.previous.get(position);

        let mut result = CheckResult::new(position, &spec, if up { Verdict::Up } else { Verdict::Down });
        result.status = failure.is_none().then_some(status);
        result.previous = previous;
        result.duration_ms = duration_ms;

        if !detect_transition(previous, up) {
            debug!(position, request = %label, up, "status unchanged");
            result.error = failure;
            return result;
        }

        info!(position, request = %label, ?previous, up, "status transition detected");
        let message = compose_message(&spec, up, failure.as_deref());
        result.transition = true;
        result.delivery = self.notify(&message).await;
        result.error = failure;

        self.current.lock().await.set(position, up);
        result
    }

    /// 发送告警，失败时把消息内容打到日志里兜底
    async fn notify(&self, message: &str) -> Delivery {
        let Some(notifier) = &self.notifier else {
            info!(alert = %message, "notifications disabled, alert not sent");
            return Delivery::Disabled;
        };

        match notifier.send(&self.recipients, message).await {
            Ok(()) => Delivery::Sent,
            Err(e) => {
                error!(channel = notifier.channel_type(), error = %format!("{:#}", e), "send alert error");
                error!("---\n{}\n---", message);
                Delivery::Failed
            }
        }
    }
}
