use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::parser::RequestSpec;

/// 单个检查的判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Up,
    Down,
    /// 请求失败但命中 ignore 列表，不参与状态比较
    Ignored,
}

/// 状态变化时通知的投递情况
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    /// 没有状态变化，无需通知
    None,
    Sent,
    Failed,
    /// 缺少 smtp 配置或收件人
    Disabled,
}

/// 单个请求的检查结果
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// 请求在文档中的位置（从 0 开始）
    pub position: usize,

    pub method: String,

    pub url: String,

    pub verdict: Verdict,

    /// 实际状态码，请求失败时为 None
    pub status: Option<u16>,

    /// 请求失败的错误信息
    pub error: Option<String>,

    /// 本轮开始时记录的状态
    pub previous: Option<bool>,

    pub transition: bool,

    pub delivery: Delivery,

    pub duration_ms: u64,
}

impl CheckResult {
    pub fn new(position: usize, spec: &RequestSpec, verdict: Verdict) -> Self {
        Self {
            position,
            method: spec.method.clone(),
            url: spec.url.clone(),
            verdict,
            status: None,
            error: None,
            previous: None,
            transition: false,
            delivery: Delivery::None,
            duration_ms: 0,
        }
    }

    pub fn is_up(&self) -> bool {
        self.verdict == Verdict::Up
    }
}

/// 判断是否发生状态变化
///
/// 已有记录时比较前后状态；首次观测时只有 down 算变化，
/// 首次观测为 up 是正常基线，不告警也不写入状态。
pub fn detect_transition(previous: Option<bool>, up: bool) -> bool {
    match previous {
        Some(prev) => prev != up,
        None => !up,
    }
}

/// 组装告警消息，失败时附带错误详情
pub fn compose_message(spec: &RequestSpec, up: bool, error: Option<&str>) -> String {
    let mut message = spec.label();
    if up {
        message.push_str(" is up");
    } else {
        message.push_str(" is down");
        if let Some(error) = error {
            message.push_str("\n - ");
            message.push_str(error);
        }
    }
    message
}

/// 一轮检查的汇总
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub up: usize,
    pub down: usize,
    pub ignored: usize,
    pub transitions: usize,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
    /// 崩溃的检查任务数量
    pub aborted: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// 按文档顺序排列
    pub results: Vec<CheckResult>,
}

impl RunSummary {
    pub fn from_results(
        mut results: Vec<CheckResult>,
        aborted: usize,
        started_at: DateTime<Utc>,
    ) -> Self {
        results.sort_by_key(|r| r.position);

        let count = |pred: fn(&CheckResult) -> bool| results.iter().filter(|r| pred(r)).count();
        let up = count(|r| r.verdict == Verdict::Up);
        let down = count(|r| r.verdict == Verdict::Down);
        let ignored = count(|r| r.verdict == Verdict::Ignored);
        let transitions = count(|r| r.transition);
        let notifications_sent = count(|r| r.delivery == Delivery::Sent);
        let notifications_failed = count(|r| r.delivery == Delivery::Failed);

        Self {
            total: results.len() + aborted,
            up,
            down,
            ignored,
            transitions,
            notifications_sent,
            notifications_failed,
            aborted,
            started_at,
            finished_at: Utc::now(),
            results,
        }
    }
}
