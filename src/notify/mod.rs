pub mod email;

pub use email::SmtpNotifier;

use anyhow::Result;
use async_trait::async_trait;

/// 告警邮件主题
pub const ALERT_SUBJECT: &str = "Status Alert";

/// 通知通道：把一段纯文本送达一组收件人
///
/// 发送失败只通过返回值报告，调用方负责记录，不会中断本轮检查。
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipients: &[String], message: &str) -> Result<()>;

    fn channel_type(&self) -> &str;
}
