use crate::variable::types::VariableTable;
use tracing::warn;

/// SMTP 主机变量名
pub const SMTP_HOST: &str = "smtpHost";
/// SMTP 端口变量名
pub const SMTP_PORT: &str = "smtpPort";
/// SMTP 用户变量名（同时作为发件人地址）
pub const SMTP_USER: &str = "smtpUser";
/// SMTP 密码变量名
pub const SMTP_PASS: &str = "smtpPass";
/// 告警收件人变量名（逗号分隔）
pub const ALERT_EMAILS: &str = "alertEmails";

/// SMTP 连接配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
}

/// 告警配置：SMTP 连接 + 收件人列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertConfig {
    pub smtp: SmtpConfig,
    pub recipients: Vec<String>,
}

impl AlertConfig {
    /// 从文档变量表中读取告警配置
    ///
    /// 四个 smtp 变量和至少一个收件人缺一不可，否则返回 None，
    /// 调用方照常执行检查，只是不发送通知。
    pub fn from_variables(vars: &VariableTable) -> Option<Self> {
        let missing: Vec<&str> = [SMTP_HOST, SMTP_PORT, SMTP_USER, SMTP_PASS]
            .into_iter()
            .filter(|key| vars.get_non_empty(key).is_none())
            .collect();
        if !missing.is_empty() {
            warn!(missing = ?missing, "smtp config is incomplete, alerts will not be sent");
            return None;
        }

        let raw_port = vars.get_non_empty(SMTP_PORT)?;
        let port = match raw_port.parse::<u16>() {
            Ok(port) => port,
            Err(e) => {
                warn!(port = raw_port, error = %e, "invalid smtpPort, alerts will not be sent");
                return None;
            }
        };

        let recipients = Self::split_recipients(vars.get(ALERT_EMAILS).unwrap_or_default());
        if recipients.is_empty() {
            warn!("alertEmails is missing, alerts will not be sent");
            return None;
        }

        Some(Self {
            smtp: SmtpConfig {
                host: vars.get_non_empty(SMTP_HOST)?.to_string(),
                port,
                user: vars.get_non_empty(SMTP_USER)?.to_string(),
                pass: vars.get_non_empty(SMTP_PASS)?.to_string(),
            },
            recipients,
        })
    }

    /// 按逗号切分收件人，去掉空白和空项
    pub fn split_recipients(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}
