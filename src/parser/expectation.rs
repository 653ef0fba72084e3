use crate::parser::types::Expectation;

/// 解析 `###` 后面的期望指令
///
/// 指令是 URL 编码的查询串，例如 `status=404&body=OK&ignore=timeout,refused`。
/// 同一个 key 出现多次时取第一个值，未知 key 忽略。
/// 出错时返回错误描述，调用方保留默认期望。
pub fn parse_expectation(directive: &str) -> Result<Expectation, String> {
    check_escapes(directive)?;

    let mut expected = Expectation::default();
    let mut seen_status = false;
    let mut seen_body = false;
    let mut seen_ignore = false;

    for (key, value) in url::form_urlencoded::parse(directive.as_bytes()) {
        match key.as_ref() {
            "status" if !seen_status => {
                seen_status = true;
                expected.status = value
                    .trim()
                    .parse::<u16>()
                    .map_err(|e| format!("invalid status '{}': {}", value, e))?;
            }
            "body" if !seen_body => {
                seen_body = true;
                expected.body = value.into_owned();
            }
            "ignore" if !seen_ignore => {
                seen_ignore = true;
                expected.ignore = value
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
            "status" | "body" | "ignore" => {}
            other => {
                tracing::debug!(key = other, "unknown expectation key ignored");
            }
        }
    }

    Ok(expected)
}

/// form_urlencoded 对非法转义宽容处理，这里要求每个 `%` 后跟两位十六进制
fn check_escapes(directive: &str) -> Result<(), String> {
    let bytes = directive.as_bytes();
    for (index, _) in bytes.iter().enumerate().filter(|(_, b)| **b == b'%') {
        let valid = bytes
            .get(index + 1..index + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            let end = (index + 3).min(directive.len());
            let escape = directive.get(index..end).unwrap_or("%");
            return Err(format!("invalid escape '{}'", escape));
        }
    }
    Ok(())
}
