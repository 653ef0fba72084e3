use crate::parser::expectation::parse_expectation;
use crate::parser::types::{ParseResult, ParseWarning, ParsedDocument, RequestSpec};
use crate::variable::{VariableResolver, VariableTable};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// 请求块分隔符
const SEPARATOR: &str = "###";

/// HTTP 文件解析器
///
/// 单遍自上而下扫描：变量只对定义之后的行可见，
/// 引用尚未定义变量的占位符原样保留。
pub struct HttpFileParser;

/// 扫描过程中的可变状态
#[derive(Default)]
struct ParseState {
    document: ParsedDocument,
    current: Option<RequestSpec>,
    body_started: bool,
    body_lines: Vec<String>,
}

impl ParseState {
    /// 收尾当前请求：拼接 body 并追加到结果序列
    fn finish_current(&mut self) {
        if let Some(mut request) = self.current.take() {
            request.body = self.body_lines.join("\n");
            debug!(
                position = self.document.requests.len(),
                request = %request.label(),
                "request parsed"
            );
            self.document.requests.push(request);
        }
        self.body_started = false;
        self.body_lines.clear();
    }

    fn warn(&mut self, line: usize, message: String) {
        warn!(line, "{}", message);
        self.document.warnings.push(ParseWarning { line, message });
    }
}

impl HttpFileParser {
    /// 从文件路径解析，读取失败是唯一的致命错误
    pub fn parse_file<P: AsRef<Path>>(path: P) -> ParseResult<ParsedDocument> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let parsed = Self::parse_content(&content);
        Ok(parsed.with_source_path(path.as_ref().to_path_buf()))
    }

    /// 从字符串内容解析，格式问题只记录警告
    pub fn parse_content(content: &str) -> ParsedDocument {
        let mut state = ParseState::default();

        for (index, raw_line) in content.lines().enumerate() {
            let line_number = index + 1;
            let line = VariableResolver::substitute(raw_line.trim(), &state.document.variables);
            Self::parse_line(&mut state, &line, line_number);
        }

        state.finish_current();
        state.document
    }

    fn parse_line(state: &mut ParseState, line: &str, line_number: usize) {
        // 变量定义
        if line.starts_with('@') {
            match VariableTable::parse_binding(line) {
                Some((name, value)) => state.document.variables.insert(name, value),
                None => debug!(line = line_number, "variable line without '=' ignored"),
            }
            return;
        }

        // 请求分隔符，可带期望指令
        if let Some(directive) = line.strip_prefix(SEPARATOR) {
            state.finish_current();
            let mut request = RequestSpec::new(line_number);

            let directive = directive.trim();
            if !directive.is_empty() {
                match parse_expectation(directive) {
                    Ok(expected) => request.expected = expected,
                    Err(e) => state.warn(
                        line_number,
                        format!(
                            "expects must be url encoded key value (status=200&body=Abc): {}",
                            e
                        ),
                    ),
                }
            }

            state.current = Some(request);
            return;
        }

        // 行注释
        if line.starts_with('#') {
            return;
        }

        // 第一个分隔符之前的内容没有归属
        let Some(request) = state.current.as_mut() else {
            return;
        };

        if request.method.is_empty() {
            if line.is_empty() {
                return;
            }
            let (method, url) = line.split_once(' ').unwrap_or((line, ""));
            request.method = method.to_string();
            request.url = url.to_string();
            request.headers = HashMap::new();
            if url.is_empty() {
                state.warn(line_number, format!("request line '{}' has no URL", line));
            }
        } else if line.is_empty() && !state.body_started {
            state.body_started = true;
        } else if state.body_started {
            state.body_lines.push(line.to_string());
        } else if let Some((name, value)) = line.split_once(':') {
            request.headers.insert(name.to_string(), value.trim().to_string());
        } else {
            debug!(line = line_number, "header line without ':' ignored");
        }
    }
}
