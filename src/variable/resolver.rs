use crate::variable::types::VariableTable;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// 变量替换器
pub struct VariableResolver;

impl VariableResolver {
    fn placeholder_regex() -> &'static Regex {
        static VAR_REGEX: OnceLock<Regex> = OnceLock::new();
        VAR_REGEX.get_or_init(|| Regex::new(r"\{\{([^{}]*)\}\}").expect("valid placeholder regex"))
    }

    /// 文本中是否含有 `{{...}}` 占位符
    pub fn has_placeholder(text: &str) -> bool {
        text.contains("{{") && text.contains("}}") && Self::placeholder_regex().is_match(text)
    }

    /// 替换文本中所有已知变量的 {{variable}} 占位符
    ///
    /// 未定义的变量保持原样，不报错。替换结果不会被再次展开。
    pub fn substitute(text: &str, vars: &VariableTable) -> String {
        if !Self::has_placeholder(text) {
            return text.to_string();
        }

        Self::placeholder_regex()
            .replace_all(text, |caps: &Captures| {
                let var_name = &caps[1];
                vars.get(var_name).unwrap_or(&caps[0]).to_string()
            })
            .to_string()
    }
}
