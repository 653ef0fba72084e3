use std::collections::HashMap;

/// 变量表，由文档中的 `@name=value` 行逐行构建
///
/// 同名变量后写覆盖先写，不做合并。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableTable {
    variables: HashMap<String, String>,
}

impl VariableTable {
    /// 创建新的空变量表
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或覆盖变量
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// 获取变量值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    /// 获取非空变量值
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    /// 变量数量
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// 解析 `@name=value` 指令行，返回 (name, value)
    ///
    /// 只按第一个 `=` 切分，两侧各自 trim。没有 `=` 的行返回 None。
    pub fn parse_binding(line: &str) -> Option<(&str, &str)> {
        let rest = line.strip_prefix('@')?;
        let (name, value) = rest.split_once('=')?;
        Some((name.trim(), value.trim()))
    }
}
