use crate::Result;
use crate::error::RuprobeError;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 状态文件默认后缀，追加在 .http 文件路径之后
pub const STATUS_FILE_SUFFIX: &str = ".json";

/// 上一次观测到的 up/down 状态
///
/// key 是请求在文档中的位置（从 0 开始），这是请求与历史状态
/// 之间唯一的关联；调整文档中请求的顺序会错配历史。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusStore {
    entries: BTreeMap<usize, bool>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由 .http 文件路径推导默认状态文件路径
    pub fn default_path_for<P: AsRef<Path>>(http_file: P) -> PathBuf {
        let mut path = http_file.as_ref().as_os_str().to_owned();
        path.push(STATUS_FILE_SUFFIX);
        PathBuf::from(path)
    }

    /// 从状态文件加载
    ///
    /// 文件不存在或为空返回空状态；内容损坏时记录警告并返回空状态。
    /// 只有文件存在却读不出来才是错误。
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "status file not found, starting empty");
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(RuprobeError::IoError)?;
        Ok(Self::from_json(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "failed to parse status file, ignoring");
            Self::new()
        }))
    }

    /// 解析 `{"0": true, "1": false}` 形式的 JSON，空白内容视为空状态
    pub fn from_json(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        let entries: BTreeMap<usize, bool> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// 持久化到状态文件，空状态不写
    ///
    /// 先写同目录下的临时文件再 persist（rename），读者不会看到写了一半的文件；
    /// 失败时临时文件随 NamedTempFile 一起删除。
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if self.is_empty() {
            debug!(path = %path.display(), "status store empty, nothing to save");
            return Ok(());
        }

        let json = self.to_json()?;
        let dir = path
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(path).map_err(|e| RuprobeError::IoError(e.error))?;

        debug!(path = %path.display(), entries = self.len(), "status saved");
        Ok(())
    }

    pub fn get(&self, position: usize) -> Option<bool> {
        self.entries.get(&position).copied()
    }

    pub fn set(&mut self, position: usize, up: bool) {
        self.entries.insert(position, up);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
