//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// 错误类别
///
/// 与 [`Error`] 的变体一一对应，便于调用方按类别处理而不必逐个匹配变体。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 配置错误（保留名冲突、配置文件无效）
    Configuration,
    /// 结构错误（节点缺少必需属性或属性类型不对）
    Structural,
    /// 查找错误（节点或边不存在）
    Lookup,
    /// 用法错误（未知标记、试图改写保留属性）
    Usage,
    /// 空图上没有帧范围
    Empty,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("配置的{role}键 {key} 是保留的标注名，请更换")]
    ReservedKey { role: &'static str, key: String },

    #[error("配置无效: {0}")]
    Config(String),

    #[error("节点 {node} 缺少属性 {key}")]
    MissingAttribute { node: String, key: String },

    #[error("节点 {node} 的属性 {key} 无效，期望 {expected}，实际为 {found}")]
    InvalidAttribute {
        node: String,
        key: String,
        expected: &'static str,
        found: String,
    },

    #[error("节点不存在: {0}")]
    NodeNotFound(String),

    #[error("边不存在: {0}")]
    EdgeNotFound(String),

    #[error("未知的标记: {0}")]
    UnknownFlag(String),

    #[error("属性 {0} 是保留属性，不能直接修改")]
    ReservedProperty(String),

    #[error("图中没有节点，帧范围未定义")]
    EmptyGraph,

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// 错误所属类别
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ReservedKey { .. } | Error::Config(_) | Error::IoError(_) => {
                ErrorKind::Configuration
            }
            Error::MissingAttribute { .. } | Error::InvalidAttribute { .. } => {
                ErrorKind::Structural
            }
            Error::NodeNotFound(_) | Error::EdgeNotFound(_) => ErrorKind::Lookup,
            Error::UnknownFlag(_) | Error::ReservedProperty(_) => ErrorKind::Usage,
            Error::EmptyGraph => ErrorKind::Empty,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
