//! Error types / 错误类型

/// Facade error / 门面错误
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid configuration at construction / 配置缺失或无效
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Empty or missing call argument, or local path not found / 参数无效
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failure reported by the storage client (not found, denied, transport) / 存储后端错误
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
