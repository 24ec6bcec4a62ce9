use thiserror::Error;

/// 后端拒绝请求时的错误分类
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("path not found: {0}")]
    NotFound(String),

    #[error("path already exists: {0}")]
    AlreadyExists(String),

    #[error("name collision at destination: {0}")]
    Collision(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown upload event key: {0}")]
    UnknownEventKey(String),

    #[error("backend rejected request: {0}")]
    Rejected(String),
}

/// 构造 FileNode 时时间戳解析失败
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid timestamp: {0:?}")]
    BadTimestamp(String),

    #[error("timestamp out of range: {0}")]
    OutOfRange(i64),
}

/// 桥接层统一错误：所有失败原样上抛，不做本地恢复
#[derive(Error, Debug)]
pub enum PilotError {
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

pub type PilotResult<T> = std::result::Result<T, PilotError>;
