use std::fmt;

use file_pilot_common::BackendError;
use file_pilot_domain::{RawFileRecord, UploadEvent};
use tokio::sync::mpsc;

/// 上传进度事件的关联键，由 upload_file 返回
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey(pub String);

impl EventKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 与原生后端的 IPC 边界：请求/响应调用加事件订阅。
/// 订阅以有界通道交付进度快照，由 is_done 事件收尾，
/// 同一键的事件按进度不减序到达，终止事件恰好一条且最后。
#[allow(async_fn_in_trait)]
pub trait BackendTransport {
    /// 列出目录内容，非递归
    async fn load_dir_content(&self, path: &str) -> Result<Vec<RawFileRecord>, BackendError>;

    async fn delete_file(&self, path: &str) -> Result<(), BackendError>;

    async fn create_dir(&self, path: &str) -> Result<(), BackendError>;

    async fn move_to(&self, from: &str, to_dir: &str) -> Result<(), BackendError>;

    /// 发起上传，返回用于订阅进度的关联键
    async fn upload_file(&self, local_path: &str, to_dir: &str) -> Result<EventKey, BackendError>;

    /// 领取该键的进度通道，每个键只能领取一次
    async fn subscribe(&self, key: &EventKey)
        -> Result<mpsc::Receiver<UploadEvent>, BackendError>;
}
