use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use file_pilot_domain::UploadEvent;
use tokio::sync::{mpsc, Mutex};

/// 尚未被领取的上传进度通道，按事件键登记
#[derive(Default, Clone)]
pub(crate) struct EventRegistry {
    channels: Arc<Mutex<HashMap<String, mpsc::Receiver<UploadEvent>>>>,
}

impl EventRegistry {
    pub(crate) async fn register(&self, key: String, rx: mpsc::Receiver<UploadEvent>) {
        self.channels.lock().await.insert(key, rx);
    }

    /// 领取即移除，每个键只能订阅一次
    pub(crate) async fn claim(&self, key: &str) -> Option<mpsc::Receiver<UploadEvent>> {
        self.channels.lock().await.remove(key)
    }
}

pub(crate) fn next_event_key() -> String {
    static ID: AtomicU32 = AtomicU32::new(0);
    format!("upload-progress-{}", ID.fetch_add(1, Ordering::SeqCst))
}
