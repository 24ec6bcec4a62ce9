use file_pilot_domain::{UploadEvent, UploadSnapshot};
use log::{debug, warn};
use tokio::sync::{mpsc, watch};

use crate::transport::EventKey;

/// 一次上传的反应式句柄。调用方独占持有；订阅由内部任务持有，
/// 终止事件一到即被丢弃，不会在终止转换之后继续收取事件。
#[derive(Debug)]
pub struct UploadHandle {
    key: EventKey,
    rx: watch::Receiver<UploadSnapshot>,
}

impl UploadHandle {
    /// 以初始 Pending 快照建立反应单元，并启动消费订阅的跟踪任务
    pub fn spawn(
        key: EventKey,
        local_path: &str,
        to_dir: &str,
        mut events: mpsc::Receiver<UploadEvent>,
    ) -> Self {
        let (tx, rx) = watch::channel(UploadSnapshot::pending(local_path, to_dir));
        let task_key = key.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let done = event.is_done;
                tx.send_modify(|snap| snap.apply(&event));
                if done {
                    debug!("upload {task_key}: terminal event, dropping subscription");
                    break;
                }
            }
            if !tx.borrow().is_done() {
                // 通道在终止事件前中断：停留在 InProgress，无超时恢复
                warn!("upload {task_key}: event channel closed before terminal event");
            }
        });
        Self { key, rx }
    }

    pub fn event_key(&self) -> &EventKey {
        &self.key
    }

    /// 最新快照
    pub fn current(&self) -> UploadSnapshot {
        self.rx.borrow().clone()
    }

    pub fn is_done(&self) -> bool {
        self.rx.borrow().is_done()
    }

    /// 等待下一次快照更新；跟踪任务结束后返回 Err
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.rx.changed().await
    }

    /// 等到 Done 并返回终止快照；若事件流在终止事件前中断则返回 None
    pub async fn wait_done(&mut self) -> Option<UploadSnapshot> {
        loop {
            if self.rx.borrow().is_done() {
                return Some(self.rx.borrow().clone());
            }
            if self.rx.changed().await.is_err() {
                return self.rx.borrow().is_done().then(|| self.rx.borrow().clone());
            }
        }
    }
}
