use std::path::PathBuf;

use bytes::BytesMut;
use file_pilot_common::BackendError;
use file_pilot_domain::UploadEvent;
use log::{info, warn};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;

/// 一次上传的搬运任务：分块读源文件、追加写目标文件，
/// 每写完一块发一条进度事件，最后恰好发一条终止事件。
pub(crate) struct TransferJob {
    pub(crate) src: PathBuf,
    pub(crate) dst: PathBuf,
    pub(crate) chunk_size: usize,
    pub(crate) event_path: String,
    pub(crate) event_to_dir: String,
}

impl TransferJob {
    pub(crate) async fn run(self, events: mpsc::Sender<UploadEvent>) -> Result<(), BackendError> {
        // 同名旧文件整体替换
        if fs::try_exists(&self.dst).await? {
            info!("replacing old file at {}", self.dst.display());
            fs::remove_file(&self.dst).await?;
        }

        let mut src = File::open(&self.src).await?;
        let size = src.metadata().await?.len();
        let mut dst = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.dst)
            .await?;

        let mut buf = BytesMut::with_capacity(self.chunk_size);
        let mut written: u64 = 0;

        loop {
            let len = src.read_buf(&mut buf).await?;
            if len == 0 {
                break;
            }
            written += len as u64;
            dst.write_all(&buf).await?;

            let percent = if size == 0 {
                "100".to_string()
            } else {
                format!("{:.02}", written as f64 / size as f64 * 100.0)
            };
            // 订阅方中途放弃不终止搬运，文件照常写完
            let _ = events.send(self.event(percent, false)).await;

            buf.clear();
        }
        dst.flush().await?;

        if written != size {
            warn!("file size changed during upload: {}", self.src.display());
        }

        let _ = events.send(self.event("100".to_string(), true)).await;
        info!("upload finished: {} -> {}", self.src.display(), self.dst.display());
        Ok(())
    }

    fn event(&self, percent: String, is_done: bool) -> UploadEvent {
        UploadEvent {
            percent,
            is_done,
            path: self.event_path.clone(),
            to_dir: self.event_to_dir.clone(),
        }
    }
}
