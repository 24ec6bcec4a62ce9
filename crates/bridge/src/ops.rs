use file_pilot_common::PilotResult;
use file_pilot_domain::FileNode;
use log::{debug, info};

use crate::tracker::UploadHandle;
use crate::transport::BackendTransport;

/// 界面意图到后端请求的翻译层。每个操作都是一次独立的异步调用，
/// 桥本身在调用之间不保留任何状态。
pub struct Bridge<T> {
    transport: T,
}

impl<T: BackendTransport> Bridge<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 加载目录内容并整树规范化为 FileNode
    pub async fn load_dir(&self, path: &str) -> PilotResult<Vec<FileNode>> {
        debug!("loading dir content: {path}");
        let raw = self.transport.load_dir_content(path).await?;
        let nodes = raw
            .into_iter()
            .map(FileNode::from_raw)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(nodes)
    }

    pub async fn delete_file(&self, path: &str) -> PilotResult<()> {
        debug!("deleting: {path}");
        self.transport.delete_file(path).await?;
        Ok(())
    }

    pub async fn create_dir(&self, path: &str) -> PilotResult<()> {
        debug!("creating dir: {path}");
        self.transport.create_dir(path).await?;
        Ok(())
    }

    pub async fn move_file(&self, from: &str, to_dir: &str) -> PilotResult<()> {
        debug!("moving {from} -> {to_dir}");
        self.transport.move_to(from, to_dir).await?;
        Ok(())
    }

    /// 发起上传并返回进度句柄；初始请求失败时句柄不会被创建
    pub async fn upload(&self, to_dir: &str, local_path: &str) -> PilotResult<UploadHandle> {
        info!("uploading {local_path} -> {to_dir}");
        let key = self.transport.upload_file(local_path, to_dir).await?;
        let events = self.transport.subscribe(&key).await?;
        debug!("upload registered, event key = {key}");
        Ok(UploadHandle::spawn(key, local_path, to_dir, events))
    }
}
