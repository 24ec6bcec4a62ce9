use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use file_pilot_bridge::{BackendTransport, EventKey};
use file_pilot_common::{BackendError, TransferConfig};
use file_pilot_domain::{RawFileRecord, UploadEvent};
use log::{debug, error, info};
use tokio::fs;
use tokio::sync::mpsc;

use crate::paths::{join_wire, resolve_under, wire_file_name};
use crate::registry::{next_event_key, EventRegistry};
use crate::transfer::TransferJob;

/// 进程内后端：在配置的根目录下直接操作真实文件系统。
/// 请求路径用正斜杠、相对根解析；上传源路径是本机路径，原样使用。
#[derive(Clone)]
pub struct LocalBackend {
    root: PathBuf,
    config: TransferConfig,
    registry: EventRegistry,
}

impl LocalBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, TransferConfig::default())
    }

    pub fn with_config(root: impl Into<PathBuf>, config: TransferConfig) -> Self {
        Self {
            root: root.into(),
            config,
            registry: EventRegistry::default(),
        }
    }

    fn resolve(&self, wire: &str) -> Result<PathBuf, BackendError> {
        resolve_under(&self.root, wire)
    }
}

fn map_io(err: std::io::Error, path: &str) -> BackendError {
    match err.kind() {
        ErrorKind::NotFound => BackendError::NotFound(path.to_string()),
        ErrorKind::PermissionDenied => BackendError::PermissionDenied(path.to_string()),
        ErrorKind::AlreadyExists => BackendError::AlreadyExists(path.to_string()),
        _ => BackendError::Io(err),
    }
}

async fn raw_record(entry: &fs::DirEntry, wire_dir: &str) -> Result<RawFileRecord, BackendError> {
    let meta = entry.metadata().await?;
    let name = entry.file_name().to_string_lossy().to_string();
    let modified = meta
        .modified()?
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string();
    // 目录带空 children，文件不带
    let children = if meta.is_dir() { Some(vec![]) } else { None };
    Ok(RawFileRecord {
        path: join_wire(wire_dir, &name),
        name,
        last_modified: modified,
        children,
    })
}

impl BackendTransport for LocalBackend {
    async fn load_dir_content(&self, path: &str) -> Result<Vec<RawFileRecord>, BackendError> {
        let dir = self.resolve(path)?;
        debug!("listing {}", dir.display());

        let mut entries = fs::read_dir(&dir).await.map_err(|e| map_io(e, path))?;
        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| map_io(e, path))? {
            records.push(raw_record(&entry, path).await?);
        }

        // 目录在前，各自按名字排序
        records.sort_by(|a, b| match (a.children.is_some(), b.children.is_some()) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.name.cmp(&b.name),
        });
        Ok(records)
    }

    async fn delete_file(&self, path: &str) -> Result<(), BackendError> {
        let target = self.resolve(path)?;
        let meta = fs::metadata(&target).await.map_err(|e| map_io(e, path))?;
        info!("deleting {}", target.display());
        if meta.is_dir() {
            fs::remove_dir_all(&target).await.map_err(|e| map_io(e, path))?;
        } else {
            fs::remove_file(&target).await.map_err(|e| map_io(e, path))?;
        }
        Ok(())
    }

    async fn create_dir(&self, path: &str) -> Result<(), BackendError> {
        let target = self.resolve(path)?;
        info!("creating dir {}", target.display());
        fs::create_dir(&target).await.map_err(|e| map_io(e, path))?;
        Ok(())
    }

    async fn move_to(&self, from: &str, to_dir: &str) -> Result<(), BackendError> {
        let src = self.resolve(from)?;
        if !fs::try_exists(&src).await.map_err(|e| map_io(e, from))? {
            return Err(BackendError::NotFound(from.to_string()));
        }
        let name = wire_file_name(from)?;

        let dir = self.resolve(to_dir)?;
        let dir_meta = fs::metadata(&dir).await.map_err(|e| map_io(e, to_dir))?;
        if !dir_meta.is_dir() {
            return Err(BackendError::InvalidPath(format!(
                "destination is not a directory: {to_dir}"
            )));
        }

        let dst = dir.join(name);
        if fs::try_exists(&dst).await.map_err(|e| map_io(e, to_dir))? {
            return Err(BackendError::Collision(join_wire(to_dir, name)));
        }

        info!("moving {} -> {}", src.display(), dst.display());
        fs::rename(&src, &dst).await.map_err(|e| map_io(e, from))?;
        Ok(())
    }

    async fn upload_file(&self, local_path: &str, to_dir: &str) -> Result<EventKey, BackendError> {
        // 初始请求阶段就校验两端，失败则不产生事件键
        let src = PathBuf::from(local_path);
        let src_meta = fs::metadata(&src).await.map_err(|e| map_io(e, local_path))?;
        if !src_meta.is_file() {
            return Err(BackendError::InvalidPath(format!(
                "not a regular file: {local_path}"
            )));
        }

        let dir = self.resolve(to_dir)?;
        let dir_meta = fs::metadata(&dir).await.map_err(|e| map_io(e, to_dir))?;
        if !dir_meta.is_dir() {
            return Err(BackendError::InvalidPath(format!(
                "destination is not a directory: {to_dir}"
            )));
        }

        let name = src
            .file_name()
            .ok_or_else(|| BackendError::InvalidPath(format!("no file name in: {local_path}")))?;
        let job = TransferJob {
            dst: dir.join(name),
            src,
            chunk_size: self.config.chunk_size,
            event_path: local_path.to_string(),
            event_to_dir: to_dir.to_string(),
        };

        let key = next_event_key();
        let (tx, rx) = mpsc::channel(self.config.event_channel_capacity);
        self.registry.register(key.clone(), rx).await;
        info!("upload {local_path} -> {to_dir}, event key = {key}");

        tokio::spawn(async move {
            if let Err(err) = job.run(tx).await {
                error!("upload task failed: {err}");
            }
        });
        Ok(EventKey(key))
    }

    async fn subscribe(
        &self,
        key: &EventKey,
    ) -> Result<mpsc::Receiver<UploadEvent>, BackendError> {
        self.registry
            .claim(key.as_str())
            .await
            .ok_or_else(|| BackendError::UnknownEventKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn backend_with_fixture() -> (tempfile::TempDir, LocalBackend) {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("a.txt"))
            .unwrap()
            .write_all(b"hello")
            .unwrap();
        let backend = LocalBackend::new(dir.path());
        (dir, backend)
    }

    #[tokio::test]
    async fn test_load_dir_content_shape() {
        let (_guard, backend) = backend_with_fixture();
        let records = backend.load_dir_content("/").await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "sub");
        assert_eq!(records[0].path, "/sub");
        assert!(records[0].children.as_ref().unwrap().is_empty());
        assert_eq!(records[1].name, "a.txt");
        assert!(records[1].children.is_none());
        records[1].last_modified.parse::<i64>().unwrap();
    }

    #[tokio::test]
    async fn test_load_dir_content_missing_dir() {
        let (_guard, backend) = backend_with_fixture();
        let err = backend.load_dir_content("/nope").await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_dir_then_already_exists() {
        let (_guard, backend) = backend_with_fixture();
        backend.create_dir("/sub/b").await.unwrap();
        let err = backend.create_dir("/sub/b").await.unwrap_err();
        assert!(matches!(err, BackendError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_create_dir_missing_parent() {
        let (_guard, backend) = backend_with_fixture();
        let err = backend.create_dir("/no-parent/child").await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found() {
        let (_guard, backend) = backend_with_fixture();
        backend.delete_file("/a.txt").await.unwrap();
        let err = backend.delete_file("/a.txt").await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_directory_recursively() {
        let (guard, backend) = backend_with_fixture();
        File::create(guard.path().join("sub/inner.txt")).unwrap();
        backend.delete_file("/sub").await.unwrap();
        assert!(!guard.path().join("sub").exists());
    }

    #[tokio::test]
    async fn test_move_then_collision() {
        let (guard, backend) = backend_with_fixture();
        backend.move_to("/a.txt", "/sub").await.unwrap();
        assert!(guard.path().join("sub/a.txt").exists());
        assert!(!guard.path().join("a.txt").exists());

        File::create(guard.path().join("a.txt")).unwrap();
        let err = backend.move_to("/a.txt", "/sub").await.unwrap_err();
        assert!(matches!(err, BackendError::Collision(_)));
    }

    #[tokio::test]
    async fn test_move_source_under_file_is_mapped_error() {
        let (_guard, backend) = backend_with_fixture();
        // a.txt 是普通文件，其下不可能有子项
        let err = backend.move_to("/a.txt/ghost", "/sub").await.unwrap_err();
        assert!(matches!(
            err,
            BackendError::Io(_) | BackendError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_move_missing_source() {
        let (_guard, backend) = backend_with_fixture();
        let err = backend.move_to("/ghost.txt", "/sub").await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_path_escape_is_rejected() {
        let (_guard, backend) = backend_with_fixture();
        let err = backend.delete_file("/../outside").await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidPath(_)));
    }
}
