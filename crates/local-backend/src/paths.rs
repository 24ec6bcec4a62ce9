use std::path::{Path, PathBuf};

use file_pilot_common::BackendError;

/// 把正斜杠分隔的请求路径解析到后端根目录下，禁止越出根
pub(crate) fn resolve_under(root: &Path, wire: &str) -> Result<PathBuf, BackendError> {
    let trimmed = wire.trim();
    if trimmed.is_empty() {
        return Err(BackendError::InvalidPath("empty path".to_string()));
    }

    let mut resolved = root.to_path_buf();
    for part in trimmed.split('/').filter(|p| !p.is_empty() && *p != ".") {
        if part == ".." {
            return Err(BackendError::InvalidPath(format!(
                "path escapes root: {wire}"
            )));
        }
        resolved.push(part);
    }
    Ok(resolved)
}

/// 请求路径的最后一段
pub(crate) fn wire_file_name(wire: &str) -> Result<&str, BackendError> {
    wire.trim()
        .rsplit('/')
        .find(|p| !p.is_empty())
        .ok_or_else(|| BackendError::InvalidPath(format!("no file name in: {wire}")))
}

/// 线上格式的路径拼接
pub(crate) fn join_wire(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        format!("/{name}")
    } else {
        format!("{dir}/{name}")
    }
}
