use chrono::{Local, TimeZone};
use file_pilot_common::ParseError;
use serde::{Deserialize, Serialize};

/// 后端目录列表返回的原始记录（线上格式）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFileRecord {
    pub name: String,
    pub path: String,
    /// 纪元秒，数字字符串
    #[serde(rename = "lastModified")]
    pub last_modified: String,
    /// 缺省表示文件；存在（可为空）表示目录
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawFileRecord>>,
}

/// 界面侧文件树节点，每次加载整棵替换，构造后不再修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    /// 本地时间显示串，构造时由纪元秒转换
    pub last_modified: String,
    pub is_dir: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    /// 由原始记录构造，时间戳转换递归应用到所有子节点
    pub fn from_raw(raw: RawFileRecord) -> Result<Self, ParseError> {
        // is_dir 在构造时定死，与 children 是否存在永不分离
        let is_dir = raw.children.is_some();
        let children = match raw.children {
            Some(list) => Some(
                list.into_iter()
                    .map(Self::from_raw)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };
        Ok(Self {
            name: raw.name,
            path: raw.path,
            last_modified: format_epoch(&raw.last_modified)?,
            is_dir,
            children,
        })
    }
}

/// 纪元秒字符串转本地时间显示串
pub fn format_epoch(epoch: &str) -> Result<String, ParseError> {
    let secs: i64 = epoch
        .trim()
        .parse()
        .map_err(|_| ParseError::BadTimestamp(epoch.to_string()))?;
    let dt = Local
        .timestamp_opt(secs, 0)
        .single()
        .ok_or(ParseError::OutOfRange(secs))?;
    Ok(dt.format("%Y-%m-%d %H:%M:%S").to_string())
}
