use serde::{Deserialize, Serialize};

/// 后端发来的一条上传进度事件（线上格式）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadEvent {
    pub percent: String,
    pub is_done: bool,
    pub path: String,
    #[serde(rename = "toDir")]
    pub to_dir: String,
}

/// 上传跟踪状态机：Pending -> InProgress -> Done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Pending,
    InProgress,
    Done,
}

/// 跟踪器反应单元中保存的快照；由发起上传的调用方独占持有
#[derive(Debug, Clone)]
pub struct UploadSnapshot {
    pub phase: UploadPhase,
    pub percent: String,
    pub path: String,
    pub to_dir: String,
}

impl UploadSnapshot {
    /// 初始快照：Pending，percent 为 "0"
    pub fn pending(path: impl Into<String>, to_dir: impl Into<String>) -> Self {
        Self {
            phase: UploadPhase::Pending,
            percent: "0".to_string(),
            path: path.into(),
            to_dir: to_dir.into(),
        }
    }

    /// 应用一条事件；终止事件进入 Done，之后不应再有任何应用
    pub fn apply(&mut self, event: &UploadEvent) {
        self.percent = event.percent.clone();
        self.phase = if event.is_done {
            UploadPhase::Done
        } else {
            UploadPhase::InProgress
        };
    }

    pub fn is_done(&self) -> bool {
        self.phase == UploadPhase::Done
    }
}
