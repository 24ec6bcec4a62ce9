/// 上传传输参数
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// 单次读取并发送的字节数
    pub chunk_size: usize,
    /// 每个上传进度通道的容量
    pub event_channel_capacity: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            chunk_size: 64 * 1024,
            event_channel_capacity: 64,
        }
    }
}
