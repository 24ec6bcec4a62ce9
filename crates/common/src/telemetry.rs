use std::sync::Once;

static INIT: Once = Once::new();

/// 初始化日志，可重复调用
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("info"),
        )
        .try_init();
    });
}
