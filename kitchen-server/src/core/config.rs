//! Server Configuration

/// 服务器配置 - 厨房运营节点的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/brigade/kitchen | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | MAX_KITCHEN_CAPACITY | 20 | 厨房并发订单上限 |
/// | OVERDUE_CHECK_INTERVAL_SECS | 60 | 超时/产能巡检周期 |
/// | CLEANUP_INTERVAL_SECS | 3600 | 通知清理周期 |
/// | LOG_LEVEL | info | 日志级别 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/brigade MAX_KITCHEN_CAPACITY=30 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 厨房并发订单上限 (产能分母)
    pub max_kitchen_capacity: usize,
    /// 超时订单与产能阈值巡检周期 (秒)
    pub overdue_check_interval_secs: u64,
    /// 通知清理周期 (秒)
    pub cleanup_interval_secs: u64,
    /// 日志级别
    pub log_level: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/brigade/kitchen".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            max_kitchen_capacity: std::env::var("MAX_KITCHEN_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(crate::kitchen::capacity::DEFAULT_MAX_KITCHEN_CAPACITY),
            overdue_check_interval_secs: std::env::var("OVERDUE_CHECK_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),
            cleanup_interval_secs: std::env::var("CLEANUP_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3600),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }

    /// 数据库目录: {work_dir}/database
    pub fn database_dir(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("database")
    }

    /// 日志目录: {work_dir}/logs
    pub fn log_dir(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
