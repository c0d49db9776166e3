use std::path::PathBuf;
use std::time::Duration;

use crate::orders::WaitBasis;

/// 服务器配置 - 厨房排队服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (日志、目录文件) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | 生产环境为 true | JSON 日志格式 |
/// | CATALOG_PATH | 未设置 | 制作目录 JSON 文件 |
/// | COOKING_START_DELAY_MS | 1000 | 下单到开始制作的延迟(毫秒) |
/// | NOTIFICATION_EXPIRY_SECS | 600 | 通知自动过期时间(秒) |
/// | READY_WARNINGS | 5,2 | 完成前提醒点(分钟) |
/// | WAIT_BASIS | batch_start | 等待时间口径 |
/// | EVENT_CHANNEL_CAPACITY | 1024 | 事件广播容量 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/kitchen HTTP_PORT=8080 WAIT_BASIS=batch_completion cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储日志、目录文件等
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别 (tracing EnvFilter 语法)
    pub log_level: String,
    /// 是否输出 JSON 日志
    pub log_json: bool,
    /// 制作目录文件 (未设置时仅使用内存种子数据)
    pub catalog_path: Option<PathBuf>,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
    /// 排队核心配置
    pub queue: QueueConfig,
}

/// 排队核心配置 (注入 OrdersManager)
#[derive(Debug, Clone, PartialEq)]
pub struct QueueConfig {
    /// Queued → Cooking 的延迟
    pub cooking_start_delay: Duration,
    /// 通知自动删除时间
    pub notification_expiry: Duration,
    /// 完成前 N 分钟提醒 (仅当等待时间 > N)
    pub ready_warnings: Vec<u32>,
    /// 等待时间口径
    pub wait_basis: WaitBasis,
    /// 事件广播通道容量
    pub event_channel_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            cooking_start_delay: Duration::from_millis(1000),
            notification_expiry: Duration::from_secs(600),
            ready_warnings: vec![5, 2],
            wait_basis: WaitBasis::BatchStart,
            event_channel_capacity: 1024,
        }
    }
}

impl QueueConfig {
    /// 从环境变量加载排队配置
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cooking_start_delay: std::env::var("COOKING_START_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.cooking_start_delay),
            notification_expiry: std::env::var("NOTIFICATION_EXPIRY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.notification_expiry),
            ready_warnings: std::env::var("READY_WARNINGS")
                .ok()
                .and_then(|v| parse_minutes_list(&v))
                .unwrap_or(defaults.ready_warnings),
            wait_basis: std::env::var("WAIT_BASIS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.wait_basis),
            event_channel_capacity: std::env::var("EVENT_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|c: &usize| *c > 0)
                .unwrap_or(defaults.event_channel_capacity),
        }
    }
}

/// "5,2" → [5, 2]; 空串表示不提醒，任何非法项使整个值无效
fn parse_minutes_list(raw: &str) -> Option<Vec<u32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(Vec::new());
    }
    raw.split(',')
        .map(|part| part.trim().parse::<u32>().ok().filter(|m| *m > 0))
        .collect()
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(is_production),
            environment,
            catalog_path: std::env::var("CATALOG_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            queue: QueueConfig::from_env(),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 关闭超时
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_defaults() {
        let config = QueueConfig::default();
        assert_eq!(config.cooking_start_delay, Duration::from_secs(1));
        assert_eq!(config.notification_expiry, Duration::from_secs(600));
        assert_eq!(config.ready_warnings, vec![5, 2]);
        assert_eq!(config.wait_basis, WaitBasis::BatchStart);
    }

    #[test]
    fn test_parse_minutes_list() {
        assert_eq!(parse_minutes_list("5,2"), Some(vec![5, 2]));
        assert_eq!(parse_minutes_list(" 10 , 3 "), Some(vec![10, 3]));
        assert_eq!(parse_minutes_list(""), Some(vec![]));
        assert_eq!(parse_minutes_list("5,x"), None);
        assert_eq!(parse_minutes_list("0"), None);
    }
}
