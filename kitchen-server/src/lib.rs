//! Kitchen Queue Server - 出餐排队与等待时间预估
//!
//! # 架构概述
//!
//! - **制作目录** (`services`): foodId → {baseTime, batchSize}
//! - **排队核心** (`orders`): 等待时间预估、准入、延迟状态流转
//! - **通知** (`notifications`): 订单通知，自动过期
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! kitchen-server/src/
//! ├── core/           # 配置、状态、服务器、后台任务
//! ├── services/       # 制作目录
//! ├── orders/         # 预估、台账、调度、OrdersManager
//! ├── notifications/  # 通知中心
//! ├── api/            # HTTP 路由和处理器
//! └── utils/          # 错误、日志、校验
//! ```

pub mod api;
pub mod core;
pub mod notifications;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, QueueConfig, Server, ServerState, build_router};
pub use orders::{OrdersManager, QueueEvent, WaitBasis, WaitEstimate};
pub use services::CatalogService;
pub use utils::{AppError, AppResult, QueueError, QueueResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env、创建工作目录、初始化日志
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();
    let config = Config::from_env();

    std::fs::create_dir_all(&config.work_dir)?;
    let log_dir = config.log_dir();
    let log_dir = log_dir.to_string_lossy();
    init_logger_with_file(&config.log_level, config.log_json, Some(log_dir.as_ref()))?;

    tracing::debug!(work_dir = %config.work_dir, environment = %config.environment, "Environment ready");
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    __ __ _  __       __
   / //_/(_)/ /_ ____/ /_   ___   ____
  / ,<  / // __// ___/ __ \ / _ \ / __ \
 / /| |/ // /_ / /__/ / / //  __// / / /
/_/ |_/_/ \__/ \___/_/ /_/ \___//_/ /_/
         q u e u e
    "#
    );
}
