use std::sync::Arc;
use std::time::{Duration, Instant};

use shared::models::default_prep_profiles;
use tokio::sync::broadcast::error::RecvError;

use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::orders::OrdersManager;
use crate::services::CatalogService;
use crate::utils::error::QueueResult;
use crate::utils::logger::cleanup_old_logs;

/// 日志清理间隔
const LOG_CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，作为 axum `State` 在处理器间共享。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | orders | Arc<OrdersManager> | 排队核心 (准入、调度、通知) |
/// | started_at | Instant | 启动时间 (用于 uptime) |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 排队核心
    pub orders: Arc<OrdersManager>,
    /// 启动时间
    pub started_at: Instant,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 方法代替
    pub fn new(config: Config, orders: Arc<OrdersManager>) -> Self {
        Self {
            config,
            orders,
            started_at: Instant::now(),
        }
    }

    /// 初始化服务器状态
    ///
    /// 目录来源: `CATALOG_PATH` 指向的 JSON 文件 (不存在时用种子数据创建)，
    /// 未配置时仅使用内存中的种子数据。
    pub fn initialize(config: &Config) -> QueueResult<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => CatalogService::load_json_file(path, default_prep_profiles())?,
            None => {
                tracing::info!("CATALOG_PATH not set, using in-memory seed catalog");
                CatalogService::new(default_prep_profiles())
            }
        };
        let summary = catalog.summary();
        tracing::info!(
            items = summary.item_count,
            average_base_time = summary.average_base_time,
            "Preparation catalog ready"
        );

        let orders = Arc::new(OrdersManager::new(catalog, config.queue.clone()));
        Ok(Self::new(config.clone(), orders))
    }

    /// 获取制作目录
    pub fn catalog(&self) -> &CatalogService {
        self.orders.catalog()
    }

    /// 运行时间 (秒)
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// 启动后台任务
    ///
    /// - 队列事件日志 (Listener)
    /// - 过期日志清理 (Periodic)
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let mut rx = self.orders.subscribe();
        let token = tasks.shutdown_token();
        tasks.spawn("queue_event_log", TaskKind::Listener, async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    event = rx.recv() => match event {
                        Ok(event) => {
                            tracing::debug!(
                                target: "queue_events",
                                event = event.name(),
                                order_id = event.order_id(),
                                "Queue event"
                            );
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Queue event log lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        });

        let log_dir = self.config.log_dir();
        tasks.spawn_periodic("log_cleanup", LOG_CLEANUP_INTERVAL, move || {
            match cleanup_old_logs(&log_dir) {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Old log files removed"),
                Err(e) => tracing::error!(error = %e, "Failed to clean up old logs"),
            }
        });
    }
}
