//! Server State

use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::repository::{
    NotificationRepository, StaffRepository, WorkstationRepository,
};
use crate::kitchen::KitchenManager;
use crate::notifications::{NotificationCleanup, NotificationDispatcher};
use crate::utils::{Clock, SystemClock};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 (SurrealDB) |
/// | manager | 厨房核心 (状态机 + 计时器 + 产能) |
/// | dispatcher | 通知分发器 |
/// | cleanup | 通知清理 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub manager: Arc<KitchenManager>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub cleanup: NotificationCleanup,
}

impl ServerState {
    /// 初始化服务器状态 (生产路径: RocksDB + 系统时钟)
    ///
    /// # Panics
    ///
    /// 工作目录或数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("kitchen.db");
        let db = crate::db::open(&db_path)
            .await
            .expect("Failed to initialize database");

        Self::with_db(config.clone(), db, Arc::new(SystemClock))
    }

    /// 构造状态 (测试路径: 任意引擎 + 任意时钟)
    pub fn with_db(config: Config, db: Surreal<Db>, clock: Arc<dyn Clock>) -> Self {
        let manager = Arc::new(KitchenManager::new(
            db.clone(),
            clock.clone(),
            config.max_kitchen_capacity,
        ));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            NotificationRepository::new(db.clone()),
            StaffRepository::new(db.clone()),
            clock.clone(),
        ));
        let cleanup = NotificationCleanup::new(NotificationRepository::new(db.clone()), clock);

        Self {
            config,
            db,
            manager,
            dispatcher,
            cleanup,
        }
    }

    pub fn workstations(&self) -> WorkstationRepository {
        WorkstationRepository::new(self.db.clone())
    }

    pub fn staff(&self) -> StaffRepository {
        StaffRepository::new(self.db.clone())
    }

    pub fn notifications(&self) -> NotificationRepository {
        NotificationRepository::new(self.db.clone())
    }

    /// 启动后台任务
    ///
    /// - Listener: 事件 → 通知分发
    /// - Periodic: 超时巡检 + 产能阈值巡检
    /// - Periodic: 通知清理
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        // 1. Notification dispatcher listens on the event stream
        let dispatcher = self.dispatcher.clone();
        let rx = self.manager.subscribe();
        let token = tasks.shutdown_token();
        tasks.spawn("notification_dispatcher", TaskKind::Listener, async move {
            dispatcher.run(rx, token).await;
        });

        // 2. Overdue + capacity watchdog
        let manager = self.manager.clone();
        let interval = Duration::from_secs(self.config.overdue_check_interval_secs);
        let token = tasks.shutdown_token();
        tasks.spawn("kitchen_watchdog", TaskKind::Periodic, async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = manager.check_for_overdue_orders().await {
                            tracing::warn!(error = %e, "Overdue check failed");
                        }
                        if let Err(e) = manager.check_capacity_thresholds().await {
                            tracing::warn!(error = %e, "Capacity check failed");
                        }
                    }
                }
            }
        });

        // 3. Notification cleanup sweep
        let cleanup = self.cleanup.clone();
        let interval = Duration::from_secs(self.config.cleanup_interval_secs);
        let token = tasks.shutdown_token();
        tasks.spawn("notification_cleanup", TaskKind::Periodic, async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        cleanup.sweep().await;
                    }
                }
            }
        });
    }
}
