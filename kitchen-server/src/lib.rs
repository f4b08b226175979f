//! Brigade Kitchen Server - 餐厅后厨运营核心
//!
//! # 架构概述
//!
//! 本模块是厨房运营节点的主入口，提供以下核心功能：
//!
//! - **厨房核心** (`kitchen`): 订单状态机、烹饪计时引擎、产能引擎
//! - **通知** (`notifications`): 事件驱动的员工通知分发与清理
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储与仓储层
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! kitchen-server/src/
//! ├── core/           # 配置、状态、服务器、后台任务
//! ├── kitchen/        # 状态机动作、计时引擎、产能引擎、管理器
//! ├── notifications/  # 通知分发与清理
//! ├── api/            # HTTP 路由和处理器
//! ├── db/             # 数据库层 (模型 + 仓储)
//! └── utils/          # 错误、日志、时钟
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod kitchen;
pub mod notifications;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{BackgroundTasks, Config, Server, ServerState, TaskKind};
pub use kitchen::{CapacityEngine, KitchenManager, TimerEngine};
pub use notifications::{NotificationCleanup, NotificationDispatcher};
pub use utils::{AppError, AppResponse, AppResult, Clock, FixedClock, SystemClock};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ____       _                 __
   / __ )_____(_)___ _____ _____/ /__
  / __  / ___/ / __ `/ __ `/ __  / _ \
 / /_/ / /  / / /_/ / /_/ / /_/ /  __/
/_____/_/  /_/\__, /\__,_/\__,_/\___/
             /____/   kitchen server
"#
    );
}
