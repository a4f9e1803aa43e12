//! Dine Server - 餐厅扫码点餐后端
//!
//! # 架构概述
//!
//! 顾客扫描桌台二维码浏览菜单并下单；员工审核订单、合并整桌账单、计税并生成
//! PDF 发票。
//!
//! - **账单聚合** (`billing`): 整桌订单汇总、按税率计税、原子审批
//! - **数据库** (`db`): SQLite (sqlx) 存储与重试
//! - **认证** (`auth`): JWT + 服务端会话 + OTP
//! - **实时推送** (`realtime`): 按手机号分发订单状态
//! - **发票** (`invoice`): 发票数据装配与 PDF 渲染
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! dine-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT、会话、OTP、权限
//! ├── billing/       # 账单聚合 (核心)
//! ├── orders/        # 下单与订单查询
//! ├── settings/      # 餐厅设置服务
//! ├── realtime/      # 订单状态 hub
//! ├── invoice/       # 发票渲染
//! ├── api/           # HTTP 路由和处理器
//! ├── middleware/    # 请求日志
//! ├── utils/         # 日志、校验
//! └── db/            # 连接池、迁移、仓储
//! ```

pub mod api;
pub mod auth;
pub mod billing;
pub mod core;
pub mod db;
pub mod invoice;
pub mod middleware;
pub mod orders;
pub mod realtime;
pub mod settings;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use billing::{BillingError, BillingService};
pub use core::{Config, Server, ServerState};
pub use realtime::OrderStatusHub;
pub use settings::{SettingsService, SqliteSettingsService};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ____  _
   / __ \(_)___  ___
  / / / / / __ \/ _ \
 / /_/ / / / / /  __/
/_____/_/_/ /_/\___/
    "#
    );
}
