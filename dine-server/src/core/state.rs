//! 服务器状态
//!
//! 所有服务的共享句柄，克隆成本低 (内部均为 `Arc` 或连接池句柄)。

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use crate::auth::{JwtService, OtpStore};
use crate::billing::BillingService;
use crate::core::Config;
use crate::core::tasks::BackgroundTasks;
use crate::db::DbService;
use crate::db::repository::{dining_table, staff_session};
use crate::invoice::InvoiceService;
use crate::orders::OrderService;
use crate::realtime::OrderStatusHub;
use crate::settings::{SettingsService, SqliteSettingsService};
use crate::utils::AppResult;

/// 过期验证码 / 失效会话清理间隔
const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(300);

/// 服务器状态 - 注入到所有处理器
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 令牌服务
    pub jwt_service: Arc<JwtService>,
    /// 餐厅设置 (注入接口，便于替换实现)
    pub settings: Arc<dyn SettingsService>,
    /// 订单状态实时 hub
    pub hub: OrderStatusHub,
    /// 验证码存储
    pub otp: OtpStore,
    /// 下单服务
    pub orders: OrderService,
    /// 账单聚合服务
    pub billing: BillingService,
    /// 发票服务
    pub invoices: InvoiceService,
    /// 全局关闭信号 (Ctrl-C 时取消)
    pub shutdown: CancellationToken,
}

impl ServerState {
    /// 打开数据库、执行迁移并组装所有服务
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path).await?;

        // PUBLIC_ORIGIN 变更后，已有桌台的二维码内容随之更新
        let refreshed = dining_table::refresh_qr_payloads(&db.pool, &config.public_origin).await?;
        if refreshed > 0 {
            tracing::info!(refreshed, origin = %config.public_origin, "QR payloads regenerated");
        }

        Ok(Self::with_pool(config.clone(), db.pool))
    }

    /// 基于已有连接池组装服务 (测试使用内存库)
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let shutdown = CancellationToken::new();
        let hub = OrderStatusHub::new();
        let settings: Arc<dyn SettingsService> =
            Arc::new(SqliteSettingsService::new(pool.clone()));
        let orders = OrderService::new(
            pool.clone(),
            Arc::new(hub.clone()),
            config.retry,
            shutdown.clone(),
        );
        let billing = BillingService::new(
            pool.clone(),
            Arc::new(hub.clone()),
            config.retry,
            shutdown.clone(),
        );
        let invoices = InvoiceService::new(pool.clone(), settings.clone(), config.branding.clone());
        let otp = OtpStore::new(config.otp_ttl_secs, config.otp_max_attempts);
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config,
            pool,
            jwt_service,
            settings,
            hub,
            otp,
            orders,
            billing,
            invoices,
            shutdown,
        }
    }

    /// 启动后台任务，必须在 `Server::run()` 之前调用
    ///
    /// - `session_maintenance`: 清理过期验证码和失效的员工会话
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new(self.shutdown.clone());

        let otp = self.otp.clone();
        let pool = self.pool.clone();
        tasks.spawn_periodic("session_maintenance", MAINTENANCE_INTERVAL, move || {
            let otp = otp.clone();
            let pool = pool.clone();
            async move {
                let codes = otp.cleanup_expired();
                let now = chrono::Utc::now().timestamp_millis();
                match staff_session::purge_inactive(&pool, now).await {
                    Ok(sessions) if codes > 0 || sessions > 0 => {
                        tracing::debug!(codes, sessions, "Expired credentials purged");
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "Session purge failed"),
                }
            }
        });

        tracing::info!(count = tasks.len(), "Background tasks started");
        tasks
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}
