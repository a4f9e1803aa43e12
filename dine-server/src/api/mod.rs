//! API 路由模块
//!
//! # 结构
//!
//! 顾客侧 (公共):
//! - [`health`] - 健康检查
//! - [`menu`] - 菜单、分类、活动
//! - [`public`] - 二维码解析、桌台信息
//! - [`orders`] - 下单、我的订单 (同时包含员工订单接口)
//! - [`invoice`] - 发票 PDF 下载
//! - [`realtime`] - 订单状态 WebSocket
//!
//! 员工侧 (需要登录):
//! - [`auth`] - OTP / 密码登录、注销、当前用户
//! - [`bills`] - 整桌账单预览、审批、查询
//! - [`dishes`] / [`categories`] / [`tables`] / [`taxes`] / [`events`] - 基础数据管理
//! - [`settings`] - 餐厅设置

use axum::Router;

use crate::core::ServerState;

pub mod auth;
pub mod bills;
pub mod categories;
pub mod dishes;
pub mod events;
pub mod health;
pub mod invoice;
pub mod menu;
pub mod orders;
pub mod public;
pub mod realtime;
pub mod settings;
pub mod tables;
pub mod taxes;

/// 组装全部路由 (不含状态)
pub fn router() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core APIs
        .merge(health::router())
        .merge(auth::router())
        // Customer APIs
        .merge(menu::router())
        .merge(public::router())
        .merge(orders::router())
        .merge(invoice::router())
        .merge(realtime::router())
        // Staff APIs
        .merge(bills::router())
        .merge(dishes::router())
        .merge(categories::router())
        .merge(tables::router())
        .merge(taxes::router())
        .merge(events::router())
        .merge(settings::router())
}
