//! 顾客订单状态 WebSocket
//!
//! GET /api/realtime/orders?phone=<手机号>
//!
//! 协议 (仅服务端 → 顾客):
//! - 连接后先发送 `snapshot` (该号码的全部订单)
//! - 之后每次状态变化发送 `order_updated`
//! - 订阅者落后 (Lagged) 时重新发送 `snapshot`

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use shared::message::RealtimeMessage;
use shared::models::normalize_phone;
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::core::ServerState;
use crate::utils::AppError;
use crate::utils::validation::validate_phone;

const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
pub struct RealtimeQuery {
    phone: String,
}

/// GET /api/realtime/orders?phone=
pub async fn handle_orders_ws(
    State(state): State<ServerState>,
    Query(query): Query<RealtimeQuery>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    validate_phone(&query.phone, "phone")?;
    let phone = normalize_phone(&query.phone);
    Ok(ws.on_upgrade(move |socket| orders_ws_session(socket, state, phone)))
}

async fn orders_ws_session(socket: WebSocket, state: ServerState, phone: String) {
    let (mut sink, mut stream) = socket.split();

    // 先订阅再取快照，避免两者之间的事件丢失
    let mut hub_rx = state.hub.subscribe(&phone);
    tracing::info!(phone = %phone, "Realtime subscriber connected");

    if send_snapshot(&mut sink, &state, &phone).await.is_err() {
        drop(hub_rx);
        state.hub.prune(&phone);
        return;
    }

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = state.shutdown.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }

            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = hub_rx.recv() => {
                match event {
                    Ok(event) => {
                        let msg = RealtimeMessage::OrderUpdated(event);
                        if send_message(&mut sink, &msg).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(phone = %phone, lagged = n, "Realtime subscriber lagged, resending snapshot");
                        hub_rx = state.hub.subscribe(&phone);
                        if send_snapshot(&mut sink, &state, &phone).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    // 顾客端不发送指令，忽略其余帧
                    _ => {}
                }
            }
        }
    }

    drop(hub_rx);
    state.hub.prune(&phone);
    tracing::info!(phone = %phone, "Realtime subscriber disconnected");
}

async fn send_snapshot<S>(sink: &mut S, state: &ServerState, phone: &str) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let orders = match state.orders.list_by_phone(phone).await {
        Ok(orders) => orders,
        Err(e) => {
            tracing::error!(phone = %phone, error = %e, "Failed to load order snapshot");
            return Err(());
        }
    };
    send_message(sink, &RealtimeMessage::Snapshot { orders }).await
}

async fn send_message<S>(sink: &mut S, msg: &RealtimeMessage) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
