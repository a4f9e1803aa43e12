//! Invoice Handlers

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::invoice::InvoiceVariant;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct InvoiceQuery {
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
    pub variant: Option<String>,
}

impl InvoiceQuery {
    fn parse_order_id(&self) -> AppResult<i64> {
        let raw = self
            .order_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::validation("orderId is required"))?;
        raw.parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                AppError::validation(format!("orderId must be a positive integer, got '{raw}'"))
                    .with_detail("field", "orderId")
            })
    }
}

/// GET /api/bill?orderId=&variant= - 下载订单发票 PDF
pub async fn download(
    State(state): State<ServerState>,
    Query(query): Query<InvoiceQuery>,
) -> AppResult<Response> {
    let order_id = query.parse_order_id()?;
    let variant = InvoiceVariant::from_query(query.variant.as_deref());

    let invoice = state.invoices.render_order_invoice(order_id, variant).await?;
    let disposition = format!("attachment; filename=\"{}\"", invoice.filename);

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        invoice.bytes,
    )
        .into_response())
}
