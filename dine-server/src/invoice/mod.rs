//! 发票
//!
//! - [`renderer`] - 发票数据到 PDF 字节的纯函数渲染
//! - [`service`] - 加载订单、桌台、账单与设置并组装发票数据
//!
//! 底层 PDF 写入由 `dine-invoice` crate 完成。

pub mod renderer;
pub mod service;

pub use renderer::{InvoiceData, InvoiceLine, InvoiceRenderer};
pub use service::{InvoiceService, InvoiceVariant, RenderedInvoice, invoice_filename};
