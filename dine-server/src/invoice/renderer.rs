//! 发票渲染
//!
//! 用内置 Helvetica 字体在 A4 上排版税务发票：抬头、订单信息、菜品表、
//! 税额合计、大写金额与页脚。

use chrono::DateTime;
use chrono_tz::Tz;
use dine_invoice::{Align, Color, Font, InvoiceResult, PdfBuilder, amount_in_words};
use rust_decimal::Decimal;
use shared::models::{OrderStatus, TaxLine};

use crate::billing::money::{round_money, to_decimal};
use crate::core::BrandingConfig;

/// 餐饮服务的 HSN/SAC 编码
const HSN_RESTAURANT_SERVICE: &str = "9958";

/// 打印的一行菜品
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLine {
    pub name: String,
    pub quantity: i32,
    pub rate: Decimal,
    pub amount: Decimal,
}

/// 一张发票上打印的全部内容
#[derive(Debug, Clone)]
pub struct InvoiceData {
    pub order_id: i64,
    /// 订单所属的已审批账单；`None` 时打印临时发票
    pub bill_id: Option<i64>,
    pub table_number: String,
    pub customer_phone: String,
    pub status: OrderStatus,
    pub ordered_at: DateTime<Tz>,
    pub generated_at: DateTime<Tz>,
    pub restaurant_phone: String,
    pub gstin: String,
    pub lines: Vec<InvoiceLine>,
    pub subtotal: Decimal,
    pub taxes: Vec<TaxLine>,
    pub total_tax: Decimal,
    pub final_amount: Decimal,
}

/// 打印用税额行 (GST 已拆分为 CGST/SGST)
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PrintedTax {
    pub label: String,
    pub amount: Decimal,
}

pub struct InvoiceRenderer {
    branding: BrandingConfig,
}

impl InvoiceRenderer {
    pub fn new(branding: BrandingConfig) -> Self {
        Self { branding }
    }

    /// `<前缀><订单 id 末 8 位>`
    pub fn invoice_number(&self, order_id: i64) -> String {
        let id = order_id.to_string();
        let tail = &id[id.len().saturating_sub(8)..];
        format!("{}{}", self.branding.invoice_prefix, tail.to_uppercase())
    }

    pub fn render(&self, data: &InvoiceData) -> InvoiceResult<Vec<u8>> {
        let mut b = PdfBuilder::a4();
        b.title(&format!("Invoice {}", self.invoice_number(data.order_id)));

        self.header(&mut b, data);
        self.order_info(&mut b, data);
        self.items(&mut b, data);
        self.totals(&mut b, data);
        self.footer(&mut b, data);

        b.build()
    }

    fn money(&self, amount: Decimal) -> String {
        format!("{}{:.2}", self.branding.currency_label, round_money(amount))
    }

    fn header(&self, b: &mut PdfBuilder, data: &InvoiceData) {
        let phone = if data.restaurant_phone.is_empty() {
            "Contact Restaurant"
        } else {
            data.restaurant_phone.as_str()
        };

        b.font(Font::Bold, 20.0)
            .text_line(&self.branding.brand_name.to_uppercase(), Align::Center);
        b.font(Font::Regular, 10.0)
            .color(Color::GRAY)
            .text_line(&format!("Phone: {phone}"), Align::Center)
            .text_line(&format!("GSTIN: {}", data.gstin), Align::Center)
            .color(Color::BLACK)
            .space(6.0);

        b.font(Font::Bold, 14.0).text_line("TAX INVOICE", Align::Center);
        b.font(Font::Regular, 9.0)
            .text_line("(As per GST Rules)", Align::Center);
        if data.bill_id.is_none() {
            b.font(Font::Bold, 9.0)
                .color(Color::rgb(180, 40, 40))
                .text_line("PROVISIONAL - BILL NOT YET APPROVED", Align::Center)
                .color(Color::BLACK);
        }
        b.space(4.0).rule(1.0);
    }

    fn order_info(&self, b: &mut PdfBuilder, data: &InvoiceData) {
        let rows = [
            (
                format!("Invoice No: {}", self.invoice_number(data.order_id)),
                format!("Date: {}", data.ordered_at.format("%d/%m/%Y")),
            ),
            (
                format!("Table: {}", data.table_number),
                format!("Time: {}", data.ordered_at.format("%I:%M:%S %p")),
            ),
            (
                format!("Customer: {}", data.customer_phone),
                format!("Status: {}", data.status.as_str().to_uppercase()),
            ),
            (
                format!("Place of Supply: {}", self.branding.place_of_supply),
                "Payment Mode: Cash/UPI".to_string(),
            ),
        ];

        b.font(Font::Regular, 10.0).space(4.0);
        for (left, right) in &rows {
            b.columns(&[(left.as_str(), Align::Left), (right.as_str(), Align::Left)]);
        }
        b.space(6.0);
    }

    fn items(&self, b: &mut PdfBuilder, data: &InvoiceData) {
        let cw = b.content_width();
        let (no_x, no_w) = (0.0, 30.0);
        let (desc_x, desc_w) = (34.0, cw * 0.42);
        let (hsn_x, hsn_w) = (desc_x + desc_w + 4.0, 40.0);
        let (qty_x, qty_w) = (hsn_x + hsn_w, 36.0);
        let amount_w = 80.0;
        let amount_x = cw - amount_w;
        let (rate_x, rate_w) = (qty_x + qty_w, amount_x - qty_x - qty_w - 4.0);

        let rate_head = format!("RATE ({})", self.branding.currency_label);
        let amount_head = format!("AMOUNT ({})", self.branding.currency_label);

        b.font(Font::Bold, 9.0);
        let lh = b.line_height();
        b.fill_box(0.0, cw, lh, Color::LIGHT_GRAY).row(&[
            ("S.No", no_x, no_w, Align::Left),
            ("ITEM DESCRIPTION", desc_x, desc_w, Align::Left),
            ("HSN", hsn_x, hsn_w, Align::Left),
            ("QTY", qty_x, qty_w, Align::Right),
            (rate_head.as_str(), rate_x, rate_w, Align::Right),
            (amount_head.as_str(), amount_x, amount_w, Align::Right),
        ]);

        b.font(Font::Regular, 9.0);
        for (i, line) in data.lines.iter().enumerate() {
            let no = (i + 1).to_string();
            let qty = line.quantity.to_string();
            let rate = format!("{:.2}", round_money(line.rate));
            let amount = format!("{:.2}", round_money(line.amount));
            let mut name_lines = b.wrap(&line.name, desc_w).into_iter();
            let first = name_lines.next().unwrap_or_default();

            b.row(&[
                (no.as_str(), no_x, no_w, Align::Left),
                (first.as_str(), desc_x, desc_w, Align::Left),
                (HSN_RESTAURANT_SERVICE, hsn_x, hsn_w, Align::Left),
                (qty.as_str(), qty_x, qty_w, Align::Right),
                (rate.as_str(), rate_x, rate_w, Align::Right),
                (amount.as_str(), amount_x, amount_w, Align::Right),
            ]);
            for rest in name_lines {
                b.row(&[(rest.as_str(), desc_x, desc_w, Align::Left)]);
            }
        }
        b.rule_colored(0.5, Color::GRAY);
    }

    fn totals(&self, b: &mut PdfBuilder, data: &InvoiceData) {
        let cw = b.content_width();
        let (label_x, label_w) = (cw * 0.5, cw * 0.3);
        let (value_x, value_w) = (cw * 0.8, cw * 0.2);

        let line = |b: &mut PdfBuilder, label: &str, value: String| {
            b.row(&[
                (label, label_x, label_w, Align::Left),
                (value.as_str(), value_x, value_w, Align::Right),
            ]);
        };

        b.font(Font::Regular, 10.0);
        line(b, "Taxable Amount:", self.money(data.subtotal));
        for tax in printed_taxes(&data.taxes) {
            line(b, &format!("{}:", tax.label), self.money(tax.amount));
        }
        line(b, "Total Tax Amount:", self.money(data.total_tax));

        b.font(Font::Bold, 12.0);
        let lh = b.line_height();
        b.fill_box(label_x, cw - label_x, lh, Color::LIGHT_GRAY);
        line(b, "TOTAL AMOUNT:", self.money(data.final_amount));
        b.space(8.0);
    }

    fn footer(&self, b: &mut PdfBuilder, data: &InvoiceData) {
        let cw = b.content_width();
        b.font(Font::Bold, 9.0);
        let words = format!("Amount in Words: {}", amount_in_words(data.final_amount));
        for text in b.wrap(&words, cw) {
            b.text_line(&text, Align::Left);
        }

        b.font(Font::Regular, 8.0).space(6.0);
        let declaration = "Declaration: We declare that this invoice shows the actual price of \
                           goods described and that all particulars are true and correct.";
        for text in b.wrap(declaration, cw) {
            b.text_line(&text, Align::Left);
        }

        b.space(12.0)
            .font(Font::Bold, 11.0)
            .text_line(
                &format!("Thank you for dining with {}!", self.branding.brand_name),
                Align::Center,
            )
            .font(Font::Regular, 9.0)
            .color(Color::GRAY)
            .text_line("Visit us again soon", Align::Center)
            .space(10.0)
            .font(Font::Regular, 7.0)
            .text_line(
                "This is a computer generated invoice. No signature required.",
                Align::Center,
            )
            .text_line(
                &format!(
                    "Generated on: {}",
                    data.generated_at.format("%d/%m/%Y %I:%M:%S %p")
                ),
                Align::Center,
            )
            .color(Color::BLACK);
    }
}

/// 把账单税额明细展开为打印行
///
/// "GST" 行拆为 CGST 与 SGST 两半，CGST 承担多出的 1 paisa，
/// 两行之和仍等于存储的税额。
pub(crate) fn printed_taxes(taxes: &[TaxLine]) -> Vec<PrintedTax> {
    let mut rows = Vec::with_capacity(taxes.len() + 1);
    for tax in taxes {
        let amount = round_money(to_decimal(tax.amount));
        let rate = to_decimal(tax.percentage);
        if tax.name.trim().eq_ignore_ascii_case("gst") {
            let half_rate = (rate / Decimal::TWO).normalize();
            let cgst = round_money(amount / Decimal::TWO);
            rows.push(PrintedTax {
                label: format!("CGST ({half_rate}%)"),
                amount: cgst,
            });
            rows.push(PrintedTax {
                label: format!("SGST ({half_rate}%)"),
                amount: amount - cgst,
            });
        } else {
            rows.push(PrintedTax {
                label: format!("{} ({}%)", tax.name, rate.normalize()),
                amount,
            });
        }
    }
    rows
}
