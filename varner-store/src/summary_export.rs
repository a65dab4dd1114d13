use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use varner_order::OrderSnapshot;
use varner_shared::{format_currency, format_plain};

use crate::export::{ensure_has_items, write_export, ExportError, ExportKind};

const HEADER_RULE: usize = 80;
const TABLE_RULE: usize = 95;
const GROUP_WIDTH: usize = 34;
const ITEM_WIDTH: usize = 28;

/// Printable plain-text order summary.
pub fn render_summary(snapshot: &OrderSnapshot, title: &str, printed_at: DateTime<Local>) -> Result<String, ExportError> {
    ensure_has_items(snapshot)?;

    let ctx = &snapshot.context;
    let customer = &snapshot.customer;
    let totals = &snapshot.totals;
    let notes = snapshot.notes.trim();

    let mut lines = vec![
        title.to_string(),
        "-".repeat(HEADER_RULE),
        format!("Date: {}", printed_at.format("%Y-%m-%d %H:%M")),
        format!("Order Ref: {}", snapshot.order_id),
        format!("Business: {}", customer.business_name.trim()),
        format!(
            "Contact: {} | Cell: {} | Business: {}",
            customer.contact_name.trim(),
            customer.cell_phone.expose().trim(),
            customer.business_phone.expose().trim()
        ),
        format!(
            "Terms: {} | Tax Status: {} ({}%)",
            ctx.payment_terms(),
            ctx.tax_status(),
            ctx.tax_rate().percent_display()
        ),
        format!(
            "Fulfillment: {} | Delivery Fee: {}",
            ctx.fulfillment(),
            format_currency(totals.delivery_fee)
        ),
        "Notes on combos:".to_string(),
        if notes.is_empty() { "-".to_string() } else { notes.to_string() },
        String::new(),
        table_row("Group", "Item", "Qty", "Unit", "Line Total"),
        "-".repeat(TABLE_RULE),
    ];

    for line in snapshot.ordered_lines() {
        lines.push(table_row(
            &clip(&line.group, GROUP_WIDTH),
            &clip(&line.item, ITEM_WIDTH),
            &line.quantity.to_string(),
            &format_plain(line.unit_price),
            &format_plain(line.line_total),
        ));
    }

    lines.push("-".repeat(TABLE_RULE));
    lines.push(format!("Subtotal: {}", format_currency(totals.subtotal)));
    lines.push(format!("Sales Tax: {}", format_currency(totals.tax)));
    lines.push(format!("Delivery: {}", format_currency(totals.delivery_fee)));
    lines.push(format!("TOTAL:    {}", format_currency(totals.grand_total)));

    Ok(lines.join("\n"))
}

pub fn save_summary(
    snapshot: &OrderSnapshot,
    title: &str,
    printed_at: DateTime<Local>,
    path: &Path,
) -> Result<PathBuf, ExportError> {
    let body = render_summary(snapshot, title, printed_at)?;
    write_export(ExportKind::Summary, path, &body)
}

fn table_row(group: &str, item: &str, qty: &str, unit: &str, total: &str) -> String {
    format!(
        "{:<gw$}  {:<iw$}  {:>5}  {:>10}  {:>12}",
        group,
        item,
        qty,
        unit,
        total,
        gw = GROUP_WIDTH,
        iw = ITEM_WIDTH
    )
}

fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}
