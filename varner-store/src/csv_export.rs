use csv::{Terminator, Writer, WriterBuilder};
use std::path::{Path, PathBuf};
use varner_order::OrderSnapshot;
use varner_shared::format_plain;

use crate::export::{ensure_has_items, write_export, ExportError, ExportKind};

/// Render the order as CSV: header block, item table, totals block.
pub fn render_csv(snapshot: &OrderSnapshot) -> Result<String, ExportError> {
    ensure_has_items(snapshot)?;

    let ctx = &snapshot.context;
    let customer = &snapshot.customer;
    let totals = &snapshot.totals;
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .flexible(true)
        .from_writer(Vec::new());

    let order_ref = snapshot.order_id.to_string();
    let tax_status = ctx.tax_status().to_string();
    let tax_rate = ctx.tax_rate().percent_display();
    let fulfillment = ctx.fulfillment().to_string();
    let terms = ctx.payment_terms().to_string();
    let delivery = format_plain(totals.delivery_fee);
    let header = [
        ("Order Reference", order_ref.as_str()),
        ("Business Name", customer.business_name.trim()),
        ("Contact Name", customer.contact_name.trim()),
        ("Cell Phone", customer.cell_phone.expose().trim()),
        ("Business Phone", customer.business_phone.expose().trim()),
        ("Payment Terms", terms.as_str()),
        ("Sales Tax Status", tax_status.as_str()),
        ("Sales Tax Rate (%)", tax_rate.as_str()),
        ("Fulfillment", fulfillment.as_str()),
        ("Delivery Fee", delivery.as_str()),
        ("Notes", snapshot.notes.trim()),
    ];
    for (label, value) in header {
        wtr.write_record([label, value])?;
    }

    blank_row(&mut wtr)?;
    wtr.write_record(["Group", "Item", "Qty", "Unit Price", "Line Total"])?;
    for line in snapshot.ordered_lines() {
        wtr.write_record([
            line.group.clone(),
            line.item.clone(),
            line.quantity.to_string(),
            format_plain(line.unit_price),
            format_plain(line.line_total),
        ])?;
    }

    blank_row(&mut wtr)?;
    let footer = [
        ("Subtotal", totals.subtotal),
        ("Sales Tax", totals.tax),
        ("Delivery", totals.delivery_fee),
        ("Total", totals.grand_total),
    ];
    for (label, amount) in footer {
        wtr.write_record([label.to_string(), format_plain(amount)])?;
    }

    let bytes = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn save_csv(snapshot: &OrderSnapshot, path: &Path) -> Result<PathBuf, ExportError> {
    let body = render_csv(snapshot)?;
    write_export(ExportKind::Csv, path, &body)
}

/// A bare line break. `write_record` would emit `""` for an empty record.
fn blank_row(wtr: &mut Writer<Vec<u8>>) -> csv::Result<()> {
    wtr.flush()?;
    wtr.get_mut().extend_from_slice(b"\r\n");
    Ok(())
}
