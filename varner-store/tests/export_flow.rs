use chrono::{Local, TimeZone};
use std::fs;
use varner_catalog::{seasonal, Catalog};
use varner_order::OrderForm;
use varner_store::{csv_export, summary_export, Config, ExportError, ExportKind};

fn configured_form(config: &Config) -> OrderForm {
    let catalog = Catalog::load(seasonal::fall_2025()).unwrap();
    OrderForm::open(&catalog, config.order.to_context().unwrap()).unwrap()
}

#[test]
fn test_configured_order_exports_both_files() {
    let config = Config::from_toml_str("[order]\npayment_terms = \"NET_30\"\n").unwrap();
    let mut form = configured_form(&config);
    form.customer_mut().business_name = "Hilltop Farm Stand".to_string();

    let straw = form.engine().line_id("STRAW BALES / BEST AVAILABLE").unwrap();
    let viola = form.engine().line_id("VIOLA / BLACK").unwrap();
    form.engine_mut().set_quantity(straw, "20").unwrap();
    form.engine_mut().set_quantity(viola, "4").unwrap();
    form.engine_mut().set_delivery(true).unwrap();
    form.engine_mut().set_delivery_fee("15.00".parse().unwrap()).unwrap();

    let snapshot = form.snapshot();
    let dir = tempfile::tempdir().unwrap();
    let at = Local.with_ymd_and_hms(2025, 10, 20, 14, 5, 0).unwrap();

    let csv_path = dir.path().join(ExportKind::Csv.default_file_name(at));
    csv_export::save_csv(&snapshot, &csv_path).unwrap();
    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.contains("Payment Terms,NET 30\r\n"));
    assert!(csv.contains("VIOLA,BLACK,4,10.30,41.20\r\n"));
    // 125.80 + 41.20 = 167.00, tax 10.02, delivery 15.00
    assert!(csv.ends_with("Total,192.02\r\n"));

    let summary_path = dir.path().join(ExportKind::Summary.default_file_name(at));
    summary_export::save_summary(&snapshot, &config.export.title, at, &summary_path).unwrap();
    let summary = fs::read_to_string(&summary_path).unwrap();
    assert!(summary.starts_with(&config.export.title));
    assert!(summary.contains("Fulfillment: DELIVERY | Delivery Fee: $15.00"));
    assert!(summary.ends_with("TOTAL:    $192.02"));
}

#[test]
fn test_reset_form_cannot_be_exported() {
    let config = Config::default();
    let mut form = configured_form(&config);
    let straw = form.engine().line_id("STRAW BALES / BEST AVAILABLE").unwrap();
    form.engine_mut().set_quantity(straw, "1").unwrap();
    form.reset().unwrap();

    assert!(matches!(csv_export::render_csv(&form.snapshot()), Err(ExportError::EmptyOrder)));
}

#[test]
fn test_unwritable_path_reports_io_error() {
    let config = Config::default();
    let mut form = configured_form(&config);
    let straw = form.engine().line_id("STRAW BALES / BEST AVAILABLE").unwrap();
    form.engine_mut().set_quantity(straw, "1").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("order.csv");
    let err = csv_export::save_csv(&form.snapshot(), &path).unwrap_err();
    assert!(matches!(err, ExportError::Io { .. }));
    assert!(err.to_string().contains("order.csv"));
}
