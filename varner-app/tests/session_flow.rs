use std::fs;
use varner_app::{run_session, Session};
use varner_catalog::{seasonal, Catalog};
use varner_order::{OrderContext, OrderForm};
use varner_shared::Money;
use varner_store::app_config::ExportConfig;

fn session(export_dir: &str) -> Session {
    let catalog = Catalog::load(seasonal::fall_2025()).unwrap();
    let form = OrderForm::open(&catalog, OrderContext::default()).unwrap();
    let export = ExportConfig {
        directory: export_dir.to_string(),
        ..ExportConfig::default()
    };
    Session::new(form, export)
}

fn run(session: &mut Session, script: &str) -> String {
    let mut out = Vec::new();
    run_session(session, script.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_every_edit_echoes_live_totals() {
    let mut session = session(".");
    // line 1 is PANSY MIXES / AUTUMN MIX at 10.30
    let output = run(
        &mut session,
        "# pick up order\n\
         set 1 5\n\
         delivery on\n\
         fee 15.00\n",
    );
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(
        lines,
        vec![
            "subtotal $51.50 | tax $3.09 | delivery $0.00 | total $54.59",
            "subtotal $51.50 | tax $3.09 | delivery $40.00 | total $94.59",
            "subtotal $51.50 | tax $3.09 | delivery $15.00 | total $69.59",
        ]
    );
    assert_eq!(session.form().engine().totals().grand_total, Money::from_cents(6959));
}

#[test]
fn test_errors_do_not_end_the_session() {
    let mut session = session(".");
    let output = run(
        &mut session,
        "frobnicate\n\
         set 99 1\n\
         fee -3\n\
         set 2 abc\n\
         set 2 4\n\
         quit\n\
         set 2 100\n",
    );
    let lines: Vec<&str> = output.lines().collect();

    assert!(lines[0].starts_with("error: Unknown command: frobnicate"));
    assert!(lines[1].starts_with("error: No line 99"));
    assert!(lines[2].starts_with("error:"));
    assert!(lines[3].starts_with("line 2 flagged:"));
    assert_eq!(lines[4], "subtotal $0.00 | tax $0.00 | delivery $0.00 | total $0.00");
    assert_eq!(lines[5], "subtotal $41.20 | tax $2.47 | delivery $0.00 | total $43.67");
    // nothing after quit runs
    assert_eq!(lines.len(), 6);
}

#[test]
fn test_reset_publishes_once() {
    let mut session = session(".");
    let output = run(&mut session, "business Greenleaf\nset 1 3\nexempt on\nreset\n");
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines[0], "subtotal $30.90 | tax $1.85 | delivery $0.00 | total $32.75");
    assert_eq!(lines[1], "subtotal $30.90 | tax $0.00 | delivery $0.00 | total $30.90");
    assert_eq!(lines[2], "form cleared");
    assert_eq!(lines[3], "subtotal $0.00 | tax $0.00 | delivery $0.00 | total $0.00");
    assert_eq!(lines.len(), 4);
    assert!(session.form().customer().business_name.is_empty());
}

#[test]
fn test_exports_from_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session(&dir.path().to_string_lossy());

    let csv_path = dir.path().join("order.csv");
    let output = run(
        &mut session,
        &format!("csv {}\nset 20 2\ncsv {}\nsummary\n", csv_path.display(), csv_path.display()),
    );
    let lines: Vec<&str> = output.lines().collect();

    assert!(lines[0].starts_with("error: No items on the order"));
    assert!(lines[2].starts_with("saved "));
    assert!(fs::read_to_string(&csv_path).unwrap().contains("STRAW BALES,BEST AVAILABLE,2,6.29,12.58"));

    let summaries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("varners_order_summary_"))
        .collect();
    assert_eq!(summaries.len(), 1);
}
