use proptest::prelude::*;
use rust_decimal::Decimal;
use varner_catalog::{Catalog, CatalogEntry};
use varner_order::{LineId, OrderContext, OrderTotalsEngine, RejectReason};
use varner_shared::Money;

fn catalog_from_cents(prices: &[i64]) -> Catalog {
    Catalog::load(
        prices
            .iter()
            .enumerate()
            .map(|(i, cents)| CatalogEntry::new(format!("Item {}", i), Decimal::new(*cents, 2))),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn subtotal_is_exact_sum_of_lines(
        lines in prop::collection::vec((0i64..100_000, 0u32..10_000), 0..25)
    ) {
        let prices: Vec<i64> = lines.iter().map(|(p, _)| *p).collect();
        let catalog = catalog_from_cents(&prices);
        let mut engine = OrderTotalsEngine::from_catalog(&catalog, OrderContext::default()).unwrap();

        for (i, (_, qty)) in lines.iter().enumerate() {
            engine.set_quantity(LineId(i), *qty).unwrap();
        }

        let expected: i64 = lines.iter().map(|(p, q)| p * i64::from(*q)).sum();
        prop_assert_eq!(engine.totals().subtotal, Money::from_cents(expected));
    }

    #[test]
    fn delivery_toggle_moves_total_by_fee_only(
        qty in 0u32..500,
        fee_cents in 0i64..20_000
    ) {
        let catalog = catalog_from_cents(&[1200, 850]);
        let mut engine = OrderTotalsEngine::from_catalog(&catalog, OrderContext::default()).unwrap();
        engine.set_quantity(LineId(0), qty).unwrap();
        engine.set_quantity(LineId(1), qty / 2).unwrap();

        engine.set_delivery(true).unwrap();
        let fee = Money::from_cents(fee_cents);
        let on = engine.set_delivery_fee(fee).unwrap();
        let off = engine.set_delivery(false).unwrap();

        prop_assert_eq!(on.tax, off.tax);
        prop_assert_eq!(on.grand_total.checked_sub(off.grand_total).unwrap(), fee);
    }

    #[test]
    fn recompute_is_a_pure_function_of_state(qtys in prop::collection::vec(0u32..1_000, 2)) {
        let catalog = catalog_from_cents(&[1200, 850]);
        let mut engine = OrderTotalsEngine::from_catalog(&catalog, OrderContext::default()).unwrap();
        engine.set_quantity(LineId(0), qtys[0]).unwrap();
        engine.set_quantity(LineId(1), qtys[1]).unwrap();
        let live = engine.totals();

        // a fresh engine driven straight to the same state agrees
        let mut fresh = OrderTotalsEngine::from_catalog(&catalog, OrderContext::default()).unwrap();
        fresh.set_quantity(LineId(1), qtys[1]).unwrap();
        fresh.set_quantity(LineId(0), qtys[0]).unwrap();

        prop_assert_eq!(live, fresh.totals());
        prop_assert_eq!(live, engine.recompute().unwrap());
    }
}

#[test]
fn scenario_pickup() {
    let catalog = Catalog::load(vec![
        CatalogEntry::new("Mums", Decimal::new(1200, 2)),
        CatalogEntry::new("Pansies", Decimal::new(850, 2)),
    ])
    .unwrap();
    let mut engine = OrderTotalsEngine::from_catalog(&catalog, OrderContext::default()).unwrap();
    engine.set_quantity(LineId(0), "3").unwrap();
    engine.set_quantity(LineId(1), "2").unwrap();

    let totals = engine.totals();
    assert_eq!(totals.subtotal, Money::from_cents(5300));
    assert_eq!(totals.tax, Money::from_cents(318));
    assert_eq!(totals.grand_total, Money::from_cents(5618));

    engine.set_delivery(true).unwrap();
    let totals = engine.set_delivery_fee(Money::from_cents(1500)).unwrap();
    assert_eq!(totals.tax, Money::from_cents(318));
    assert_eq!(totals.grand_total, Money::from_cents(7118));
}

#[test]
fn scenario_all_zero() {
    let catalog = Catalog::load(vec![
        CatalogEntry::new("Mums", Decimal::new(1200, 2)),
        CatalogEntry::new("Pansies", Decimal::new(850, 2)),
    ])
    .unwrap();
    let mut engine = OrderTotalsEngine::from_catalog(&catalog, OrderContext::default()).unwrap();
    engine.set_quantity(LineId(0), "0").unwrap();

    assert_eq!(engine.totals().grand_total, Money::ZERO);

    let totals = engine.set_delivery(true).unwrap();
    assert_eq!(totals.subtotal, Money::ZERO);
    assert_eq!(totals.tax, Money::ZERO);
    assert_eq!(totals.grand_total, Money::from_cents(4000));
}

#[test]
fn empty_catalog_totals_only_delivery() {
    let mut engine = OrderTotalsEngine::from_catalog(&Catalog::default(), OrderContext::default()).unwrap();
    assert_eq!(engine.totals().grand_total, Money::ZERO);
    let totals = engine.set_delivery(true).unwrap();
    assert_eq!(totals.grand_total, Money::from_cents(4000));
}

#[test]
fn invalid_inputs_coerce_without_touching_other_lines() {
    let catalog = Catalog::load(vec![
        CatalogEntry::new("Mums", Decimal::new(1200, 2)),
        CatalogEntry::new("Pansies", Decimal::new(850, 2)),
    ])
    .unwrap();
    let mut engine = OrderTotalsEngine::from_catalog(&catalog, OrderContext::default()).unwrap();
    engine.set_quantity(LineId(0), "3").unwrap();

    for (raw, reason) in [("abc", RejectReason::NotANumber), ("-5", RejectReason::Negative), ("  ", RejectReason::Blank)] {
        engine.set_quantity(LineId(1), "4").unwrap();
        let change = engine.set_quantity(LineId(1), raw).unwrap();

        assert_eq!(change.rejection.unwrap().reason, reason);
        let pansies = engine.line(LineId(1)).unwrap();
        assert_eq!(pansies.quantity(), 0);
        assert_eq!(pansies.line_total(), Money::ZERO);
        assert_eq!(engine.line(LineId(0)).unwrap().line_total(), Money::from_cents(3600));
        assert_eq!(engine.totals().subtotal, Money::from_cents(3600));
    }
}
