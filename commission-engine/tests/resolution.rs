use chrono::{Duration, TimeZone, Utc};
use commission_core::{CommissionRule, OrderContext, OrderValueBounds, RateSpec, RuleScope, TierBand};
use commission_engine::{CalculationError, EngineConfig, RateCalculator, ResolutionError, RuleResolver};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

struct Marketplace {
    vendor: Uuid,
    electronics: Uuid,
    phone: Uuid,
    rules: Vec<CommissionRule>,
}

/// Catalog shaped like the admin app's seeded rules
fn marketplace() -> Marketplace {
    let vendor = Uuid::new_v4();
    let electronics = Uuid::new_v4();
    let phone = Uuid::new_v4();

    let rules = vec![
        CommissionRule::new("Default Commission", RuleScope::Global, RateSpec::percentage(dec!(10.0)), 100),
        CommissionRule::new(
            "Electronics Commission",
            RuleScope::categories([electronics]),
            RateSpec::percentage(dec!(5.0)),
            10,
        )
        .with_description("Reduced rate for the electronics category"),
        CommissionRule::new(
            "High-Value Orders",
            RuleScope::Global,
            RateSpec::tiered(vec![
                TierBand::new(dec!(500000), dec!(1000000), dec!(4.0)),
                TierBand::new(dec!(1000000), dec!(2000000), dec!(3.5)),
                TierBand::new(dec!(2000000), dec!(999999999), dec!(3.0)),
            ]),
            1,
        )
        .with_bounds(OrderValueBounds::new(Some(dec!(500000)), None)),
        CommissionRule::new("Premium Vendor Flat Fee", RuleScope::vendors([vendor]), RateSpec::fixed(dec!(2500)), 50),
    ];

    Marketplace {
        vendor,
        electronics,
        phone,
        rules,
    }
}

#[test]
fn electronics_order_uses_category_rate() {
    let market = marketplace();
    let order = OrderContext::new(Uuid::new_v4(), Some(market.electronics), market.phone, dec!(250000));

    let resolution = RuleResolver::default().resolve(&order, &market.rules).unwrap();
    assert_eq!(resolution.rule.name, "Electronics Commission");
    assert_eq!(resolution.rule.description.as_deref(), Some("Reduced rate for the electronics category"));
    assert_eq!(resolution.commission_rate, dec!(5.0));
    assert_eq!(resolution.commission_amount, dec!(12500));
}

#[test]
fn high_value_order_uses_band_rate() {
    let market = marketplace();
    let order = OrderContext::new(Uuid::new_v4(), Some(market.electronics), market.phone, dec!(750000));

    let resolution = RuleResolver::default().resolve(&order, &market.rules).unwrap();
    assert_eq!(resolution.rule.name, "High-Value Orders");
    assert_eq!(resolution.commission_rate, dec!(4.0));
    assert_eq!(resolution.commission_amount, dec!(30000));
}

#[test]
fn vendor_flat_fee_outranks_default() {
    let market = marketplace();
    let order = OrderContext::new(market.vendor, None, market.phone, dec!(40000));

    let resolution = RuleResolver::default().resolve(&order, &market.rules).unwrap();
    assert_eq!(resolution.rule.name, "Premium Vendor Flat Fee");
    assert_eq!(resolution.commission_amount, dec!(2500));
    assert_eq!(resolution.commission_rate, dec!(6.25));
}

#[test]
fn unmatched_order_falls_back_to_global() {
    let market = marketplace();
    let order = OrderContext::new(Uuid::new_v4(), None, Uuid::new_v4(), dec!(1000));

    let resolution = RuleResolver::default().resolve(&order, &market.rules).unwrap();
    assert_eq!(resolution.rule.name, "Default Commission");
    assert_eq!(resolution.commission_amount, dec!(100));
}

#[test]
fn product_rule_beats_global_at_equal_priority() {
    let product = Uuid::new_v4();
    let global = CommissionRule::new("Global", RuleScope::Global, RateSpec::percentage(dec!(8)), 20);
    let specific = CommissionRule::new("Product", RuleScope::products([product]), RateSpec::percentage(dec!(3)), 20);
    let order = OrderContext::new(Uuid::new_v4(), None, product, dec!(1000));

    for rules in [vec![global.clone(), specific.clone()], vec![specific.clone(), global.clone()]] {
        let resolution = RuleResolver::default().resolve(&order, &rules).unwrap();
        assert_eq!(resolution.rule.id, specific.id);
    }
}

#[test]
fn lower_priority_value_wins_regardless_of_creation_order() {
    let order = OrderContext::new(Uuid::new_v4(), None, Uuid::new_v4(), dec!(1000));
    let mut first = CommissionRule::new("B", RuleScope::Global, RateSpec::percentage(dec!(2)), 2);
    let mut second = CommissionRule::new("A", RuleScope::Global, RateSpec::percentage(dec!(1)), 1);
    first.created_at = Utc::now() - Duration::days(30);
    second.created_at = Utc::now();

    let rules = vec![first, second.clone()];
    let resolution = RuleResolver::default().resolve(&order, &rules).unwrap();
    assert_eq!(resolution.rule.id, second.id);
}

#[test]
fn missing_safety_net_is_a_typed_error() {
    let market = marketplace();
    let rules: Vec<CommissionRule> = market
        .rules
        .into_iter()
        .filter(|rule| !rule.is_safety_net())
        .collect();
    let order = OrderContext::new(Uuid::new_v4(), None, Uuid::new_v4(), dec!(1000));

    let err = RuleResolver::default().resolve(&order, &rules).unwrap_err();
    assert!(matches!(err, ResolutionError::NoApplicableRule { .. }));
}

#[test]
fn repeated_resolution_is_byte_identical() {
    let market = marketplace();
    let order = OrderContext::new(market.vendor, Some(market.electronics), market.phone, dec!(1250000));
    let resolver = RuleResolver::new(&EngineConfig::default());

    let first = serde_json::to_string(&resolver.resolve(&order, &market.rules).unwrap()).unwrap();
    for _ in 0..10 {
        let again = serde_json::to_string(&resolver.resolve(&order, &market.rules).unwrap()).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn band_gap_and_overlap_errors() {
    let calculator = RateCalculator::default();

    let gap = RateSpec::tiered(vec![
        TierBand::new(dec!(0), dec!(100), dec!(5.0)),
        TierBand::new(dec!(200), dec!(300), dec!(3.0)),
    ]);
    assert_eq!(
        calculator.compute(&gap, dec!(150)),
        Err(CalculationError::NoMatchingBand { amount: dec!(150) })
    );

    let overlap = RateSpec::tiered(vec![
        TierBand::new(dec!(0), dec!(100), dec!(5.0)),
        TierBand::new(dec!(50), dec!(150), dec!(3.0)),
    ]);
    assert!(matches!(
        calculator.compute(&overlap, dec!(20)),
        Err(CalculationError::InvalidBands(_))
    ));
}

fn arb_scope(order: &OrderContext) -> impl Strategy<Value = RuleScope> {
    let vendor = order.vendor_id;
    let category = order.category_id.unwrap_or_else(Uuid::nil);
    let product = order.product_id;
    prop_oneof![
        Just(RuleScope::Global),
        any::<bool>().prop_map(move |hit| RuleScope::vendors([if hit { vendor } else { Uuid::nil() }])),
        any::<bool>().prop_map(move |hit| RuleScope::categories([if hit { category } else { Uuid::nil() }])),
        any::<bool>().prop_map(move |hit| RuleScope::products([if hit { product } else { Uuid::nil() }])),
    ]
}

fn arb_rules(order: OrderContext) -> impl Strategy<Value = Vec<CommissionRule>> {
    let rule = (
        arb_scope(&order),
        0i32..5,
        any::<bool>(),
        0u32..2000,
        0i64..3,
        any::<u128>(),
        proptest::option::of(0i64..500000),
    )
        .prop_map(|(scope, priority, active, rate_bp, age_days, id, max)| {
            let mut rule = CommissionRule::new("Generated", scope, RateSpec::percentage(Decimal::new(rate_bp as i64, 2)), priority);
            rule.id = Uuid::from_u128(id);
            rule.is_active = active;
            rule.updated_at = Utc.timestamp_opt(1_700_000_000 - age_days * 86_400, 0).unwrap();
            if let Some(max) = max {
                rule = rule.with_bounds(OrderValueBounds::new(None, Some(Decimal::from(max))));
            }
            rule
        });
    proptest::collection::vec(rule, 0..12)
}

fn fixed_order() -> OrderContext {
    OrderContext::new(
        Uuid::from_u128(1),
        Some(Uuid::from_u128(2)),
        Uuid::from_u128(3),
        dec!(250000),
    )
}

proptest! {
    #[test]
    fn resolution_is_deterministic(rules in arb_rules(fixed_order())) {
        let order = fixed_order();
        let resolver = RuleResolver::default();

        let first = resolver.resolve(&order, &rules).map(|r| r.rule.id).ok();
        let second = resolver.resolve(&order, &rules).map(|r| r.rule.id).ok();
        prop_assert_eq!(first, second);

        let mut reversed = rules.clone();
        reversed.reverse();
        let third = resolver.resolve(&order, &reversed).map(|r| r.rule.id).ok();
        prop_assert_eq!(first, third);
    }

    #[test]
    fn safety_net_always_resolves(
        rules in arb_rules(fixed_order()),
        amount in 0i64..10_000_000,
        priority in -10i32..10,
    ) {
        let mut rules = rules;
        rules.push(CommissionRule::new("Safety Net", RuleScope::Global, RateSpec::percentage(dec!(10)), priority));
        let order = OrderContext { amount: Decimal::from(amount), ..fixed_order() };

        prop_assert!(RuleResolver::default().resolve(&order, &rules).is_ok());
    }
}
