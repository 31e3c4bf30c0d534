/// Property-based tests using proptest
/// Tests invariants that should hold for all scores and payloads
use client_onboarding::models::{NewClient, OfferTier, Score};
use client_onboarding::offers::{derive_offer, tier_for};
use client_onboarding::validation::validate_client;
use proptest::prelude::*;
use serde_json::{json, Value};

// Property: tiering is total and monotonic over [0, 1]
proptest! {
    #[test]
    fn every_score_gets_exactly_one_tier(value in 0.0f64..=1.0) {
        let tier = tier_for(Score::new(value).unwrap());
        let expected = if value > 0.8 {
            OfferTier::Premium
        } else if value > 0.5 {
            OfferTier::Extension
        } else {
            OfferTier::Review
        };
        prop_assert_eq!(tier, expected);
    }

    #[test]
    fn higher_score_never_worse_tier(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            tier_for(Score::new(low).unwrap()) <= tier_for(Score::new(high).unwrap())
        );
    }

    #[test]
    fn message_always_names_client(value in 0.0f64..=1.0, name in "[A-Za-z]{1,20}") {
        let offer = derive_offer(Score::new(value).unwrap(), &name);
        prop_assert!(offer.message.contains(&name));
    }
}

// Property: validation never panics and accepts every well-formed payload
proptest! {
    #[test]
    fn validation_never_panics(
        name in proptest::option::of("\\PC*"),
        age in proptest::option::of("\\PC*"),
        income in proptest::option::of(any::<i64>()),
        loans in proptest::option::of(any::<f64>())
    ) {
        let payload = NewClient {
            name: name.map(Value::from),
            age: age.map(Value::from),
            income: income.map(Value::from),
            loans: loans.map(Value::from),
        };
        let _ = validate_client(&payload);
    }

    #[test]
    fn well_formed_payloads_validate(
        name in "[A-Za-z][A-Za-z ]{0,30}",
        age in 1u32..=120,
        income in 0u32..=100_000,
        loans in 0u32..=50
    ) {
        let payload: NewClient = serde_json::from_value(json!({
            "name": name,
            "age": age,
            "income": income.to_string(),
            "loans": loans
        }))
        .unwrap();

        let input = validate_client(&payload).unwrap();
        prop_assert_eq!(input.name, name.trim());
        prop_assert_eq!(input.age, age);
        prop_assert_eq!(input.income, income);
        prop_assert_eq!(input.loans, loans);
    }
}
