use crate::models::{ClientInput, FeatureVector};

/// Build the scoring feature vector from validated client attributes.
///
/// Order is `[age, income, loans]` and must match the scoring service's contract.
pub fn extract(input: &ClientInput) -> FeatureVector {
    FeatureVector::new(
        f64::from(input.age),
        f64::from(input.income),
        f64::from(input.loans),
    )
}
