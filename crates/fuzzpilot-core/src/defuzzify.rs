//! Weighted-average defuzzification.

use fuzzpilot_types::WeightedPair;

/// Collapse one channel's weighted pairs into a crisp value.
///
/// Pairs with weight `<= 0` are skipped. The result is
/// `sum(weight * value) / sum(weight)` over the remaining pairs, or
/// `default_value` when no pair fired. The fallback is the designed
/// outcome for a quiet tick, not an error.
pub fn defuzzify(pairs: &[WeightedPair], default_value: f64) -> f64 {
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for pair in pairs.iter().filter(|p| p.weight > 0.0) {
        numerator += pair.weight * pair.value;
        denominator += pair.weight;
    }
    if denominator > 0.0 {
        numerator / denominator
    } else {
        default_value
    }
}
