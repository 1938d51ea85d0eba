//! Fuzzy AND and OR.
//!
//! Both take any iterator of degrees so antecedents can nest them freely
//! (`fuzzy_and([fuzzy_or([..]), x])`). An empty sequence is "no evidence"
//! and yields 0 for both, so an empty conjunction never fires.

/// Fuzzy AND: the minimum degree, or 0 for an empty sequence.
pub fn fuzzy_and<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().reduce(f64::min).unwrap_or(0.0)
}

/// Fuzzy OR: the maximum degree, or 0 for an empty sequence.
pub fn fuzzy_or<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().reduce(f64::max).unwrap_or(0.0)
}
