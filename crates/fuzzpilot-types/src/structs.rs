//! Core value types: trapezoids, linguistic variables, fuzzy sets.
//!
//! [`LinguisticVariable`] and the rule tables are long-lived, immutable
//! configuration. [`FuzzySet`] and [`WeightedPair`] are per-tick values
//! that borrow from that configuration and are dropped at the end of the
//! tick.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Trapezoid
// ---------------------------------------------------------------------------

/// A trapezoidal membership function `(a, b, c, d)`.
///
/// Membership rises from 0 at `a` (left foot) to 1 at `b` (left shoulder),
/// stays at 1 until `c` (right shoulder), then falls back to 0 at `d`
/// (right foot). The feet may lie outside the variable's range to model
/// saturating membership at the extremes.
///
/// Serialized as a four-element array `[a, b, c, d]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Trapezoid {
    /// Left foot: membership is 0 at or below this point.
    pub a: f64,
    /// Left shoulder: membership reaches 1 here.
    pub b: f64,
    /// Right shoulder: membership is 1 up to here.
    pub c: f64,
    /// Right foot: membership is 0 at or above this point.
    pub d: f64,
}

impl Trapezoid {
    /// Create a trapezoid from its four corner points.
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// Whether the corners satisfy `a <= b <= c <= d` and are all finite.
    pub fn is_well_formed(&self) -> bool {
        self.corners().iter().all(|v| v.is_finite())
            && self.a <= self.b
            && self.b <= self.c
            && self.c <= self.d
    }

    /// The corners as an array `[a, b, c, d]`.
    pub const fn corners(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Map every corner from raw units into the normalized space of `range`.
    pub fn normalized(&self, range: NormalizationRange) -> Self {
        Self {
            a: range.normalize(self.a),
            b: range.normalize(self.b),
            c: range.normalize(self.c),
            d: range.normalize(self.d),
        }
    }
}

impl From<[f64; 4]> for Trapezoid {
    fn from([a, b, c, d]: [f64; 4]) -> Self {
        Self { a, b, c, d }
    }
}

impl From<Trapezoid> for [f64; 4] {
    fn from(t: Trapezoid) -> Self {
        t.corners()
    }
}

// ---------------------------------------------------------------------------
// Normalization range
// ---------------------------------------------------------------------------

/// The raw-unit interval `[min, max]` that maps onto `[0, 1]`.
///
/// Serialized as a two-element array `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct NormalizationRange {
    /// Raw value that normalizes to 0.
    pub min: f64,
    /// Raw value that normalizes to 1.
    pub max: f64,
}

impl NormalizationRange {
    /// Create a range. Validity (`max > min`) is checked at config load.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the range in raw units.
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Map a raw value into normalized space.
    ///
    /// Not clamped: values outside `[min, max]` extrapolate linearly and
    /// rely on the trapezoid feet to saturate.
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / self.width()
    }
}

impl From<[f64; 2]> for NormalizationRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<NormalizationRange> for [f64; 2] {
    fn from(r: NormalizationRange) -> Self {
        [r.min, r.max]
    }
}

// ---------------------------------------------------------------------------
// Linguistic variable
// ---------------------------------------------------------------------------

/// One labeled membership function of a linguistic variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Label, unique within its variable (e.g. `"danger"`).
    pub label: String,
    /// Membership function in normalized `[0, 1]` space.
    pub trapezoid: Trapezoid,
}

/// A named fuzzy vocabulary over one kind of sensor reading.
///
/// Members are kept in declaration order; fuzzification evaluates them in
/// that order. Trapezoids may overlap and need not sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinguisticVariable {
    /// Variable name (e.g. `"distance"`).
    pub name: String,
    /// Raw-unit range mapped onto `[0, 1]`.
    pub range: NormalizationRange,
    /// Ordered `(label, trapezoid)` pairs, trapezoids already normalized.
    pub members: Vec<Member>,
}

impl LinguisticVariable {
    /// Look up a member by label.
    pub fn member(&self, label: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.label == label)
    }

    /// Whether `label` is one of this variable's labels.
    pub fn has_label(&self, label: &str) -> bool {
        self.member(label).is_some()
    }

    /// Labels in declaration order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.label.as_str())
    }
}

// ---------------------------------------------------------------------------
// Fuzzy set
// ---------------------------------------------------------------------------

/// Label to degree mapping produced by fuzzifying one input for one tick.
///
/// Labels are borrowed from the immutable configuration, so building a set
/// never copies strings. Entries keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuzzySet<'a> {
    entries: Vec<(&'a str, f64)>,
}

impl<'a> FuzzySet<'a> {
    /// Create an empty set.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create an empty set with room for `capacity` labels.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Set the degree of `label`, replacing any previous value.
    pub fn insert(&mut self, label: &'a str, degree: f64) {
        if let Some(entry) = self.entries.iter_mut().find(|(l, _)| *l == label) {
            entry.1 = degree;
        } else {
            self.entries.push((label, degree));
        }
    }

    /// Degree of `label`, or `None` if the label is not in the set.
    pub fn degree(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|&(_, d)| d)
    }

    /// Iterate `(label, degree)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of labels in the set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no labels.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, f64)> for FuzzySet<'a> {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (label, degree) in iter {
            set.insert(label, degree);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// Weighted pair
// ---------------------------------------------------------------------------

/// A fired rule's contribution to one output channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedPair {
    /// Rule strength in `[0, 1]`.
    pub weight: f64,
    /// Crisp consequent value.
    pub value: f64,
}

impl WeightedPair {
    /// Create a pair.
    pub const fn new(weight: f64, value: f64) -> Self {
        Self { weight, value }
    }
}
