//! Model-parameter sensitivities keyed by (expiry, tenor) or (expiry, strike).

/// Keys closer than this on both coordinates are merged by `cleaned`.
const KEY_TOLERANCE: f64 = 1e-12;

/// Sensitivity of a present value to a parameter surface.
///
/// # Example
///
/// ```
/// use pricer_core::sensitivity::SurfaceSensitivity;
///
/// let alpha = SurfaceSensitivity::of((5.0, 5.0), 1.2e6);
/// let twice = alpha.plus(&alpha).cleaned();
/// assert_eq!(twice.value_at(5.0, 5.0), Some(2.4e6));
/// assert_eq!(twice.value_at(1.0, 5.0), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceSensitivity {
    entries: Vec<((f64, f64), f64)>,
}

impl SurfaceSensitivity {
    /// An empty sensitivity.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A single entry.
    pub fn of(key: (f64, f64), value: f64) -> Self {
        Self {
            entries: vec![(key, value)],
        }
    }

    /// All entries in insertion order.
    #[inline]
    pub fn entries(&self) -> &[((f64, f64), f64)] {
        &self.entries
    }

    /// Concatenation of both entry lists.
    pub fn plus(&self, other: &SurfaceSensitivity) -> Self {
        let mut entries = self.entries.clone();
        entries.extend_from_slice(&other.entries);
        Self { entries }
    }

    /// Every value scaled by `factor`.
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            entries: self.entries.iter().map(|&(k, v)| (k, v * factor)).collect(),
        }
    }

    /// Entries sorted by key with equal keys merged by summation.
    pub fn cleaned(&self) -> Self {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| {
            a.0 .0
                .total_cmp(&b.0 .0)
                .then_with(|| a.0 .1.total_cmp(&b.0 .1))
        });
        let mut merged: Vec<((f64, f64), f64)> = Vec::with_capacity(sorted.len());
        for (key, value) in sorted {
            match merged.last_mut() {
                Some(last) if same_key(last.0, key) => last.1 += value,
                _ => merged.push((key, value)),
            }
        }
        Self { entries: merged }
    }

    /// Summed value at a key, if present.
    pub fn value_at(&self, first: f64, second: f64) -> Option<f64> {
        let mut found = None;
        for &(key, value) in &self.entries {
            if same_key(key, (first, second)) {
                *found.get_or_insert(0.0) += value;
            }
        }
        found
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|&(_, v)| v).sum()
    }
}

fn same_key(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 - b.0).abs() < KEY_TOLERANCE && (a.1 - b.1).abs() < KEY_TOLERANCE
}
