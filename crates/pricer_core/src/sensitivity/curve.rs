//! Curve-node sensitivities: curve name → list of (time, value).

use std::collections::BTreeMap;

/// Times closer than this are merged by [`CurveSensitivity::cleaned`].
const TIME_TOLERANCE: f64 = 1e-12;

/// Sparse present value sensitivity to zero rates, per curve.
///
/// Each entry `(t, s)` is ∂PV/∂r(t) for the continuously compounded zero
/// rate at time `t`. Entries are kept in insertion order and may repeat a
/// time until [`CurveSensitivity::cleaned`] is called.
///
/// # Example
///
/// ```
/// use pricer_core::sensitivity::CurveSensitivity;
///
/// let a = CurveSensitivity::of("Funding", vec![(1.0, 10.0), (2.0, 5.0)]);
/// let b = CurveSensitivity::of("Funding", vec![(1.0, -4.0)]);
/// let sum = a.plus(&b).cleaned();
/// assert_eq!(sum.get("Funding"), Some(&[(1.0, 6.0), (2.0, 5.0)][..]));
/// assert_eq!(sum.total(), 11.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveSensitivity {
    sensitivities: BTreeMap<String, Vec<(f64, f64)>>,
}

impl CurveSensitivity {
    /// An empty sensitivity.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sensitivity to a single curve.
    pub fn of(name: impl Into<String>, entries: Vec<(f64, f64)>) -> Self {
        let mut sensitivities = BTreeMap::new();
        sensitivities.insert(name.into(), entries);
        Self { sensitivities }
    }

    /// Entries for one curve.
    pub fn get(&self, name: &str) -> Option<&[(f64, f64)]> {
        self.sensitivities.get(name).map(Vec::as_slice)
    }

    /// Curve names present, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sensitivities.keys().map(String::as_str)
    }

    /// Whether no entry is present.
    pub fn is_empty(&self) -> bool {
        self.sensitivities.values().all(Vec::is_empty)
    }

    /// Concatenation of both entry lists, curve by curve.
    pub fn plus(&self, other: &CurveSensitivity) -> Self {
        let mut result = self.clone();
        for (name, entries) in &other.sensitivities {
            result
                .sensitivities
                .entry(name.clone())
                .or_default()
                .extend_from_slice(entries);
        }
        result
    }

    /// Every value scaled by `factor`.
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            sensitivities: self
                .sensitivities
                .iter()
                .map(|(name, entries)| {
                    (
                        name.clone(),
                        entries.iter().map(|&(t, s)| (t, s * factor)).collect(),
                    )
                })
                .collect(),
        }
    }

    /// Entries sorted by time with equal times merged by summation.
    pub fn cleaned(&self) -> Self {
        let sensitivities = self
            .sensitivities
            .iter()
            .map(|(name, entries)| {
                let mut sorted = entries.clone();
                sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
                let mut merged: Vec<(f64, f64)> = Vec::with_capacity(sorted.len());
                for (t, s) in sorted {
                    match merged.last_mut() {
                        Some(last) if (last.0 - t).abs() < TIME_TOLERANCE => last.1 += s,
                        _ => merged.push((t, s)),
                    }
                }
                (name.clone(), merged)
            })
            .collect();
        Self { sensitivities }
    }

    /// Sum of all values over all curves (parallel-shift sensitivity).
    pub fn total(&self) -> f64 {
        self.sensitivities
            .values()
            .flat_map(|entries| entries.iter().map(|&(_, s)| s))
            .sum()
    }

    /// Sum of the values of one curve.
    pub fn total_for(&self, name: &str) -> f64 {
        self.get(name)
            .map(|entries| entries.iter().map(|&(_, s)| s).sum())
            .unwrap_or(0.0)
    }

    /// Whether both sensitivities agree node by node after cleaning.
    ///
    /// A node missing on one side compares against zero.
    pub fn approx_eq(&self, other: &CurveSensitivity, tolerance: f64) -> bool {
        let left = self.cleaned();
        let right = other.cleaned();
        let names: std::collections::BTreeSet<&str> = left.names().chain(right.names()).collect();
        let matched = names.into_iter().all(|name| {
            let l = left.get(name).unwrap_or(&[]);
            let r = right.get(name).unwrap_or(&[]);
            nodes_match(l, r, tolerance) && nodes_match(r, l, tolerance)
        });
        matched
    }
}

fn nodes_match(left: &[(f64, f64)], right: &[(f64, f64)], tolerance: f64) -> bool {
    left.iter().all(|&(t, s)| {
        let other = right
            .iter()
            .find(|&&(u, _)| (u - t).abs() < TIME_TOLERANCE)
            .map(|&(_, v)| v)
            .unwrap_or(0.0);
        (s - other).abs() <= tolerance
    })
}
