/// Symmetric outlier trimming for repeated micro-benchmark runs
///
/// Each group is sorted by value, then `per_side` samples are dropped from
/// both ends. Groups smaller than the policy's minimum retain nothing and
/// contribute no row to any later mean.
use rustc_hash::FxHashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimPolicy {
    /// Samples dropped from each end after sorting
    pub per_side: usize,
    /// Smallest group that is trimmed at all; smaller groups are excluded
    pub min_group: usize,
}

impl Default for TrimPolicy {
    fn default() -> Self {
        Self {
            per_side: 2,
            min_group: 5,
        }
    }
}

impl TrimPolicy {
    pub fn new(per_side: usize, min_group: usize) -> Self {
        Self { per_side, min_group }
    }

    /// Minimum size actually enforced: at least one sample must survive the trim
    pub fn effective_min_group(&self) -> usize {
        self.min_group
            .max(self.per_side.saturating_mul(2).saturating_add(1))
    }

    /// Sort ascending and drop the extremes. Undersized groups yield nothing.
    pub fn trim(&self, mut values: Vec<f64>) -> Vec<f64> {
        if values.len() < self.effective_min_group() {
            return Vec::new();
        }

        values.sort_by(|a, b| a.total_cmp(b));
        let end = values.len() - self.per_side;
        values[self.per_side..end].to_vec()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrimmedGroup<K> {
    pub key: K,
    /// Samples in the group before trimming
    pub original_len: usize,
    /// Survivors, ascending
    pub retained: Vec<f64>,
}

impl<K> TrimmedGroup<K> {
    pub fn is_excluded(&self) -> bool {
        self.retained.is_empty()
    }
}

/// Group `items` by `key` (first-appearance order) and trim each group
pub fn trim_groups<T, K, FK, FV>(
    items: impl IntoIterator<Item = T>,
    key: FK,
    value: FV,
    policy: &TrimPolicy,
) -> Vec<TrimmedGroup<K>>
where
    K: Eq + Hash + Clone,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> f64,
{
    let mut index: FxHashMap<K, usize> = FxHashMap::default();
    let mut groups: Vec<(K, Vec<f64>)> = Vec::new();

    for item in items {
        let k = key(&item);
        let slot = *index.entry(k.clone()).or_insert_with(|| {
            groups.push((k, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(value(&item));
    }

    groups
        .into_iter()
        .map(|(key, values)| TrimmedGroup {
            key,
            original_len: values.len(),
            retained: policy.trim(values),
        })
        .collect()
}
