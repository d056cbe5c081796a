/// Group-by mean aggregation
///
/// Groups keep the order in which their key first appears, so every
/// downstream sort starts from a deterministic sequence.
use rustc_hash::FxHashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq)]
pub struct MeanRow<K> {
    pub key: K,
    pub mean: f64,
    /// Number of non-null values that went into the mean
    pub count: usize,
}

/// Arithmetic mean of `value` grouped by `key`.
///
/// `None` values are skipped. A group with no values left produces no row.
pub fn mean_by<T, K, FK, FV>(items: impl IntoIterator<Item = T>, key: FK, value: FV) -> Vec<MeanRow<K>>
where
    K: Eq + Hash + Clone,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> Option<f64>,
{
    let mut index: FxHashMap<K, usize> = FxHashMap::default();
    let mut sums: Vec<(K, f64, usize)> = Vec::new();

    for item in items {
        let k = key(&item);
        let slot = *index.entry(k.clone()).or_insert_with(|| {
            sums.push((k, 0.0, 0));
            sums.len() - 1
        });

        if let Some(v) = value(&item) {
            let entry = &mut sums[slot];
            entry.1 += v;
            entry.2 += 1;
        }
    }

    sums.into_iter()
        .filter(|(_, _, count)| *count > 0)
        .map(|(key, sum, count)| MeanRow {
            key,
            mean: sum / count as f64,
            count,
        })
        .collect()
}

/// Sort ascending by mean. Stable, so ties keep their first-appearance order.
pub fn rank_ascending<K>(rows: &mut [MeanRow<K>]) {
    rows.sort_by(|a, b| a.mean.total_cmp(&b.mean));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_by_key() {
        let data = vec![("a", Some(1.0)), ("b", Some(10.0)), ("a", Some(3.0)), ("b", None)];

        let rows = mean_by(data, |(k, _)| *k, |(_, v)| *v);

        assert_eq!(
            rows,
            vec![
                MeanRow { key: "a", mean: 2.0, count: 2 },
                MeanRow { key: "b", mean: 10.0, count: 1 },
            ]
        );
    }

    #[test]
    fn test_all_null_group_produces_no_row() {
        let data = vec![("a", None), ("b", Some(4.0)), ("a", None)];

        let rows = mean_by(data, |(k, _)| *k, |(_, v)| *v);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "b");
    }

    #[test]
    fn test_empty_input() {
        let rows = mean_by(Vec::<(&str, Option<f64>)>::new(), |(k, _)| *k, |(_, v)| *v);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_rank_ascending_is_stable_on_ties() {
        let data = vec![
            ("slow", Some(30.0)),
            ("tie-first", Some(10.0)),
            ("fast", Some(5.0)),
            ("tie-second", Some(10.0)),
            ("tie-third", Some(10.0)),
        ];

        let mut rows = mean_by(data, |(k, _)| *k, |(_, v)| *v);
        rank_ascending(&mut rows);

        let keys: Vec<_> = rows.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["fast", "tie-first", "tie-second", "tie-third", "slow"]);
    }
}
