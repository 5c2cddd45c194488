//! Tolerance-based clustering of coordinates into grid lines.

use std::collections::HashMap;

use ordered_float::OrderedFloat;

pub(crate) type KeyF64 = OrderedFloat<f64>;

#[inline]
pub(crate) fn key_f64(v: f64) -> KeyF64 {
    OrderedFloat(v)
}

/// Cluster a list of f64 values based on tolerance.
///
/// Values are sorted first; a value joins the current cluster when it lies
/// within `tolerance` of the previous value.
pub fn cluster_list(mut xs: Vec<f64>, tolerance: f64) -> Vec<Vec<f64>> {
    xs.sort_by(|a, b| a.total_cmp(b));
    if xs.is_empty() {
        return Vec::new();
    }
    if tolerance == 0.0 || xs.len() < 2 {
        let mut out: Vec<Vec<f64>> = Vec::new();
        for x in xs {
            match out.last_mut() {
                Some(last) if last[0] == x => last.push(x),
                _ => out.push(vec![x]),
            }
        }
        return out;
    }
    let mut groups: Vec<Vec<f64>> = Vec::new();
    let mut current: Vec<f64> = vec![xs[0]];
    let mut last = xs[0];
    for x in xs.into_iter().skip(1) {
        if x <= last + tolerance {
            current.push(x);
        } else {
            groups.push(current);
            current = vec![x];
        }
        last = x;
    }
    groups.push(current);
    groups
}

/// Create a mapping from values to their cluster indices.
pub(crate) fn make_cluster_dict(values: Vec<f64>, tolerance: f64) -> HashMap<KeyF64, usize> {
    let mut dict = HashMap::new();
    for (i, cluster) in cluster_list(values, tolerance).into_iter().enumerate() {
        for val in cluster {
            dict.insert(key_f64(val), i);
        }
    }
    dict
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clusters_within_tolerance() {
        let groups = cluster_list(vec![10.0, 0.0, 0.5, 10.4, 30.0], 1.0);
        assert_eq!(groups, vec![vec![0.0, 0.5], vec![10.0, 10.4], vec![30.0]]);
    }

    #[test]
    fn zero_tolerance_merges_only_equal_values() {
        let groups = cluster_list(vec![2.0, 1.0, 2.0], 0.0);
        assert_eq!(groups, vec![vec![1.0], vec![2.0, 2.0]]);
        let dict = make_cluster_dict(vec![2.0, 1.0, 2.0], 0.0);
        assert_eq!(dict[&key_f64(2.0)], 1);
    }
}
