/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Index of the largest key. Ties keep the earliest index.
pub fn argmax_by<T, K: PartialOrd>(items: &[T], key: impl Fn(&T) -> K) -> Option<usize> {
    first_extreme(items, key, |candidate, best| candidate > best)
}

/// Index of the smallest key. Ties keep the earliest index.
pub fn argmin_by<T, K: PartialOrd>(items: &[T], key: impl Fn(&T) -> K) -> Option<usize> {
    first_extreme(items, key, |candidate, best| candidate < best)
}

fn first_extreme<T, K>(
    items: &[T],
    key: impl Fn(&T) -> K,
    beats: impl Fn(&K, &K) -> bool,
) -> Option<usize> {
    let mut iter = items.iter().enumerate();
    let (mut best_idx, first) = iter.next()?;
    let mut best = key(first);

    for (idx, item) in iter {
        let candidate = key(item);
        // strict comparison: an equal value never displaces an earlier one
        if beats(&candidate, &best) {
            best_idx = idx;
            best = candidate;
        }
    }

    Some(best_idx)
}
