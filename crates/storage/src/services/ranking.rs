/// Sorts by `metric` descending. The sort is stable: items with equal metrics
/// keep their input order, and there is no secondary tie-break.
pub fn rank_descending<T, M, F>(mut items: Vec<T>, metric: F) -> Vec<T>
where
    M: PartialOrd,
    F: Fn(&T) -> M,
{
    items.sort_by(|a, b| {
        metric(b)
            .partial_cmp(&metric(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    items
}

/// [`rank_descending`] truncated to the first `n` items.
pub fn top_n<T, M, F>(items: Vec<T>, n: usize, metric: F) -> Vec<T>
where
    M: PartialOrd,
    F: Fn(&T) -> M,
{
    let mut ranked = rank_descending(items, metric);
    ranked.truncate(n);
    ranked
}
