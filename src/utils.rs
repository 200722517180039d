//! Small numeric helpers shared by responders and observers

use rand::{Rng, distr::StandardUniform, prelude::IndexedRandom};

/// Fraction `count / total`, or 0.0 when `total` is zero.
///
/// # Examples
///
/// ```
/// use sparring::utils::rate;
///
/// assert_eq!(rate(1, 4), 0.25);
/// assert_eq!(rate(3, 0), 0.0);
/// ```
pub fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Arithmetic mean, or `None` for an empty input.
///
/// # Examples
///
/// ```
/// use sparring::utils::mean;
///
/// assert_eq!(mean([100.0, 200.0, 300.0]), Some(200.0));
/// assert_eq!(mean(Vec::new()), None);
/// ```
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Weighted random choice from `(item, weight)` pairs.
///
/// Draws a threshold in `[0, total)` and walks the items until it is
/// crossed. Non-positive total weight falls back to a uniform choice;
/// an empty slice yields `None`.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use sparring::utils::weighted_sample;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let items = vec![("jab", 2.0), ("cross", 1.0), ("wait", 1.0)];
/// assert!(weighted_sample(&mut rng, &items).is_some());
/// ```
pub fn weighted_sample<R, T>(rng: &mut R, items: &[(T, f64)]) -> Option<T>
where
    R: Rng + ?Sized,
    T: Clone,
{
    if items.is_empty() {
        return None;
    }

    let total: f64 = items.iter().map(|(_, w)| w.max(0.0)).sum();
    if !total.is_finite() || total <= 0.0 {
        return items.choose(rng).map(|(item, _)| item.clone());
    }

    let mut threshold = rng.sample::<f64, _>(StandardUniform) * total;
    for (item, weight) in items {
        let w = weight.max(0.0);
        if threshold < w {
            return Some(item.clone());
        }
        threshold -= w;
    }

    // Rounding can leave a sliver past the last item
    items.last().map(|(item, _)| item.clone())
}
