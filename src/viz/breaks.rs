//! Classification Breaks Module
//! Equal-width class breaks rounded to a "nice" magnitude, for the
//! choropleth legend. A presentation heuristic for report readers, not a
//! statistical classification.

use polars::prelude::*;

/// Number of color classes the map legends use.
pub const DEFAULT_CLASSES: usize = 5;

/// Compute `n_classes + 1` legend thresholds over `values`.
///
/// Empty input (after dropping non-finite values) yields all zeros; a
/// zero-width range yields the single value repeated. Both degenerate
/// forms keep the expected length so the legend renderer never divides by
/// zero. Otherwise breaks run `[0, w, 2w, .., max]` with the width rounded
/// up to a half or whole power of ten of the range, then each break is
/// rounded up to that base, sorted, and deduplicated.
pub fn compute_breaks(values: &[f64], n_classes: usize) -> Vec<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return vec![0.0; n_classes + 1];
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range == 0.0 {
        return vec![max; n_classes + 1];
    }

    let magnitude = 10f64.powi(range.log10().floor() as i32);
    let rounding_base = if range / magnitude >= 3.0 {
        magnitude
    } else {
        magnitude / 2.0
    };
    let width = (range / n_classes as f64 / rounding_base).ceil() * rounding_base;

    let mut breaks: Vec<f64> = Vec::with_capacity(n_classes + 1);
    breaks.push(0.0);
    for i in 1..n_classes {
        breaks.push(i as f64 * width);
    }
    breaks.push(max);

    let mut rounded: Vec<f64> = breaks
        .iter()
        .map(|b| (b / rounding_base).ceil() * rounding_base)
        .collect();
    rounded.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    rounded.dedup();
    rounded
}

/// Breaks over one numeric column of a filtered table. Nulls are skipped;
/// a missing or empty column falls back to the all-zero degenerate form.
pub fn compute_breaks_for_column(df: &DataFrame, column: &str, n_classes: usize) -> Vec<f64> {
    let values: Vec<f64> = df
        .column(column)
        .ok()
        .and_then(|col| col.cast(&DataType::Float64).ok())
        .and_then(|col| col.f64().ok().cloned())
        .map(|ca| ca.into_iter().flatten().collect())
        .unwrap_or_default();
    compute_breaks(&values, n_classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_all_zeros() {
        let breaks = compute_breaks(&[], DEFAULT_CLASSES);
        assert_eq!(breaks, vec![0.0; 6]);
        assert!(breaks.iter().all(|b| b.is_finite()));
    }

    #[test]
    fn single_value_repeats_without_dividing_by_zero() {
        assert_eq!(compute_breaks(&[5.0], DEFAULT_CLASSES), vec![5.0; 6]);
    }

    #[test]
    fn all_zero_values_stay_zero() {
        assert_eq!(compute_breaks(&[0.0, 0.0, 0.0], DEFAULT_CLASSES), vec![0.0; 6]);
    }

    #[test]
    fn breaks_are_nondecreasing_from_zero() {
        let breaks = compute_breaks(&[12.0, 480.0, 250.0, 990.0], DEFAULT_CLASSES);
        assert_eq!(breaks[0], 0.0);
        assert!(breaks.windows(2).all(|w| w[0] <= w[1]));
        assert!(breaks.iter().all(|b| b.is_finite()));
    }

    #[test]
    fn breaks_land_on_round_values() {
        // range 978 -> magnitude 100, base 100, width ceil(978/5/100)*100 = 200
        let breaks = compute_breaks(&[12.0, 990.0], DEFAULT_CLASSES);
        assert_eq!(breaks, vec![0.0, 200.0, 400.0, 600.0, 800.0, 1000.0]);
    }

    #[test]
    fn narrow_range_uses_the_half_magnitude_base() {
        // range 20 -> magnitude 10, 20/10 < 3 so base 5, width ceil(20/5/5)*5 = 5
        let breaks = compute_breaks(&[100.0, 120.0], DEFAULT_CLASSES);
        assert_eq!(breaks, vec![0.0, 5.0, 10.0, 15.0, 20.0, 120.0]);
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let breaks = compute_breaks(&[f64::NAN, f64::INFINITY], DEFAULT_CLASSES);
        assert_eq!(breaks, vec![0.0; 6]);
    }

    #[test]
    fn column_helper_skips_nulls() {
        let df = DataFrame::new(vec![Column::new(
            "Indicator Value".into(),
            vec![Some(10.0f64), None, Some(10.0)],
        )])
        .unwrap();
        let breaks = compute_breaks_for_column(&df, "Indicator Value", DEFAULT_CLASSES);
        assert_eq!(breaks, vec![10.0; 6]);
    }

    #[test]
    fn missing_column_degenerates_to_zeros() {
        let df = DataFrame::empty();
        assert_eq!(
            compute_breaks_for_column(&df, "Indicator Value", DEFAULT_CLASSES),
            vec![0.0; 6]
        );
    }
}
