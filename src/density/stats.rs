// Descriptive statistics over density sequences
//
// Percentiles use linear interpolation between closest ranks:
// rank = p * (n - 1), value = s[floor] + (s[ceil] - s[floor]) * frac(rank).
// The median is the 50th percentile under the same rule.

/// Arithmetic mean, 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, 0.0 for an empty slice
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// std / mean, 0.0 when the mean is not positive
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m > 0.0 {
        population_std(values) / m
    } else {
        0.0
    }
}

/// Sort a copy ascending with a total order
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// `p`-th percentile (0-100) of an ascending-sorted slice
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
