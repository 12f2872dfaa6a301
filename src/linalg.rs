//! Small dense-vector helpers on slices.

/// Dot product.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(ai, bi)| ai * bi).sum()
}

/// Euclidean norm, scaled by the largest component so that squaring neither
/// overflows above `1e154` nor underflows below `1e-154`.
pub fn norm2(v: &[f64]) -> f64 {
    let scale = norm_inf(v);
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let sum: f64 = v
        .iter()
        .map(|vi| {
            let t = vi / scale;
            t * t
        })
        .sum();
    scale * sum.sqrt()
}

/// Sum of absolute values.
pub fn norm1(v: &[f64]) -> f64 {
    v.iter().map(|vi| vi.abs()).sum()
}

/// Largest absolute value, `0` for an empty slice.
pub fn norm_inf(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |acc, vi| acc.max(vi.abs()))
}

/// Componentwise clamp of `v` into `[lower, upper]`, written to `out`.
///
/// Infinite bounds are allowed; `lower[i] <= upper[i]` is assumed.
pub fn project_box(v: &[f64], lower: &[f64], upper: &[f64], out: &mut [f64]) {
    debug_assert!(v.len() == lower.len() && v.len() == upper.len() && v.len() == out.len());
    for i in 0..v.len() {
        out[i] = v[i].max(lower[i]).min(upper[i]);
    }
}

/// `½·Σ d_i (x_i − c_i)²`.
pub fn weighted_half_sq_dist(x: &[f64], center: &[f64], weights: &[f64]) -> f64 {
    debug_assert!(x.len() == center.len() && x.len() == weights.len());
    0.5 * x
        .iter()
        .zip(center)
        .zip(weights)
        .map(|((xi, ci), di)| di * (xi - ci) * (xi - ci))
        .sum::<f64>()
}
