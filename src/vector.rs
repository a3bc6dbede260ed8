//! This is the vector math module
//! Provide dimension fitting and the three ranking metrics

/// Force a raw embedding to exactly `dimension` values.
/// Longer inputs lose their tail, shorter inputs are padded with zeros.
pub fn fit_to_dimension(mut raw: Vec<f32>, dimension: usize) -> Vec<f32> {
    // resize covers both directions: truncate when longer, zero-pad when shorter
    raw.resize(dimension, 0.0);
    raw
}

/// Dot Product
/// dot_prod = sum(a[i] * b[i]) for i = 0..min(a.len(), b.len())
pub fn dot_product(left: &[f32], right: &[f32]) -> f64 {
    left.iter()
        .zip(right.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum()
}

/// Cosine similarity
/// cos = dot(a, b) / (||a|| * ||b||)
/// Returns 0.0 when either vector has zero norm
pub fn cosine_similarity(left: &[f32], right: &[f32]) -> f64 {
    // Compare over the shared prefix only
    let len = left.len().min(right.len());
    let (left, right) = (&left[..len], &right[..len]);

    let norm_l = dot_product(left, left);
    let norm_r = dot_product(right, right);

    if norm_l == 0.0 || norm_r == 0.0 {
        return 0.0;
    }

    dot_product(left, right) / (norm_l.sqrt() * norm_r.sqrt())
}

/// Manhattan (L1) distance
/// sum(|a[i] - b[i]|)
pub fn manhattan_distance(left: &[f32], right: &[f32]) -> f64 {
    left.iter()
        .zip(right.iter())
        .map(|(x, y)| (f64::from(*x) - f64::from(*y)).abs())
        .sum()
}

/// Euclidean (L2) distance
/// sqrt(sum((a[i] - b[i])^2))
pub fn euclidean_distance(left: &[f32], right: &[f32]) -> f64 {
    left.iter()
        .zip(right.iter())
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}
