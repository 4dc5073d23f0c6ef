use geo::Coord;

/// For every center, the number of *other* centers whose circle of radius
/// `radius` overlaps its own, in input order.
///
/// Two equal-radius circles overlap iff their centers are at most `2r`
/// apart, boundary inclusive. Self-exclusion is by position, not value
/// equality, so coincident points count each other. Squared distances avoid
/// a square root per pair. O(n²) pairwise pass, sized for hundreds of
/// centers; a spatial index would only pay off in the low thousands.
pub fn overlap_counts(centers: &[Coord<f64>], radius: f64) -> Vec<usize> {
    let threshold = 2.0 * radius;
    let threshold_sq = threshold * threshold;

    centers
        .iter()
        .enumerate()
        .map(|(i, center)| {
            centers
                .iter()
                .enumerate()
                .filter(|(j, other)| {
                    if *j == i {
                        return false;
                    }
                    let dx = center.x - other.x;
                    let dy = center.y - other.y;
                    dx * dx + dy * dy <= threshold_sq
                })
                .count()
        })
        .collect()
}

/// Overlap counts scaled into 0..=1 against the maximum count, for heatmap
/// color ramping. All-zero input stays all-zero.
pub fn normalized_intensities(counts: &[usize]) -> Vec<f64> {
    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return vec![0.0; counts.len()];
    }
    counts.iter().map(|&count| count as f64 / max as f64).collect()
}
