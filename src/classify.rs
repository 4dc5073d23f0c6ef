use ahash::AHashMap;

use crate::types::FusedDatum;

/// Which attribute column drives segmentation. `None` is the valid
/// "no segmentation" state and yields an empty `Segmentation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    None,
    Column(usize),
}

/// Result of one classification pass over the fused dataset.
///
/// Two orderings coexist and serve different purposes: segment indices are
/// assigned in first-observation order (stable across render cycles as long
/// as the data order is stable), while `ranked` orders values by descending
/// frequency for top-K display selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    segments: AHashMap<String, usize>,
    counts: AHashMap<String, usize>,
    ranked: Vec<String>,
}

impl Segmentation {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment index assigned to `value` at first observation.
    pub fn segment_index(&self, value: &str) -> Option<usize> {
        self.segments.get(value).copied()
    }

    /// Occurrence count for `value` (zero if never observed).
    pub fn count(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// All observed values, most frequent first; ties keep first-observation
    /// order.
    pub fn ranked(&self) -> &[String] {
        &self.ranked
    }

    /// The `k` most frequent values: the default display subset uses k = 2.
    pub fn top(&self, k: usize) -> &[String] {
        &self.ranked[..self.ranked.len().min(k)]
    }
}

/// Count and index the observed values of one attribute column across the
/// fused dataset.
///
/// Data without a matched record are skipped, as are values exactly equal to
/// the dataset's literal not-applicable marker; skipped values get neither a
/// segment index nor a count. Records too short to contain the column are
/// treated like missing values.
pub fn classify(fused: &[FusedDatum], selector: Selector, na_marker: &str) -> Segmentation {
    let Selector::Column(column) = selector else {
        return Segmentation::empty();
    };

    let mut segments = AHashMap::new();
    let mut counts: AHashMap<String, usize> = AHashMap::new();
    let mut observed: Vec<String> = Vec::new();

    for datum in fused {
        let Some(record) = &datum.record else { continue };
        let Some(value) = record.get(column) else { continue };
        if value == na_marker {
            continue;
        }

        if !segments.contains_key(value) {
            segments.insert(value.clone(), observed.len());
            observed.push(value.clone());
        }
        *counts.entry(value.clone()).or_insert(0) += 1;
    }

    // Stable sort: equal counts keep first-observation order.
    let mut ranked = observed;
    ranked.sort_by_key(|value| std::cmp::Reverse(counts.get(value).copied().unwrap_or(0)));

    Segmentation { segments, counts, ranked }
}

/// Class index of each datum against a caller-supplied display subset
/// (interactive reselection picks exactly two values).
///
/// The index is the value's position within `subset`; `None` means the datum
/// is excluded from the segmented display entirely, never folded into class
/// zero. Unmatched records and values outside the subset are both excluded.
pub fn class_indices(
    fused: &[FusedDatum],
    column: usize,
    subset: &[String],
) -> Vec<Option<usize>> {
    fused
        .iter()
        .map(|datum| {
            let record = datum.record.as_ref()?;
            let value = record.get(column)?;
            subset.iter().position(|candidate| candidate == value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn fused_with_values(values: &[Option<&str>]) -> Vec<FusedDatum> {
        values
            .iter()
            .map(|value| FusedDatum {
                name: "blob".to_string(),
                coords: vec![],
                record: value.map(|v| {
                    // Column 2 carries the attribute under test.
                    Arc::new(vec!["X".to_string(), "key".to_string(), v.to_string()])
                }),
            })
            .collect()
    }

    #[test]
    fn indices_follow_observation_order_and_ranking_follows_frequency() {
        let fused =
            fused_with_values(&[Some("F"), Some("M"), Some("F"), Some("F"), Some("M")]);
        let seg = classify(&fused, Selector::Column(2), "#NULL!");

        assert_eq!(seg.segment_index("F"), Some(0));
        assert_eq!(seg.segment_index("M"), Some(1));
        assert_eq!(seg.count("F"), 3);
        assert_eq!(seg.count("M"), 2);
        assert_eq!(seg.ranked(), ["F", "M"]);
    }

    #[test]
    fn ranking_reorders_by_count_independent_of_observation() {
        // "rare" observed first but "common" outnumbers it.
        let fused = fused_with_values(&[
            Some("rare"),
            Some("common"),
            Some("common"),
            Some("common"),
            Some("rare"),
        ]);
        let seg = classify(&fused, Selector::Column(2), "#NULL!");

        assert_eq!(seg.segment_index("rare"), Some(0));
        assert_eq!(seg.segment_index("common"), Some(1));
        assert_eq!(seg.ranked(), ["common", "rare"]);
    }

    #[test]
    fn ties_keep_first_observation_order() {
        let fused = fused_with_values(&[Some("b"), Some("a"), Some("b"), Some("a")]);
        let seg = classify(&fused, Selector::Column(2), "#NULL!");
        assert_eq!(seg.ranked(), ["b", "a"]);
    }

    #[test]
    fn na_marker_and_missing_records_are_skipped() {
        let fused =
            fused_with_values(&[Some("F"), Some("#NULL!"), None, Some("M"), Some("#NULL!")]);
        let seg = classify(&fused, Selector::Column(2), "#NULL!");

        assert_eq!(seg.segment_index("#NULL!"), None);
        assert_eq!(seg.count("#NULL!"), 0);
        assert_eq!(seg.ranked(), ["F", "M"]);
    }

    #[test]
    fn no_segmentation_selector_yields_empty_result() {
        let fused = fused_with_values(&[Some("F"), Some("M")]);
        let seg = classify(&fused, Selector::None, "#NULL!");
        assert!(seg.is_empty());
        assert!(seg.ranked().is_empty());
    }

    #[test]
    fn top_k_takes_the_most_frequent() {
        let fused = fused_with_values(&[
            Some("a"),
            Some("b"),
            Some("b"),
            Some("c"),
            Some("c"),
            Some("c"),
        ]);
        let seg = classify(&fused, Selector::Column(2), "#NULL!");
        assert_eq!(seg.top(2), ["c", "b"]);
        assert_eq!(seg.top(10), ["c", "b", "a"]);
    }

    #[test]
    fn class_indices_against_explicit_subset() {
        let fused = fused_with_values(&[Some("F"), Some("M"), Some("X"), None]);
        let subset = vec!["M".to_string(), "F".to_string()];
        let indices = class_indices(&fused, 2, &subset);

        // "X" and the unmatched datum are excluded, not zero-classed.
        assert_eq!(indices, vec![Some(1), Some(0), None, None]);
    }
}
