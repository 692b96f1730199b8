use serde::Serialize;
use std::ops::Range;

/// Contiguous run `[start, end)` of bright profile entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Band {
    pub start: usize,
    pub end: usize,
}

impl Band {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Convert a fractional window of `dimension` into profile indices
///
/// Fractions are truncated toward zero, matching how the window edges were
/// originally tuned.
pub fn vicinity_range(dimension: u32, start: f64, end: f64) -> Range<usize> {
    let dimension = f64::from(dimension);
    (dimension * start) as usize..(dimension * end) as usize
}

/// Find the widest bright band of `profile` inside `vicinity`
///
/// The profile is normalized with the min/max observed inside the vicinity and
/// thresholded at the given percentile of the normalized vicinity values, so
/// the cut adapts to each image's exposure. Only runs of at least `min_width`
/// entries qualify; the first of equally long runs wins. Runs still open at the
/// vicinity end are closed there.
pub fn find_white_band(
    profile: &[f32],
    min_width: usize,
    vicinity: Range<usize>,
    percentile: f64,
) -> Option<Band> {
    let start = vicinity.start;
    let end = vicinity.end.min(profile.len());
    if start >= end {
        return None;
    }

    let window = &profile[start..end];
    let (min, max) = window
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    // A flat window normalizes to all zeros
    let normalized: Vec<f32> = profile
        .iter()
        .map(|&v| if range > 0.0 { (v - min) / range } else { 0.0 })
        .collect();

    let threshold = percentile_of(&normalized[start..end], percentile);
    let mask: Vec<bool> = normalized.iter().map(|&v| v >= threshold).collect();

    let min_width = min_width.max(1);
    let mut best: Option<Band> = None;
    let mut run_start: Option<usize> = None;

    let close_run = |run: Band, best: &mut Option<Band>| {
        let longer = best.map_or(true, |b| run.len() > b.len());
        if run.len() >= min_width && longer {
            *best = Some(run);
        }
    };

    for (i, &bright) in mask.iter().enumerate().take(end).skip(start) {
        match (bright, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(s)) => {
                close_run(Band { start: s, end: i }, &mut best);
                run_start = None;
            }
            _ => {}
        }
    }

    if let Some(s) = run_start {
        close_run(Band { start: s, end }, &mut best);
    }

    tracing::trace!(
        "Band search over {}..{} (threshold {:.3}, min width {}): {:?}",
        start,
        end,
        threshold,
        min_width,
        best
    );

    best
}

/// Linearly interpolated percentile, `p` in [0, 100]
fn percentile_of(values: &[f32], p: f64) -> f32 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = (rank - lo as f64) as f32;

    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_band(len: usize, band: Range<usize>, dark: f32) -> Vec<f32> {
        (0..len)
            .map(|i| if band.contains(&i) { 255.0 } else { dark })
            .collect()
    }

    #[test]
    fn test_finds_exact_band_in_vicinity() {
        let profile = profile_with_band(100, 40..60, 10.0);
        let band = find_white_band(&profile, 4, 20..80, 90.0);
        assert_eq!(band, Some(Band { start: 40, end: 60 }));
    }

    #[test]
    fn test_band_length() {
        let band = Band { start: 40, end: 60 };
        assert_eq!(band.len(), 20);
        assert!(!band.is_empty());
        assert!(Band { start: 7, end: 7 }.is_empty());
    }

    #[test]
    fn test_returns_none_when_runs_too_narrow() {
        // Alternating bright and dark entries never form a run longer than 1
        let profile: Vec<f32> = (0..100)
            .map(|i| if i % 2 == 0 { 255.0 } else { 0.0 })
            .collect();
        assert_eq!(find_white_band(&profile, 4, 0..100, 90.0), None);
    }

    #[test]
    fn test_empty_vicinity_is_not_found() {
        let profile = vec![255.0; 10];
        assert_eq!(find_white_band(&profile, 1, 5..5, 90.0), None);
        assert_eq!(find_white_band(&profile, 1, 20..30, 90.0), None);
        assert_eq!(find_white_band(&[], 1, 0..10, 90.0), None);
    }

    #[test]
    fn test_vicinity_is_clamped_to_profile() {
        let profile = profile_with_band(50, 30..50, 0.0);
        let band = find_white_band(&profile, 4, 10..500, 90.0);
        assert_eq!(band, Some(Band { start: 30, end: 50 }));
    }

    #[test]
    fn test_run_open_at_vicinity_end_closes_there() {
        let profile = profile_with_band(100, 50..90, 0.0);
        let band = find_white_band(&profile, 4, 10..70, 90.0);
        assert_eq!(band, Some(Band { start: 50, end: 70 }));
    }

    #[test]
    fn test_ties_keep_first_run() {
        let mut profile = vec![0.0; 100];
        for i in (20..30).chain(60..70) {
            profile[i] = 255.0;
        }
        let band = find_white_band(&profile, 4, 0..100, 90.0);
        assert_eq!(band, Some(Band { start: 20, end: 30 }));
    }

    #[test]
    fn test_widest_run_wins() {
        let mut profile = vec![0.0; 100];
        for i in (10..16).chain(50..70) {
            profile[i] = 255.0;
        }
        let band = find_white_band(&profile, 4, 0..100, 90.0);
        assert_eq!(band, Some(Band { start: 50, end: 70 }));
    }

    #[test]
    fn test_threshold_adapts_to_exposure() {
        // A dim screenshot: the gutter is only mid-gray but still the brightest
        let profile = profile_with_band(100, 45..55, 40.0)
            .into_iter()
            .map(|v| if v > 100.0 { 120.0 } else { v })
            .collect::<Vec<_>>();
        let band = find_white_band(&profile, 4, 0..100, 90.0);
        assert_eq!(band, Some(Band { start: 45, end: 55 }));
    }

    #[test]
    fn test_flat_vicinity_is_one_band() {
        let profile = vec![200.0; 40];
        let band = find_white_band(&profile, 4, 10..30, 90.0);
        assert_eq!(band, Some(Band { start: 10, end: 30 }));
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile_of(&values, 50.0), 2.0);
        assert!((percentile_of(&values, 90.0) - 3.6).abs() < 1e-6);
        assert_eq!(percentile_of(&values, 100.0), 4.0);
    }

    #[test]
    fn test_vicinity_range_truncates() {
        assert_eq!(vicinity_range(1000, 0.5, 0.9), 500..900);
        assert_eq!(vicinity_range(999, 0.35, 0.65), 349..649);
    }
}
