// Hotspot rankings - top wards by concentration and by exposure
use super::ward::WardReading;

pub const HOTSPOT_LIMIT: usize = 5;

/// Indices into the reading list, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hotspots {
    pub by_mean: Vec<usize>,
    pub by_exposure: Vec<usize>,
}

pub fn rank(readings: &[WardReading]) -> Hotspots {
    Hotspots {
        by_mean: top_by(readings, |r| Some(r.mean)),
        by_exposure: top_by(readings, |r| r.exposure),
    }
}

// `sort_by` is stable, so equal keys keep input order. Truncation happens
// only after the full sort.
fn top_by<F>(readings: &[WardReading], key: F) -> Vec<usize>
where
    F: Fn(&WardReading) -> Option<f64>,
{
    let mut ranked: Vec<(usize, f64)> = readings
        .iter()
        .enumerate()
        .filter_map(|(i, r)| key(r).filter(|v| v.is_finite()).map(|v| (i, v)))
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(HOTSPOT_LIMIT);
    ranked.into_iter().map(|(i, _)| i).collect()
}
