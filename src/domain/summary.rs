// Dataset-wide summary statistics
use super::ward::WardReading;
use serde::Serialize;

const HIGH_CATEGORIES: [&str; 2] = ["High", "Very High"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub max_mean: f64,
    pub min_mean: f64,
    pub high_ward_count: usize,
}

/// `None` when there are no readings; callers must not treat that as zeros.
///
/// Category matching is exact and case-sensitive.
pub fn summarize(readings: &[WardReading]) -> Option<Summary> {
    let first = readings.first()?;
    let mut summary = Summary {
        max_mean: first.mean,
        min_mean: first.mean,
        high_ward_count: 0,
    };

    for reading in readings {
        summary.max_mean = summary.max_mean.max(reading.mean);
        summary.min_mean = summary.min_mean.min(reading.mean);
        if reading
            .category
            .as_deref()
            .is_some_and(|c| HIGH_CATEGORIES.contains(&c))
        {
            summary.high_ward_count += 1;
        }
    }

    Some(summary)
}

/// Position of a ward's mean relative to a guideline threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidelineStatus {
    Above,
    AtOrBelow,
}

impl GuidelineStatus {
    pub fn classify(mean: f64, threshold: f64) -> Self {
        if mean > threshold {
            GuidelineStatus::Above
        } else {
            GuidelineStatus::AtOrBelow
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn reading(id: &str, mean: f64, category: &str) -> WardReading {
        WardReading {
            id: id.to_string(),
            name: Some(format!("Ward {}", id)),
            mean,
            max: None,
            category: Some(category.to_string()),
            exposure: None,
            population: None,
            geometry: None,
        }
    }

    #[test]
    fn test_empty_readings_have_no_summary() {
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn test_summary_of_mixed_wards() {
        let readings = vec![
            reading("1", 5.0, "Low"),
            reading("2", 9.0, "High"),
            reading("3", 9.0, "Very High"),
        ];

        assert_eq!(
            summarize(&readings),
            Some(Summary {
                max_mean: 9.0,
                min_mean: 5.0,
                high_ward_count: 2,
            })
        );
    }

    #[test]
    fn test_bounds_hold_for_every_reading() {
        let readings = vec![
            reading("a", -1.5, "Low"),
            reading("b", 0.0000031, "Medium"),
            reading("c", 42.0, "Low"),
            reading("d", 3.3, "Medium"),
        ];
        let summary = summarize(&readings).unwrap();

        for r in &readings {
            assert!(summary.max_mean >= r.mean);
            assert!(summary.min_mean <= r.mean);
        }
        assert_eq!(summary.high_ward_count, 0);
    }

    #[test]
    fn test_category_match_is_case_sensitive() {
        let readings = vec![
            reading("1", 1.0, "high"),
            reading("2", 1.0, "VERY HIGH"),
            reading("3", 1.0, "Very High"),
        ];
        assert_eq!(summarize(&readings).unwrap().high_ward_count, 1);
    }

    #[test]
    fn test_guideline_is_strictly_greater() {
        assert_eq!(GuidelineStatus::classify(25.1, 25.0), GuidelineStatus::Above);
        assert_eq!(GuidelineStatus::classify(25.0, 25.0), GuidelineStatus::AtOrBelow);
        assert_eq!(GuidelineStatus::classify(3.0, 25.0), GuidelineStatus::AtOrBelow);
    }
}
