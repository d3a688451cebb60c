// Ward readings - normalized view of one feature's numeric attributes
use super::dataset::DatasetProfile;
use geojson::{Feature, FeatureCollection};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct WardReading {
    pub id: String,
    pub name: Option<String>,
    pub mean: f64,
    pub max: Option<f64>,
    pub category: Option<String>,
    pub exposure: Option<f64>,
    pub population: Option<u64>,
    pub geometry: Option<geojson::Geometry>,
}

impl WardReading {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Extract readings from a raw collection. Features whose primary value is
/// missing or not a finite number are left out.
pub fn normalize(collection: &FeatureCollection, profile: &DatasetProfile) -> Vec<WardReading> {
    collection
        .features
        .iter()
        .enumerate()
        .filter_map(|(index, feature)| read_feature(index, feature, profile))
        .collect()
}

fn read_feature(index: usize, feature: &Feature, profile: &DatasetProfile) -> Option<WardReading> {
    let mean = number_property(feature, &profile.value_field)?;

    Some(WardReading {
        id: feature_id(index, feature, profile),
        name: text_property(feature, &profile.name_field),
        mean,
        max: number_property(feature, &profile.max_field),
        category: text_property(feature, &profile.category_field),
        exposure: number_property(feature, &profile.exposure_field),
        population: number_property(feature, &profile.population_field)
            .filter(|p| *p >= 0.0)
            .map(|p| p.round() as u64),
        geometry: feature.geometry.clone(),
    })
}

/// Stable identifier: the configured id property, then the GeoJSON id, then
/// the feature's position in the collection.
pub fn feature_id(index: usize, feature: &Feature, profile: &DatasetProfile) -> String {
    if let Some(value) = feature.property(&profile.id_field) {
        match value {
            Value::String(s) => return s.clone(),
            Value::Number(n) => return n.to_string(),
            _ => {}
        }
    }

    match &feature.id {
        Some(geojson::feature::Id::String(s)) => s.clone(),
        Some(geojson::feature::Id::Number(n)) => n.to_string(),
        None => index.to_string(),
    }
}

/// Finite number from a JSON number or a numeric string.
pub fn parse_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn number_property(feature: &Feature, field: &str) -> Option<f64> {
    feature.property(field).and_then(parse_number)
}

fn text_property(feature: &Feature, field: &str) -> Option<String> {
    match feature.property(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn collection(features: Value) -> FeatureCollection {
        serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": features,
        }))
        .unwrap()
    }

    pub(crate) fn ward(fid: i64, mean: Value, category: &str) -> Value {
        json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [85.3, 27.7] },
            "properties": {
                "fid": fid,
                "WARD_NAME": format!("Ward {}", fid),
                "_mean": mean,
                "_max": 1.5,
                "Category": category,
                "Exposure_idx": 0.25,
                "BYO_population": 12345,
            }
        })
    }

    #[test]
    fn test_normalize_reads_all_fields() {
        let readings = normalize(
            &collection(json!([ward(7, json!(0.045), "High")])),
            &DatasetProfile::for_tests("NO2"),
        );

        assert_eq!(readings.len(), 1);
        let r = &readings[0];
        assert_eq!(r.id, "7");
        assert_eq!(r.display_name(), "Ward 7");
        assert_eq!(r.mean, 0.045);
        assert_eq!(r.max, Some(1.5));
        assert_eq!(r.category.as_deref(), Some("High"));
        assert_eq!(r.exposure, Some(0.25));
        assert_eq!(r.population, Some(12345));
        assert!(r.geometry.is_some());
    }

    #[test]
    fn test_non_numeric_primary_value_is_excluded() {
        let readings = normalize(
            &collection(json!([
                ward(1, json!(null), "Low"),
                ward(2, json!("n/a"), "Low"),
                ward(3, json!("4.5"), "Low"),
                { "type": "Feature", "geometry": null, "properties": { "fid": 4 } },
            ])),
            &DatasetProfile::for_tests("NO2"),
        );

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].id, "3");
        assert_eq!(readings[0].mean, 4.5);
    }

    #[test]
    fn test_invalid_secondary_fields_do_not_exclude() {
        let readings = normalize(
            &collection(json!([{
                "type": "Feature",
                "geometry": null,
                "properties": {
                    "fid": "w-9",
                    "_mean": 2.0,
                    "Exposure_idx": "NaN",
                    "BYO_population": "unknown",
                }
            }])),
            &DatasetProfile::for_tests("NO2"),
        );

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].id, "w-9");
        assert_eq!(readings[0].exposure, None);
        assert_eq!(readings[0].population, None);
        assert_eq!(readings[0].display_name(), "w-9");
    }

    #[test]
    fn test_feature_id_fallbacks() {
        let profile = DatasetProfile::for_tests("NO2");
        let fc = collection(json!([
            { "type": "Feature", "id": "abc", "geometry": null, "properties": { "_mean": 1 } },
            { "type": "Feature", "geometry": null, "properties": { "_mean": 1 } },
        ]));

        assert_eq!(feature_id(0, &fc.features[0], &profile), "abc");
        assert_eq!(feature_id(1, &fc.features[1], &profile), "1");
    }
}
