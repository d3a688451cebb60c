use crate::domain::dataset::DatasetProfile;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub routing: RoutingSettings,
    pub search: SearchSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
    pub default_dataset: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoutingSettings {
    pub base_url: String,
    #[serde(default = "default_routing_profile")]
    pub profile: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchSettings {
    pub base_url: String,
    /// Optional `viewbox` restricting results to the served area.
    pub viewbox: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetsConfig {
    #[serde(default)]
    pub datasets: Vec<DatasetProfile>,
}

fn default_routing_profile() -> String {
    "driving".to_string()
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/server"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_datasets_config() -> anyhow::Result<DatasetsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/datasets"))
        .build()?;

    let datasets: DatasetsConfig = settings.try_deserialize()?;
    validate_datasets(&datasets)?;
    Ok(datasets)
}

/// Keys must be unique; each key owns exactly one slot.
pub fn validate_datasets(config: &DatasetsConfig) -> anyhow::Result<()> {
    let mut seen = std::collections::HashSet::new();
    for profile in &config.datasets {
        if !seen.insert(profile.key.as_str()) {
            anyhow::bail!("duplicate dataset key {}", profile.key);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> DatasetsConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_dataset_profile_defaults() {
        let config = parse(
            r#"
            [[datasets]]
            key = "NO2"
            label = "Nitrogen dioxide"
            source = "data/no2_wards.geojson"
            category_field = "NO2_Class"
            guideline = 25.0
            "#,
        );

        let profile = &config.datasets[0];
        assert_eq!(profile.id_field, "fid");
        assert_eq!(profile.value_field, "_mean");
        assert_eq!(profile.max_field, "_max");
        assert_eq!(profile.exposure_field, "Exposure_idx");
        assert_eq!(profile.population_field, "BYO_population");
        assert!(profile.supports_detail);
        assert_eq!(profile.guideline, Some(25.0));
        assert!(validate_datasets(&config).is_ok());
    }

    #[test]
    fn test_duplicate_keys_are_rejected() {
        let config = parse(
            r#"
            [[datasets]]
            key = "O3"
            label = "Ozone"
            source = "a.geojson"
            category_field = "Class"
            supports_detail = false

            [[datasets]]
            key = "O3"
            label = "Ozone again"
            source = "b.geojson"
            category_field = "Class"
            "#,
        );

        assert!(!config.datasets[0].supports_detail);
        assert!(validate_datasets(&config).is_err());
    }
}
