use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use urania::aspects::{AspectKind, OrbTable};
use urania::ephemeris::GeoLocation;
use urania::EngineSettings;

pub mod location;

pub use location::{Geocoder, GeocodedPoint, KnownCity, LocationOrigin, LocationResolver, ResolvedLocation};

/// Relative paths tried when no explicit config path is given
pub const CONFIG_PATHS: [&str; 2] = ["configs/forecast.toml", "../../configs/forecast.toml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EphemerisKind {
    #[default]
    Analytic,
    Swiss,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `env_logger` filter when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EphemerisConfig {
    pub source: EphemerisKind,
    /// Swiss Ephemeris data directory
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AspectsConfig {
    /// Natal charts also use the minor aspects (off unless enabled)
    pub natal_minor_aspects: bool,
    /// Per-kind orb overrides, keyed by aspect name
    pub orbs: BTreeMap<String, f64>,
}


#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastSection {
    pub days: u32,
}

impl Default for ForecastSection {
    fn default() -> Self {
        Self { days: 7 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_elevation")]
    pub elevation: f64,
}

impl LocationConfig {
    pub fn to_location(self) -> GeoLocation {
        GeoLocation::new(self.latitude, self.longitude, self.elevation)
    }
}

impl Default for LocationConfig {
    /// Moscow
    fn default() -> Self {
        Self {
            latitude: 55.7558,
            longitude: 37.6173,
            elevation: 156.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CityConfig {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_elevation")]
    pub elevation: f64,
}

fn default_elevation() -> f64 {
    100.0
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub logging: LoggingConfig,
    pub ephemeris: EphemerisConfig,
    pub aspects: AspectsConfig,
    pub forecast: ForecastSection,
    pub default_location: LocationConfig,
    pub cities: Vec<CityConfig>,
}

impl ForecastConfig {
    /// Load from `explicit` when given, otherwise from the first of
    /// [`CONFIG_PATHS`] that exists; built-in defaults when none does.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| anyhow::anyhow!("Could not read {}: {e}", path.display()))?;
                Self::from_toml_str(&text)
                    .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", path.display()))
            }
            None => match read_config_toml_text() {
                Some((path, text)) => {
                    log::info!("Loaded configuration from {}", path);
                    Self::from_toml_str(&text)
                        .map_err(|e| anyhow::anyhow!("Failed to parse {path}: {e}"))
                }
                None => {
                    log::info!("No forecast.toml found in {:?}, using defaults", CONFIG_PATHS);
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.default_location.to_location().validate()?;
        for city in &config.cities {
            GeoLocation::new(city.latitude, city.longitude, city.elevation)
                .validate()
                .map_err(|e| anyhow::anyhow!("City '{}': {e}", city.name))?;
        }
        Ok(config)
    }

    /// Engine settings with the configured orb tables and forecast length
    pub fn engine_settings(&self) -> anyhow::Result<EngineSettings> {
        let mut natal_orbs = if self.aspects.natal_minor_aspects {
            OrbTable::with_minor()
        } else {
            OrbTable::major()
        };
        let mut transit_orbs = OrbTable::major();

        for (name, &orb) in &self.aspects.orbs {
            let kind = AspectKind::from_name(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown aspect in [aspects.orbs]: {name}"))?;
            natal_orbs.set_orb(kind, orb)?;
            // transits keep to the major kinds
            if kind.is_major() {
                transit_orbs.set_orb(kind, orb)?;
            }
        }

        Ok(EngineSettings {
            natal_orbs,
            transit_orbs,
            forecast_days: self.forecast.days,
            ..EngineSettings::default()
        })
    }

    /// Swiss data directory from the config, then `SWISS_EPHEMERIS_PATH`
    pub fn ephemeris_path(&self) -> Option<PathBuf> {
        self.ephemeris
            .path
            .clone()
            .or_else(|| std::env::var_os("SWISS_EPHEMERIS_PATH").map(PathBuf::from))
    }

    pub fn location_resolver(&self) -> LocationResolver {
        let mut resolver = LocationResolver::new(self.default_location.to_location());
        for city in &self.cities {
            resolver.add_known_city(KnownCity::new(
                &city.name,
                city.aliases.iter().map(String::as_str),
                GeoLocation::new(city.latitude, city.longitude, city.elevation),
            ));
        }
        resolver
    }
}

/// Try the relative config paths; returns the path used and the file text
pub fn read_config_toml_text() -> Option<(String, String)> {
    CONFIG_PATHS.iter().find_map(|p| {
        fs::read_to_string(p)
            .ok()
            .map(|text| (p.to_string(), text))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[logging]
level = "debug"

[ephemeris]
source = "swiss"
path = "/opt/ephe"

[aspects]
natal_minor_aspects = true

[aspects.orbs]
trine = 6.0
quincunx = 2.5

[forecast]
days = 14

[default_location]
latitude = 59.9343
longitude = 30.3351
elevation = 3

[[cities]]
name = "Tbilisi"
aliases = ["тбилиси"]
latitude = 41.7151
longitude = 44.8271
elevation = 490
"#;

    #[test]
    fn test_parse_full_config() {
        let config = ForecastConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.ephemeris.source, EphemerisKind::Swiss);
        assert_eq!(config.ephemeris_path(), Some(PathBuf::from("/opt/ephe")));
        assert_eq!(config.forecast.days, 14);
        assert_eq!(config.cities.len(), 1);
        assert_eq!(config.default_location.latitude, 59.9343);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ForecastConfig::from_toml_str("").unwrap();
        assert_eq!(config, ForecastConfig::default());
        assert_eq!(config.ephemeris.source, EphemerisKind::Analytic);
        assert_eq!(config.default_location.latitude, 55.7558);
        let settings = config.engine_settings().unwrap();
        assert_eq!(settings.forecast_days, 7);
        assert!(!config.aspects.natal_minor_aspects);
        assert_eq!(settings.natal_orbs, OrbTable::major());
        assert_eq!(settings.transit_orbs, OrbTable::major());
    }

    #[test]
    fn test_minor_aspects_are_opt_in() {
        let plain = ForecastConfig::from_toml_str("[forecast]\ndays = 3\n")
            .unwrap()
            .engine_settings()
            .unwrap();
        assert_eq!(plain.natal_orbs.orb_for(AspectKind::SemiSextile), None);
        assert_eq!(plain.natal_orbs.orb_for(AspectKind::Quincunx), None);

        let wide = ForecastConfig::from_toml_str("[aspects]\nnatal_minor_aspects = true\n")
            .unwrap()
            .engine_settings()
            .unwrap();
        assert_eq!(wide.natal_orbs, OrbTable::with_minor());
        assert_eq!(wide.transit_orbs, OrbTable::major());
    }

    #[test]
    fn test_orb_overrides() {
        let config = ForecastConfig::from_toml_str(SAMPLE).unwrap();
        let settings = config.engine_settings().unwrap();
        assert_eq!(settings.natal_orbs.orb_for(AspectKind::Trine), Some(6.0));
        assert_eq!(settings.transit_orbs.orb_for(AspectKind::Trine), Some(6.0));
        // a minor override reaches the natal table only
        assert_eq!(settings.natal_orbs.orb_for(AspectKind::Quincunx), Some(2.5));
        assert_eq!(settings.transit_orbs.orb_for(AspectKind::Quincunx), None);
    }

    #[test]
    fn test_rejects_bad_values() {
        let unknown = "[aspects.orbs]\nbiquintile = 2.0\n";
        assert!(ForecastConfig::from_toml_str(unknown)
            .unwrap()
            .engine_settings()
            .is_err());
        let bad_orb = "[aspects.orbs]\nsquare = -1.0\n";
        assert!(ForecastConfig::from_toml_str(bad_orb)
            .unwrap()
            .engine_settings()
            .is_err());
        assert!(ForecastConfig::from_toml_str("[default_location]\nlatitude = 91.0\nlongitude = 0.0\n").is_err());
        assert!(ForecastConfig::from_toml_str("[forecast]\ndays = \"seven\"\n").is_err());
    }

    #[test]
    fn test_configured_cities_resolve() {
        let config = ForecastConfig::from_toml_str(SAMPLE).unwrap();
        let mut resolver = config.location_resolver();
        let resolved = resolver.resolve("Тбилиси");
        assert_eq!(resolved.origin, LocationOrigin::KnownCity);
        assert_eq!(resolved.location.elevation, 490.0);

        let fallback = resolver.resolve("Atlantis");
        assert_eq!(fallback.origin, LocationOrigin::Default);
        assert_eq!(fallback.location.latitude, 59.9343);
    }
}
