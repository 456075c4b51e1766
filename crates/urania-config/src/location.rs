//! City name → coordinates, with a cache and a pluggable geocoder.

use std::collections::HashMap;

use urania::ephemeris::GeoLocation;

/// How a location was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationOrigin {
    Cache,
    KnownCity,
    Geocoder,
    /// Nothing matched; the configured default was used
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLocation {
    pub location: GeoLocation,
    pub origin: LocationOrigin,
}

/// A geocoder hit; elevation is estimated when the service gives none
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocodedPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
}

/// External place-name lookup
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the service knows no such place
    fn geocode(&self, query: &str) -> anyhow::Result<Option<GeocodedPoint>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct KnownCity {
    pub name: String,
    pub aliases: Vec<String>,
    pub location: GeoLocation,
}

impl KnownCity {
    pub fn new<'a>(
        name: &str,
        aliases: impl IntoIterator<Item = &'a str>,
        location: GeoLocation,
    ) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.into_iter().map(str::to_string).collect(),
            location,
        }
    }

    fn keys(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(normalize(&self.name)).chain(self.aliases.iter().map(|a| normalize(a)))
    }
}

/// (name, alias, latitude, longitude, elevation)
const RUSSIAN_CITIES: &[(&str, &str, f64, f64, f64)] = &[
    ("Moscow", "москва", 55.7558, 37.6173, 156.0),
    ("Saint Petersburg", "санкт-петербург", 59.9343, 30.3351, 3.0),
    ("Novosibirsk", "новосибирск", 55.0084, 82.9357, 150.0),
    ("Yekaterinburg", "екатеринбург", 56.8389, 60.6057, 237.0),
    ("Nizhny Novgorod", "нижний новгород", 56.3269, 44.0075, 78.0),
    ("Kazan", "казань", 55.8304, 49.0661, 60.0),
    ("Chelyabinsk", "челябинск", 55.1644, 61.4368, 228.0),
    ("Omsk", "омск", 54.9884, 73.3242, 85.0),
    ("Samara", "самара", 53.2415, 50.2212, 87.0),
    ("Rostov-on-Don", "ростов-на-дону", 47.2225, 39.7187, 70.0),
    ("Ufa", "уфа", 54.7355, 55.9587, 158.0),
    ("Krasnoyarsk", "красноярск", 56.0153, 92.8932, 136.0),
    ("Perm", "пермь", 58.0105, 56.2502, 149.0),
    ("Voronezh", "воронеж", 51.6720, 39.1843, 104.0),
    ("Volgograd", "волгоград", 48.7080, 44.5133, 80.0),
    ("Krasnodar", "краснодар", 45.0355, 38.9750, 25.0),
    ("Saratov", "саратов", 51.5924, 45.9608, 50.0),
    ("Tyumen", "тюмень", 57.1613, 65.5250, 70.0),
    ("Tolyatti", "тольятти", 53.5088, 49.4192, 90.0),
    ("Izhevsk", "ижевск", 56.8527, 53.2115, 140.0),
    ("Ulyanovsk", "ульяновск", 54.3282, 48.3866, 80.0),
    ("Irkutsk", "иркутск", 52.2864, 104.2806, 440.0),
    ("Khabarovsk", "хабаровск", 48.4802, 135.0719, 72.0),
    ("Yaroslavl", "ярославль", 57.6261, 39.8845, 100.0),
    ("Vladivostok", "владивосток", 43.1332, 131.9113, 8.0),
    ("Mga", "мга", 59.7569, 31.0609, 33.0),
];

/// Resolves place names: cache, then known cities, then the geocoder, then the default
pub struct LocationResolver {
    cache: HashMap<String, GeoLocation>,
    known: HashMap<String, GeoLocation>,
    geocoder: Option<Box<dyn Geocoder>>,
    default_location: GeoLocation,
}

impl LocationResolver {
    /// Resolver with the built-in city table and no geocoder
    pub fn new(default_location: GeoLocation) -> Self {
        let mut resolver = Self {
            cache: HashMap::new(),
            known: HashMap::new(),
            geocoder: None,
            default_location,
        };
        for &(name, alias, lat, lon, elevation) in RUSSIAN_CITIES {
            resolver.add_known_city(KnownCity::new(
                name,
                [alias],
                GeoLocation::new(lat, lon, elevation),
            ));
        }
        resolver
    }

    pub fn with_geocoder(mut self, geocoder: Box<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    /// Later entries replace earlier ones with the same key
    pub fn add_known_city(&mut self, city: KnownCity) {
        for key in city.keys() {
            self.known.insert(key, city.location);
        }
    }

    /// Pin coordinates for a name ahead of every other lookup
    pub fn add_to_cache(&mut self, name: &str, location: GeoLocation) {
        self.cache.insert(normalize(name), location);
    }

    /// Cached names, sorted
    pub fn cached_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cache.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn default_location(&self) -> GeoLocation {
        self.default_location
    }

    pub fn resolve(&mut self, name: &str) -> ResolvedLocation {
        let key = normalize(name);

        if let Some(&location) = self.cache.get(&key) {
            log::debug!("Coordinates for '{}' from cache", name);
            return ResolvedLocation {
                location,
                origin: LocationOrigin::Cache,
            };
        }

        if let Some(&location) = self.known.get(&key) {
            log::info!("Coordinates for '{}' from the known-city table", name);
            self.cache.insert(key, location);
            return ResolvedLocation {
                location,
                origin: LocationOrigin::KnownCity,
            };
        }

        if let Some(geocoder) = &self.geocoder {
            match geocoder.geocode(name.trim()) {
                Ok(Some(point)) => {
                    let location = GeoLocation::new(
                        point.latitude,
                        point.longitude,
                        point
                            .elevation
                            .unwrap_or_else(|| estimate_elevation(point.latitude, point.longitude)),
                    );
                    if location.validate().is_ok() {
                        log::info!(
                            "Geocoded '{}' to {:.4}, {:.4}",
                            name,
                            location.latitude,
                            location.longitude
                        );
                        self.cache.insert(key, location);
                        return ResolvedLocation {
                            location,
                            origin: LocationOrigin::Geocoder,
                        };
                    }
                    log::warn!("Geocoder returned invalid coordinates for '{}'", name);
                }
                Ok(None) => log::info!("Geocoder found no match for '{}'", name),
                Err(e) => log::warn!("Geocoding '{}' failed: {}", name, e),
            }
        }

        log::warn!("Could not resolve '{}', using the default location", name);
        ResolvedLocation {
            location: self.default_location,
            origin: LocationOrigin::Default,
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Rough elevation in meters by region, for geocoder hits without one
pub fn estimate_elevation(latitude: f64, longitude: f64) -> f64 {
    let within = |lat: (f64, f64), lon: (f64, f64)| {
        (lat.0..=lat.1).contains(&latitude) && (lon.0..=lon.1).contains(&longitude)
    };
    if within((43.0, 49.0), (131.0, 142.0)) {
        200.0
    } else if within((53.0, 58.0), (48.0, 56.0)) {
        100.0
    } else if within((55.0, 57.0), (37.0, 40.0)) {
        150.0
    } else if within((44.0, 46.0), (38.0, 40.0)) {
        50.0
    } else if within((51.0, 53.0), (103.0, 108.0)) {
        500.0
    } else {
        100.0
    }
}
