use std::env;
use std::str::FromStr;
use std::time::Duration;

use foundation::geo::LonLat;
use runtime::DEFAULT_CLEAR_AFTER;

pub const DEFAULT_ZONES_URL: &str = "http://127.0.0.1:8000/zones.json";
pub const DEFAULT_SAVE_URL: &str = "http://127.0.0.1:8000/save_zones";

/// Map center before any zone is loaded.
pub const DEFAULT_CENTER: LonLat = LonLat::new(6.52002831753822, 52.96523540264812);
pub const DEFAULT_ZOOM: u8 = 13;

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub zones_url: String,
    pub save_url: String,
    pub indicator_clear_after: Duration,
    pub initial_center: LonLat,
    /// Zoom used for the initial view and after centering on loaded zones.
    pub zoom: u8,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zones_url: DEFAULT_ZONES_URL.to_string(),
            save_url: DEFAULT_SAVE_URL.to_string(),
            indicator_clear_after: DEFAULT_CLEAR_AFTER,
            initial_center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl EditorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or unparsable keys keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let clear_ms = var_or(
            &lookup,
            "ZONES_INDICATOR_CLEAR_MS",
            defaults.indicator_clear_after.as_millis() as u64,
        );
        Self {
            zones_url: lookup("ZONES_URL").unwrap_or(defaults.zones_url),
            save_url: lookup("ZONES_SAVE_URL").unwrap_or(defaults.save_url),
            indicator_clear_after: Duration::from_millis(clear_ms),
            initial_center: LonLat::new(
                var_or(&lookup, "ZONES_CENTER_LON", defaults.initial_center.lon),
                var_or(&lookup, "ZONES_CENTER_LAT", defaults.initial_center.lat),
            ),
            zoom: var_or(&lookup, "ZONES_ZOOM", defaults.zoom),
        }
    }
}

fn var_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_CENTER, EditorConfig};
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = EditorConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, EditorConfig::default());
        assert_eq!(cfg.indicator_clear_after, Duration::from_millis(2000));
        assert_eq!(cfg.initial_center, DEFAULT_CENTER);
    }

    #[test]
    fn overrides_and_bad_values() {
        let cfg = EditorConfig::from_lookup(lookup(&[
            ("ZONES_URL", "http://ha.local/zones.json"),
            ("ZONES_INDICATOR_CLEAR_MS", "500"),
            ("ZONES_ZOOM", "not a number"),
            ("ZONES_CENTER_LAT", " 10.5 "),
        ]));
        assert_eq!(cfg.zones_url, "http://ha.local/zones.json");
        assert_eq!(cfg.indicator_clear_after, Duration::from_millis(500));
        assert_eq!(cfg.zoom, 13);
        assert_eq!(cfg.initial_center.lat, 10.5);
        assert_eq!(cfg.initial_center.lon, DEFAULT_CENTER.lon);
    }
}
