//! Preset durations offered for quick selection

use std::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};

/// Position of a preset in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetId(pub usize);

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Longest accepted preset: 100 days
pub const MAX_PRESET_SECONDS: u64 = 100 * 24 * 60 * 60;

/// A named fixed duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub label: String,
    pub seconds: u64,
}

impl Preset {
    pub fn new(label: impl Into<String>, seconds: u64) -> Self {
        Self {
            label: label.into(),
            seconds,
        }
    }
}

/// Parses `LABEL=SECONDS`, as accepted by `--preset`
impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (label, seconds) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected LABEL=SECONDS, got '{}'", s))?;

        let label = label.trim();
        if label.is_empty() {
            return Err("preset label must not be empty".to_string());
        }

        let seconds: u64 = seconds
            .trim()
            .parse()
            .map_err(|e| format!("invalid preset seconds '{}': {}", seconds.trim(), e))?;
        if seconds == 0 {
            return Err(format!("preset '{}' must last at least one second", label));
        }
        if seconds > MAX_PRESET_SECONDS {
            return Err(format!(
                "preset '{}' exceeds the {}s limit",
                label, MAX_PRESET_SECONDS
            ));
        }

        Ok(Self::new(label, seconds))
    }
}

/// Ordered, immutable list of presets supplied at bootstrap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
}

impl PresetCatalog {
    pub fn new(presets: Vec<Preset>) -> Self {
        Self { presets }
    }

    /// The stock 30s / 1m / 2m / 3m / 5m catalog
    pub fn defaults() -> Self {
        Self::new(vec![
            Preset::new("30 sec", 30),
            Preset::new("1 min", 60),
            Preset::new("2 min", 120),
            Preset::new("3 min", 180),
            Preset::new("5 min", 300),
        ])
    }

    pub fn get(&self, id: PresetId) -> Option<&Preset> {
        self.presets.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PresetId, &Preset)> {
        self.presets
            .iter()
            .enumerate()
            .map(|(index, preset)| (PresetId(index), preset))
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_label_and_seconds() {
        let preset: Preset = "Tea = 240".parse().expect("preset");
        assert_eq!(preset, Preset::new("Tea", 240));
    }

    #[test]
    fn label_may_contain_equals_sign() {
        let preset: Preset = "a=b=15".parse().expect("preset");
        assert_eq!(preset.label, "a=b");
        assert_eq!(preset.seconds, 15);
    }

    #[test]
    fn rejects_zero_and_malformed_presets() {
        assert!("Nothing=0".parse::<Preset>().is_err());
        assert!("=30".parse::<Preset>().is_err());
        assert!("30".parse::<Preset>().is_err());
        assert!("Egg=soft".parse::<Preset>().is_err());
    }

    #[test]
    fn rejects_presets_longer_than_the_limit() {
        let limit = format!("Long={}", MAX_PRESET_SECONDS);
        assert_eq!(limit.parse::<Preset>().map(|p| p.seconds), Ok(MAX_PRESET_SECONDS));

        let over = format!("Longer={}", MAX_PRESET_SECONDS + 1);
        assert!(over.parse::<Preset>().is_err());
        assert!("Big=18446744073709551615".parse::<Preset>().is_err());
    }

    #[test]
    fn default_catalog_is_ordered_by_id() {
        let catalog = PresetCatalog::defaults();
        let seconds: Vec<u64> = catalog.iter().map(|(_, p)| p.seconds).collect();
        assert_eq!(seconds, vec![30, 60, 120, 180, 300]);
        assert_eq!(catalog.get(PresetId(1)).map(|p| p.label.as_str()), Some("1 min"));
        assert!(catalog.get(PresetId(5)).is_none());
    }
}
