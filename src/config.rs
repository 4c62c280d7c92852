//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::{
    alarm::{AlarmOutput, ToneProfile},
    engine::EngineSettings,
    state::{Preset, PresetCatalog, StopStyle},
};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "countdown-chime")]
#[command(about = "A drift-corrected countdown timer service with an audible alarm")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Correction tick interval in milliseconds
    #[arg(long = "tick-ms", default_value = "200", value_parser = clap::value_parser!(u64).range(10..=1000))]
    pub tick_ms: u64,

    /// Preset as LABEL=SECONDS; repeat to build the catalog (defaults to 30s/1m/2m/3m/5m)
    #[arg(long = "preset", value_name = "LABEL=SECONDS")]
    pub presets: Vec<Preset>,

    /// Label used when a running countdown is halted
    #[arg(long, value_enum, default_value_t = StopStyle::Stop)]
    pub stop_style: StopStyle,

    /// Where the completion alarm is played
    #[arg(long, value_enum, default_value_t = AlarmOutput::Auto)]
    pub alarm_output: AlarmOutput,

    /// Alarm tone design
    #[arg(long, value_enum, default_value_t = ToneProfile::SquareSteps)]
    pub tone: ToneProfile,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Presets given on the command line, or the stock catalog
    pub fn catalog(&self) -> PresetCatalog {
        if self.presets.is_empty() {
            PresetCatalog::defaults()
        } else {
            PresetCatalog::new(self.presets.clone())
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            tick_interval: self.tick_interval(),
            stop_style: self.stop_style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_widget() {
        let config = Config::try_parse_from(["countdown-chime"]).expect("config");
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.tick_interval(), Duration::from_millis(200));
        assert_eq!(config.catalog(), PresetCatalog::defaults());
        assert_eq!(config.stop_style, StopStyle::Stop);
        assert_eq!(config.alarm_output, AlarmOutput::Auto);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn presets_replace_the_catalog_in_order() {
        let config = Config::try_parse_from([
            "countdown-chime",
            "--preset",
            "Tea=240",
            "--preset",
            "Egg=420",
            "--stop-style",
            "pause",
            "--tone",
            "triangle-sweep",
            "-v",
        ])
        .expect("config");

        let catalog = config.catalog();
        let labels: Vec<_> = catalog.iter().map(|(_, p)| p.label.clone()).collect();
        assert_eq!(labels, vec!["Tea", "Egg"]);
        assert_eq!(config.engine_settings().stop_style, StopStyle::Pause);
        assert_eq!(config.tone, ToneProfile::TriangleSweep);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn rejects_zero_length_presets_and_silly_tick_rates() {
        assert!(Config::try_parse_from(["countdown-chime", "--preset", "Nope=0"]).is_err());
        assert!(Config::try_parse_from([
            "countdown-chime",
            "--preset",
            "Big=18446744073709551615"
        ])
        .is_err());
        assert!(Config::try_parse_from(["countdown-chime", "--tick-ms", "5000"]).is_err());
    }
}
