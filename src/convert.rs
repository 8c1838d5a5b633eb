//! Conversion entry point — pick a representation by name, configure it
//! from one flat options struct.
//!
//! ```text
//! convert(track, "chronnet".parse()?, &ConvertConfig::new(1.0), None)
//!   → Converted::Chronnet(CellGraph)
//! ```
//!
//! When no hasher is passed, a [`GridHasher`] at `config.resolution` is used.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{
    chronnet_create, geosynchnet_create, hash_intervals, timehex_table,
    CellGraph, ChronnetConfig, GraphMode, TimeHexTable,
};
use crate::geotime::{convert_geotimehash, precision_delta, GeoTimeHashMap};
use crate::hasher::{GridHasher, SpatialHasher, MAX_RESOLUTION};
use crate::model::Track;
use crate::slicing::SlicingConfig;
use crate::timegrid::{build_time_grid, TimeGrid};
use crate::{Error, Result};

/// The output representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Representation {
    #[serde(rename = "timehex")]
    TimeHex,
    #[serde(rename = "chronnet")]
    Chronnet,
    #[serde(rename = "geosynchnet")]
    Geosynchnet,
    #[serde(rename = "geotimehash")]
    GeoTimeHash,
    #[serde(rename = "time_grid")]
    TimeGrid,
}

impl Representation {
    pub fn name(&self) -> &'static str {
        match self {
            Representation::TimeHex => "timehex",
            Representation::Chronnet => "chronnet",
            Representation::Geosynchnet => "geosynchnet",
            Representation::GeoTimeHash => "geotimehash",
            Representation::TimeGrid => "time_grid",
        }
    }
}

impl FromStr for Representation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "timehex" => Ok(Representation::TimeHex),
            "chronnet" => Ok(Representation::Chronnet),
            "geosynchnet" => Ok(Representation::Geosynchnet),
            "geotimehash" => Ok(Representation::GeoTimeHash),
            "time_grid" | "timegrid" => Ok(Representation::TimeGrid),
            _ => Err(Error::UnsupportedRepresentation(s.to_string())),
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options for [`convert`]. Every field has a default except the ones a
/// representation needs: `hour_interval` (all but geotimehash),
/// `subinterval_hours` (time grid) and `precision` (geotimehash).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Interval length in hours.
    pub hour_interval: Option<f64>,
    /// Time grid column width in hours.
    pub subinterval_hours: Option<f64>,
    /// Timehash precision, 1 through 10.
    pub precision: Option<u8>,
    /// Resolution of the fallback [`GridHasher`].
    pub resolution: u8,
    pub self_loops: bool,
    pub mode: GraphMode,
    pub bridge_empty_intervals: bool,
    /// Time grid cells as base-16 integers instead of strings.
    pub integerize: bool,
    pub boundary_epsilon_us: i64,
    pub subinterval_epsilon_ns: i64,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        let slicing = SlicingConfig::default();
        let chronnet = ChronnetConfig::default();
        Self {
            hour_interval: None,
            subinterval_hours: None,
            precision: None,
            resolution: 10,
            self_loops: chronnet.self_loops,
            mode: chronnet.mode,
            bridge_empty_intervals: chronnet.bridge_empty_intervals,
            integerize: false,
            boundary_epsilon_us: slicing.boundary_epsilon.num_microseconds().unwrap_or(1_000_000),
            subinterval_epsilon_ns: slicing.subinterval_epsilon.num_nanoseconds().unwrap_or(1),
        }
    }
}

impl ConvertConfig {
    pub fn new(hour_interval: f64) -> Self {
        Self { hour_interval: Some(hour_interval), ..Default::default() }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_subinterval_hours(mut self, hours: f64) -> Self {
        self.subinterval_hours = Some(hours);
        self
    }

    pub fn with_resolution(mut self, resolution: u8) -> Self {
        self.resolution = resolution;
        self
    }

    /// The interval as a duration, rounded to the microsecond.
    pub fn period(&self, representation: Representation) -> Result<TimeDelta> {
        let hours = self.hour_interval.ok_or(Error::MissingOption {
            option: "hour_interval",
            representation: representation.name(),
        })?;
        hours_to_delta(hours, "hour_interval")
    }

    pub fn subinterval(&self, representation: Representation) -> Result<TimeDelta> {
        let hours = self.subinterval_hours.ok_or(Error::MissingOption {
            option: "subinterval_hours",
            representation: representation.name(),
        })?;
        hours_to_delta(hours, "subinterval_hours")
    }

    pub fn precision(&self, representation: Representation) -> Result<u8> {
        self.precision.ok_or(Error::MissingOption {
            option: "precision",
            representation: representation.name(),
        })
    }

    /// Check every value the config carries, whether or not the chosen
    /// representation reads it.
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 || self.resolution > MAX_RESOLUTION {
            return Err(Error::InvalidConfig(format!(
                "resolution {} outside 1..={MAX_RESOLUTION}",
                self.resolution
            )));
        }
        if let Some(hours) = self.hour_interval {
            hours_to_delta(hours, "hour_interval")?;
        }
        if let Some(hours) = self.subinterval_hours {
            hours_to_delta(hours, "subinterval_hours")?;
        }
        if let Some(precision) = self.precision {
            precision_delta(precision)?;
        }
        self.slicing()?;
        Ok(())
    }

    pub fn slicing(&self) -> Result<SlicingConfig> {
        let config = SlicingConfig {
            boundary_epsilon: TimeDelta::microseconds(self.boundary_epsilon_us),
            subinterval_epsilon: TimeDelta::nanoseconds(self.subinterval_epsilon_ns),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn chronnet(&self) -> ChronnetConfig {
        ChronnetConfig {
            self_loops: self.self_loops,
            mode: self.mode,
            bridge_empty_intervals: self.bridge_empty_intervals,
        }
    }
}

fn hours_to_delta(hours: f64, option: &str) -> Result<TimeDelta> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(Error::InvalidConfig(format!("{option} must be a positive number of hours, got {hours}")));
    }
    let micros = (hours * 3_600_000_000.0).round();
    if micros < 1.0 || micros >= i64::MAX as f64 {
        return Err(Error::InvalidConfig(format!("{option} of {hours} hours is out of range")));
    }
    Ok(TimeDelta::microseconds(micros as i64))
}

/// A converted track.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "representation", content = "value")]
pub enum Converted {
    #[serde(rename = "timehex")]
    TimeHex(TimeHexTable),
    #[serde(rename = "chronnet")]
    Chronnet(CellGraph),
    #[serde(rename = "geosynchnet")]
    Geosynchnet(CellGraph),
    #[serde(rename = "geotimehash")]
    GeoTimeHash(GeoTimeHashMap),
    #[serde(rename = "time_grid")]
    TimeGrid(TimeGrid),
}

impl Converted {
    pub fn representation(&self) -> Representation {
        match self {
            Converted::TimeHex(_) => Representation::TimeHex,
            Converted::Chronnet(_) => Representation::Chronnet,
            Converted::Geosynchnet(_) => Representation::Geosynchnet,
            Converted::GeoTimeHash(_) => Representation::GeoTimeHash,
            Converted::TimeGrid(_) => Representation::TimeGrid,
        }
    }

    pub fn as_graph(&self) -> Option<&CellGraph> {
        match self {
            Converted::Chronnet(g) | Converted::Geosynchnet(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TimeHexTable> {
        match self {
            Converted::TimeHex(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_geotimehash(&self) -> Option<&GeoTimeHashMap> {
        match self {
            Converted::GeoTimeHash(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_time_grid(&self) -> Option<&TimeGrid> {
        match self {
            Converted::TimeGrid(g) => Some(g),
            _ => None,
        }
    }
}

/// Convert `track` into `representation`.
///
/// Configuration problems fail before any work is done; a track too short
/// to produce anything yields an empty result.
pub fn convert(
    track: &Track,
    representation: Representation,
    config: &ConvertConfig,
    hasher: Option<&dyn SpatialHasher>,
) -> Result<Converted> {
    config.validate()?;
    let fallback;
    let hasher: &dyn SpatialHasher = match hasher {
        Some(h) => h,
        None => {
            fallback = GridHasher::new(config.resolution)?;
            &fallback
        }
    };
    let slicing = config.slicing()?;
    debug!(%representation, shapes = track.len(), "converting track");

    let converted = match representation {
        Representation::TimeHex => {
            let hashed = hash_intervals(track, config.period(representation)?, hasher, &slicing)?;
            Converted::TimeHex(timehex_table(hashed))
        }
        Representation::Chronnet => {
            let hashed = hash_intervals(track, config.period(representation)?, hasher, &slicing)?;
            Converted::Chronnet(chronnet_create(&hashed, &config.chronnet()))
        }
        Representation::Geosynchnet => {
            let hashed = hash_intervals(track, config.period(representation)?, hasher, &slicing)?;
            Converted::Geosynchnet(geosynchnet_create(&hashed))
        }
        Representation::GeoTimeHash => {
            Converted::GeoTimeHash(convert_geotimehash(track, config.precision(representation)?, hasher)?)
        }
        Representation::TimeGrid => Converted::TimeGrid(build_time_grid(
            track,
            config.period(representation)?,
            config.subinterval(representation)?,
            hasher,
            config.integerize,
            &slicing,
        )?),
    };
    Ok(converted)
}

/// [`convert`] with the representation given by name.
pub fn convert_named(
    track: &Track,
    representation: &str,
    config: &ConvertConfig,
    hasher: Option<&dyn SpatialHasher>,
) -> Result<Converted> {
    convert(track, representation.parse()?, config, hasher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representation_names() {
        assert_eq!("TimeHex".parse::<Representation>().unwrap(), Representation::TimeHex);
        assert_eq!("time-grid".parse::<Representation>().unwrap(), Representation::TimeGrid);
        assert_eq!(Representation::GeoTimeHash.to_string(), "geotimehash");
        assert!(matches!(
            "timecube".parse::<Representation>(),
            Err(Error::UnsupportedRepresentation(name)) if name == "timecube"
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config = ConvertConfig::from_json(r#"{"hour_interval": 0.5, "precision": 8, "mode": "undirected"}"#).unwrap();
        assert_eq!(config.period(Representation::Chronnet).unwrap(), TimeDelta::minutes(30));
        assert_eq!(config.precision(Representation::GeoTimeHash).unwrap(), 8);
        assert_eq!(config.chronnet().mode, GraphMode::Undirected);
        assert!(config.self_loops);
        assert_eq!(config.resolution, 10);
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        assert!(matches!(ConvertConfig::from_json(r#"{"hours": 1}"#), Err(Error::Json(_))));
    }

    #[test]
    fn test_missing_and_invalid_options() {
        let config = ConvertConfig::default();
        assert!(matches!(
            config.period(Representation::TimeHex),
            Err(Error::MissingOption { option: "hour_interval", representation: "timehex" })
        ));
        assert!(matches!(
            ConvertConfig::new(-1.0).period(Representation::Chronnet),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ConvertConfig::new(f64::NAN).period(Representation::Chronnet),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_slicing_from_config() {
        let slicing = ConvertConfig::default().slicing().unwrap();
        assert_eq!(slicing, SlicingConfig::default());

        let negative = ConvertConfig { boundary_epsilon_us: -5, ..Default::default() };
        assert!(negative.slicing().is_err());

        let config = ConvertConfig::from_json(r#"{"subinterval_epsilon_ns": 250}"#).unwrap();
        assert_eq!(config.slicing().unwrap().subinterval_epsilon, TimeDelta::nanoseconds(250));
    }

    #[test]
    fn test_validate_checks_every_field() {
        assert!(ConvertConfig::new(1.0).with_precision(8).validate().is_ok());
        assert!(matches!(
            ConvertConfig::new(1.0).with_resolution(31).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ConvertConfig::new(1.0).with_precision(11).validate(),
            Err(Error::UnsupportedPrecision(11))
        ));
        assert!(matches!(
            ConvertConfig::new(1.0).with_subinterval_hours(0.0).validate(),
            Err(Error::InvalidConfig(_))
        ));
    }
}
