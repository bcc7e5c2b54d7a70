use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub const ROLLER_TAG: &str = "Rouleau";
pub const ROTARY_TAG: &str = "Rotative";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Behavior tag of a placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum PlacementKind {
    /// Roller conveyor (`"Rouleau"`).
    Roller,
    /// Rotary table (`"Rotative"`).
    Rotary,
    /// Missing or unrecognized tag. Built as a conveyor, never animated.
    Other(Option<String>),
}

impl Default for PlacementKind {
    fn default() -> Self {
        PlacementKind::Other(None)
    }
}

impl From<Option<String>> for PlacementKind {
    fn from(tag: Option<String>) -> Self {
        match tag.as_deref() {
            Some(ROLLER_TAG) => PlacementKind::Roller,
            Some(ROTARY_TAG) => PlacementKind::Rotary,
            _ => PlacementKind::Other(tag),
        }
    }
}

impl From<PlacementKind> for Option<String> {
    fn from(kind: PlacementKind) -> Self {
        match kind {
            PlacementKind::Roller => Some(ROLLER_TAG.to_string()),
            PlacementKind::Rotary => Some(ROTARY_TAG.to_string()),
            PlacementKind::Other(tag) => tag,
        }
    }
}

/// One entry of the layout: where and what to instantiate.
///
/// Numbers are kept in double precision until the geometry is built, so
/// counts derived from them (rollers, leg pairs) floor the same way the
/// layout author computes them. Missing or `null` numbers become NaN and flow
/// into the geometry unchecked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    #[serde(default = "not_a_number", deserialize_with = "number_or_nan")]
    pub x: f64,
    #[serde(default = "not_a_number", deserialize_with = "number_or_nan")]
    pub y: f64,
    #[serde(default = "not_a_number", deserialize_with = "number_or_nan")]
    pub z: f64,
    #[serde(default = "not_a_number", deserialize_with = "number_or_nan")]
    pub length: f64,
    #[serde(default = "not_a_number", deserialize_with = "number_or_nan")]
    pub width: f64,
    /// Yaw in degrees.
    #[serde(default = "not_a_number", deserialize_with = "number_or_nan")]
    pub r: f64,
    #[serde(rename = "type", default)]
    pub kind: PlacementKind,
}

fn not_a_number() -> f64 {
    f64::NAN
}

fn number_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl PlacementRecord {
    pub fn new(x: f64, y: f64, z: f64, length: f64, width: f64, r: f64, kind: PlacementKind) -> Self {
        Self {
            x,
            y,
            z,
            length,
            width,
            r,
            kind,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    /// Yaw in radians; an absent or NaN angle counts as zero.
    pub fn yaw_radians(&self) -> f32 {
        if self.r.is_nan() {
            0.0
        } else {
            self.r.to_radians() as f32
        }
    }
}

pub fn default_layout() -> Vec<PlacementRecord> {
    vec![
        PlacementRecord::new(0.0, 0.0, 0.0, 10.0, 2.0, 0.0, PlacementKind::Roller),
        PlacementRecord::new(10.0, 0.0, 0.0, 10.0, 2.0, 90.0, PlacementKind::Roller),
        PlacementRecord::new(0.0, 0.0, 5.0, 2.0, 2.0, 0.0, PlacementKind::Rotary),
    ]
}

pub fn parse_layout(text: &str) -> Result<Vec<PlacementRecord>, ConfigError> {
    Ok(serde_json::from_str(text)?)
}

pub fn read_layout_file(path: &Path) -> Result<Vec<PlacementRecord>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_layout(&text)
}

pub fn layout_to_json(records: &[PlacementRecord]) -> Result<String, ConfigError> {
    Ok(serde_json::to_string_pretty(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_records() {
        let records = parse_layout(
            r#"[
                {"x": 0, "y": 0, "z": 0, "length": 10, "width": 2, "r": 0, "type": "Rouleau"},
                {"x": 0, "y": 0, "z": 5, "length": 2, "width": 2, "r": 90, "type": "Rotative"}
            ]"#,
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, PlacementKind::Roller);
        assert_eq!(records[0].length, 10.0);
        assert_eq!(records[1].kind, PlacementKind::Rotary);
        assert_eq!(records[1].z, 5.0);
        assert!((records[1].yaw_radians() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn missing_and_null_numbers_become_nan() {
        let records = parse_layout(r#"[{"x": 1, "y": null, "type": "Rouleau"}]"#).unwrap();
        let record = &records[0];

        assert_eq!(record.x, 1.0);
        assert!(record.y.is_nan());
        assert!(record.z.is_nan());
        assert!(record.length.is_nan());
        assert!(record.width.is_nan());
        assert_eq!(record.yaw_radians(), 0.0);
    }

    #[test]
    fn unknown_or_missing_tags_are_kept_as_other() {
        let records = parse_layout(r#"[{"type": "Tapis"}, {}]"#).unwrap();
        assert_eq!(records[0].kind, PlacementKind::Other(Some("Tapis".to_string())));
        assert_eq!(records[1].kind, PlacementKind::Other(None));
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert!(matches!(parse_layout("[{"), Err(ConfigError::Json(_))));
        assert!(matches!(parse_layout(r#"{"x": 1}"#), Err(ConfigError::Json(_))));
        assert!(matches!(
            parse_layout(r#"[{"x": "left"}]"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn default_layout_survives_the_editor_round_trip() {
        let text = layout_to_json(&default_layout()).unwrap();
        assert!(text.contains("\"type\": \"Rotative\""));
        assert_eq!(parse_layout(&text).unwrap(), default_layout());
    }

    #[test]
    fn missing_file_reports_its_path() {
        let error = read_layout_file(Path::new("/nonexistent/layout.json")).unwrap_err();
        assert!(error.to_string().contains("/nonexistent/layout.json"));
    }
}
