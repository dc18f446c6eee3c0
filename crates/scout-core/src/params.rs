//! Flight parameters attached to every waypoint-generation request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A numeric parameter as entered by the operator.
///
/// Text that does not coerce to a number is kept verbatim and sent to the
/// backend as a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Raw(String),
}

impl ParamValue {
    /// Coerce operator text: blank → 0, finite numeric → number, anything else raw.
    pub fn coerce(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return ParamValue::Number(0.0);
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => ParamValue::Number(value),
            _ => ParamValue::Raw(input.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(value) => Some(*value),
            ParamValue::Raw(_) => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(value) => write!(f, "{}", value),
            ParamValue::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Numeric fields that can be edited from text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightParam {
    LineSpacing,
    FlightAltitude,
    FlightVelocity,
    FenceBuffer,
    Angle,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("unknown flight parameter: {0}")]
    UnknownField(String),
    #[error("expected key=value, got: {0}")]
    MalformedAssignment(String),
    #[error("invalid boolean for {field}: {value}")]
    InvalidBool { field: String, value: String },
}

impl FromStr for FlightParam {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "line_spacing" => Ok(FlightParam::LineSpacing),
            "flight_altitude" => Ok(FlightParam::FlightAltitude),
            "flight_velocity" => Ok(FlightParam::FlightVelocity),
            "fence_buffer" => Ok(FlightParam::FenceBuffer),
            "angle" => Ok(FlightParam::Angle),
            other => Err(ParamError::UnknownField(other.to_string())),
        }
    }
}

/// Survey pattern parameters. Always fully populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightParameters {
    pub line_spacing: ParamValue,
    pub flight_altitude: ParamValue,
    pub flight_velocity: ParamValue,
    pub fence_buffer: ParamValue,
    pub optimize_angle: bool,
    pub angle: ParamValue,
}

impl Default for FlightParameters {
    fn default() -> Self {
        Self {
            line_spacing: ParamValue::Number(20.0),
            flight_altitude: ParamValue::Number(30.0),
            flight_velocity: ParamValue::Number(4.0),
            fence_buffer: ParamValue::Number(5.0),
            optimize_angle: true,
            angle: ParamValue::Number(90.0),
        }
    }
}

impl FlightParameters {
    /// Merge a single text edit into the record, leaving other fields intact.
    pub fn set(&mut self, field: FlightParam, input: &str) {
        let value = ParamValue::coerce(input);
        match field {
            FlightParam::LineSpacing => self.line_spacing = value,
            FlightParam::FlightAltitude => self.flight_altitude = value,
            FlightParam::FlightVelocity => self.flight_velocity = value,
            FlightParam::FenceBuffer => self.fence_buffer = value,
            FlightParam::Angle => self.angle = value,
        }
    }

    pub fn set_optimize_angle(&mut self, optimize: bool) {
        self.optimize_angle = optimize;
    }

    /// Apply a `key=value` assignment (CLI form). `optimize_angle` takes a bool.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), ParamError> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| ParamError::MalformedAssignment(assignment.to_string()))?;
        let key = key.trim();
        if key == "optimize_angle" {
            let optimize = match value.trim() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                other => {
                    return Err(ParamError::InvalidBool {
                        field: key.to_string(),
                        value: other.to_string(),
                    })
                }
            };
            self.set_optimize_angle(optimize);
            return Ok(());
        }
        let field: FlightParam = key.parse()?;
        self.set(field, value);
        Ok(())
    }

    /// Parameters for one waypoint request, tagged with the target file.
    pub fn for_file(&self, filename: &str) -> WaypointParams {
        WaypointParams {
            flight: self.clone(),
            kml_file: filename.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaypointParams {
    #[serde(flatten)]
    pub flight: FlightParameters,
    pub kml_file: String,
}

/// Body of `/generate_waypoint`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaypointRequest {
    pub filename: String,
    pub params: WaypointParams,
}

impl WaypointRequest {
    pub fn new(filename: &str, params: &FlightParameters) -> Self {
        Self {
            filename: filename.to_string(),
            params: params.for_file(filename),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_survey_profile() {
        let params = FlightParameters::default();
        assert_eq!(params.line_spacing.as_f64(), Some(20.0));
        assert_eq!(params.flight_altitude.as_f64(), Some(30.0));
        assert_eq!(params.flight_velocity.as_f64(), Some(4.0));
        assert_eq!(params.fence_buffer.as_f64(), Some(5.0));
        assert_eq!(params.angle.as_f64(), Some(90.0));
        assert!(params.optimize_angle);
    }

    #[test]
    fn coercion_keeps_raw_text_when_not_numeric() {
        assert_eq!(ParamValue::coerce("12.5"), ParamValue::Number(12.5));
        assert_eq!(ParamValue::coerce(" 7 "), ParamValue::Number(7.0));
        assert_eq!(ParamValue::coerce(""), ParamValue::Number(0.0));
        assert_eq!(ParamValue::coerce("12m"), ParamValue::Raw("12m".into()));
    }

    #[test]
    fn non_finite_text_stays_raw_on_the_wire() {
        assert_eq!(ParamValue::coerce("inf"), ParamValue::Raw("inf".into()));
        assert_eq!(ParamValue::coerce("-Infinity"), ParamValue::Raw("-Infinity".into()));
        assert_eq!(ParamValue::coerce("NaN"), ParamValue::Raw("NaN".into()));

        let mut params = FlightParameters::default();
        params.set(FlightParam::Angle, "inf");
        let body = serde_json::to_value(WaypointRequest::new("a.kml", &params)).unwrap();
        assert_eq!(body["params"]["angle"], json!("inf"));
    }

    #[test]
    fn set_merges_one_field() {
        let mut params = FlightParameters::default();
        params.set(FlightParam::FlightAltitude, "45");
        params.set(FlightParam::Angle, "steep");
        assert_eq!(params.flight_altitude, ParamValue::Number(45.0));
        assert_eq!(params.angle, ParamValue::Raw("steep".into()));
        assert_eq!(params.line_spacing, ParamValue::Number(20.0));
    }

    #[test]
    fn assignments_parse_keys_and_bools() {
        let mut params = FlightParameters::default();
        params.apply_assignment("line_spacing=15").unwrap();
        params.apply_assignment("optimize_angle=false").unwrap();
        assert_eq!(params.line_spacing.as_f64(), Some(15.0));
        assert!(!params.optimize_angle);

        assert_eq!(
            params.apply_assignment("speed=3"),
            Err(ParamError::UnknownField("speed".into()))
        );
        assert!(matches!(
            params.apply_assignment("angle"),
            Err(ParamError::MalformedAssignment(_))
        ));
    }

    #[test]
    fn waypoint_request_merges_filename_into_params() {
        let mut params = FlightParameters::default();
        params.set(FlightParam::FenceBuffer, "abc");
        let body = serde_json::to_value(WaypointRequest::new("field1_x.kml", &params)).unwrap();
        assert_eq!(body["filename"], json!("field1_x.kml"));
        assert_eq!(body["params"]["kml_file"], json!("field1_x.kml"));
        assert_eq!(body["params"]["line_spacing"], json!(20.0));
        assert_eq!(body["params"]["fence_buffer"], json!("abc"));
        assert_eq!(body["params"]["optimize_angle"], json!(true));
    }
}
