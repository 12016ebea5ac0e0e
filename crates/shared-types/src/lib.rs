//! Shared types for the thermal grid dashboard
//!
//! This crate contains the `/state` wire format shared between the browser
//! dashboard and the native point client, together with the validation
//! rules every payload has to satisfy before it is rendered.

pub mod errors;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use errors::{ThermError, ThermResult};

/// Row-major grid, `height` rows of `width` columns
pub type Grid<T> = Vec<Vec<T>>;

/// Classification of a single grid point
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PointType {
    /// The point's value is fixed and constrains the computation.
    Boundary,
    /// A known reference value, compared against computed results.
    GroundTruth,
    /// The point does not participate and is hidden from display.
    OutOfRange,
}

impl PointType {
    pub const ALL: [PointType; 3] = [
        PointType::Boundary,
        PointType::GroundTruth,
        PointType::OutOfRange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PointType::Boundary => "Boundary",
            PointType::GroundTruth => "GroundTruth",
            PointType::OutOfRange => "OutOfRange",
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, PointType::OutOfRange)
    }
}

impl fmt::Display for PointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointType {
    type Err = ThermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "boundary" => Ok(PointType::Boundary),
            "groundtruth" => Ok(PointType::GroundTruth),
            "outofrange" => Ok(PointType::OutOfRange),
            _ => Err(ThermError::UnknownPointType {
                value: s.to_string(),
            }),
        }
    }
}

/// Update of one grid point, sent with `POST /state`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PointUpdate {
    /// column of the point
    pub x: u16,
    /// row of the point
    pub y: u16,
    pub temp: f32,
    #[serde(rename = "type")]
    pub point_type: PointType,
}

/// Temperatures and classifications of the input grid
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GridInfo {
    pub temp: Grid<f32>,
    #[serde(rename = "type")]
    pub types: Grid<PointType>,
}

/// One named computed grid, or the error that prevented computing it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    pub name: String,
    pub error_code: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<Grid<f32>>,
}

/// How a single result should be presented
#[derive(Debug, Clone, PartialEq)]
pub enum ResultOutcome<'a> {
    Ready(&'a Grid<f32>),
    Failed { code: u32, message: &'a str },
    Malformed(ThermError),
}

pub const UNKNOWN_ERROR_MESSAGE: &str = "unknown error";

impl ResultSet {
    pub fn ready(name: impl Into<String>, temp: Grid<f32>) -> Self {
        Self {
            name: name.into(),
            error_code: 0,
            error_message: None,
            temp: Some(temp),
        }
    }

    pub fn failed(name: impl Into<String>, error_code: u32, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error_code,
            error_message: Some(message.into()),
            temp: None,
        }
    }

    /// Classifies this result against the session's grid dimensions.
    pub fn outcome(&self, width: u16, height: u16) -> ResultOutcome<'_> {
        match (self.error_code, &self.temp) {
            (0, Some(grid)) => match check_dimensions(&self.name, grid, width, height) {
                Ok(()) => ResultOutcome::Ready(grid),
                Err(e) => ResultOutcome::Malformed(e),
            },
            (0, None) => ResultOutcome::Malformed(ThermError::MissingGrid {
                name: self.name.clone(),
            }),
            (code, None) => ResultOutcome::Failed {
                code,
                message: self
                    .error_message
                    .as_deref()
                    .unwrap_or(UNKNOWN_ERROR_MESSAGE),
            },
            (code, Some(_)) => ResultOutcome::Malformed(ThermError::UnexpectedGrid {
                name: self.name.clone(),
                error_code: code,
            }),
        }
    }
}

/// Complete server state returned by `GET /state`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerState {
    pub width: u16,
    pub height: u16,
    pub info: GridInfo,
    #[serde(default)]
    pub results: Vec<ResultSet>,
}

impl ServerState {
    /// Checks the layout and the consistency of each result.
    pub fn validate(&self) -> ThermResult<()> {
        self.validate_layout()?;

        for result in &self.results {
            if let ResultOutcome::Malformed(e) = result.outcome(self.width, self.height) {
                return Err(e);
            }
        }
        Ok(())
    }

    /// Validates the dimensions, the input grid and the uniqueness of result
    /// names. The content of each result is left to `ResultSet::outcome` so
    /// one broken result does not hide the others.
    pub fn validate_layout(&self) -> ThermResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ThermError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        check_dimensions("info.temp", &self.info.temp, self.width, self.height)?;
        check_dimensions("info.type", &self.info.types, self.width, self.height)?;

        let mut seen = HashSet::new();
        for result in &self.results {
            if !seen.insert(result.name.as_str()) {
                return Err(ThermError::DuplicateResult {
                    name: result.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Verifies that `grid` has exactly `height` rows of `width` columns.
pub fn check_dimensions<T>(label: &str, grid: &Grid<T>, width: u16, height: u16) -> ThermResult<()> {
    let expected_rows = height as usize;
    let expected_cols = width as usize;
    let bad_row = grid.iter().find(|row| row.len() != expected_cols);

    if grid.len() != expected_rows || bad_row.is_some() {
        return Err(ThermError::DimensionMismatch {
            grid: label.to_string(),
            rows: grid.len(),
            cols: bad_row.or(grid.first()).map_or(0, |row| row.len()),
            expected_rows,
            expected_cols,
        });
    }
    Ok(())
}
