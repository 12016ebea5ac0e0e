//! Per-cell rendering rules
//!
//! Everything here is plain data so the DOM layer only copies fields onto
//! elements. Rendering the same grid twice produces equal frames.

use therm_shared::PointType;

use crate::color::{temperature_to_color, ColorRange, ColorScale};

pub const BOUNDARY_FONT_SIZE: &str = "18px";
pub const GROUND_TRUTH_FONT_SIZE: &str = "12px";

/// Text shown in a freshly built cell
pub const PLACEHOLDER_TEXT: &str = "0.00";

/// Style and content for one table cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellAppearance {
    pub text: Option<String>,
    pub background: Option<String>,
    pub font_weight: &'static str,
    pub font_size: &'static str,
    pub opacity: &'static str,
}

impl CellAppearance {
    pub fn for_point(temp: f32, point_type: PointType, range: &ColorRange) -> Self {
        match point_type {
            PointType::Boundary => Self {
                text: Some(format_temperature(temp)),
                background: Some(temperature_to_color(temp, range).to_string()),
                font_weight: "bold",
                font_size: BOUNDARY_FONT_SIZE,
                opacity: "1",
            },
            PointType::GroundTruth => Self {
                text: Some(format_temperature(temp)),
                background: Some(temperature_to_color(temp, range).to_string()),
                font_weight: "normal",
                font_size: GROUND_TRUTH_FONT_SIZE,
                opacity: "1",
            },
            PointType::OutOfRange => Self {
                text: None,
                background: None,
                font_weight: "normal",
                font_size: GROUND_TRUTH_FONT_SIZE,
                opacity: "0",
            },
        }
    }
}

pub fn format_temperature(temp: f32) -> String {
    format!("{:.2}", temp)
}

/// Appearance of every cell of a grid, row-major
pub type Frame = Vec<Vec<CellAppearance>>;

/// Computes the frame for a temperature grid classified by `types`.
///
/// Both grids must already be validated against the session dimensions.
pub fn build_frame(temps: &[Vec<f32>], types: &[Vec<PointType>], scale: ColorScale) -> Frame {
    let range = scale.range_for(temps, types);

    temps
        .iter()
        .zip(types)
        .map(|(temp_row, type_row)| {
            temp_row
                .iter()
                .zip(type_row)
                .map(|(&temp, &ty)| CellAppearance::for_point(temp, ty, &range))
                .collect()
        })
        .collect()
}
