//! Temperature to color mapping
//!
//! Cold readings map to a dark green, hot readings to a bright red. The range
//! is either the fixed [18, 30] band or the observed extremes of the grid
//! being rendered, widened by one degree on each side so neither end
//! saturates.

use std::fmt;

use serde::{Deserialize, Serialize};
use therm_shared::PointType;

/// Margin added outside the observed extremes
pub const OBSERVED_MARGIN: f32 = 1.0;

/// How the color range of a grid is chosen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorScale {
    /// Always [18, 30]
    Fixed,
    /// Min/max of every finite cell of the current grid
    #[default]
    Observed,
    /// Like `Observed`, but only cells that are not `OutOfRange` count
    Visible,
}

impl ColorScale {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fixed" => Some(ColorScale::Fixed),
            "observed" => Some(ColorScale::Observed),
            "visible" => Some(ColorScale::Visible),
            _ => None,
        }
    }

    /// Picks the range for one grid. `types` only matters for `Visible`.
    pub fn range_for(&self, temps: &[Vec<f32>], types: &[Vec<PointType>]) -> ColorRange {
        match self {
            ColorScale::Fixed => ColorRange::FIXED,
            ColorScale::Observed => {
                ColorRange::observed(temps.iter().flatten().copied()).unwrap_or(ColorRange::FIXED)
            }
            ColorScale::Visible => {
                let visible = temps.iter().zip(types).flat_map(|(temp_row, type_row)| {
                    temp_row
                        .iter()
                        .zip(type_row)
                        .filter(|(_, ty)| ty.is_visible())
                        .map(|(&t, _)| t)
                });
                ColorRange::observed(visible).unwrap_or(ColorRange::FIXED)
            }
        }
    }
}

/// Closed temperature interval used for normalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRange {
    pub min: f32,
    pub max: f32,
}

impl ColorRange {
    pub const FIXED: ColorRange = ColorRange {
        min: 18.0,
        max: 30.0,
    };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Builds the widened range from observed values. Non-finite values are
    /// ignored; returns `None` if nothing finite was observed.
    pub fn observed(values: impl IntoIterator<Item = f32>) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f32, f32)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;

        Some(Self {
            min: min - OBSERVED_MARGIN,
            max: max + OBSERVED_MARGIN,
        })
    }

    /// Clamps `temp` into the range and scales it to [0, 1].
    pub fn normalize(&self, temp: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 || temp.is_nan() {
            return 0.0;
        }
        (temp.clamp(self.min, self.max) - self.min) / span
    }
}

/// CSS `hsl()` color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslColor {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

pub fn temperature_to_color(temp: f32, range: &ColorRange) -> HslColor {
    let t = range.normalize(temp);

    HslColor {
        hue: (1.0 - t) * 100.0,
        saturation: 100.0,
        lightness: t * 50.0,
    }
}
