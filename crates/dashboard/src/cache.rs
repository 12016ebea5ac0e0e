//! Client-side copy of the input grid
//!
//! Owned by the poll loop and shared with the click handlers. It is only ever
//! replaced as a whole after a successful fetch.

use therm_shared::{Grid, GridInfo, PointType, ThermError, ThermResult};

#[derive(Debug, Clone, PartialEq)]
pub struct GridCache {
    width: u16,
    height: u16,
    temp: Grid<f32>,
    types: Grid<PointType>,
}

/// Cached value of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellState {
    pub temp: f32,
    pub point_type: PointType,
}

impl GridCache {
    /// Creates an empty-valued cache of the session dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            temp: vec![vec![0.0; width as usize]; height as usize],
            types: vec![vec![PointType::OutOfRange; width as usize]; height as usize],
        }
    }

    /// Replaces every cell with `info`, which must match the session
    /// dimensions.
    pub fn replace(&mut self, info: &GridInfo) -> ThermResult<()> {
        therm_shared::check_dimensions("info.temp", &info.temp, self.width, self.height)?;
        therm_shared::check_dimensions("info.type", &info.types, self.width, self.height)?;
        self.temp = info.temp.clone();
        self.types = info.types.clone();
        Ok(())
    }

    pub fn cell(&self, row: usize, col: usize) -> ThermResult<CellState> {
        let temp = self.temp.get(row).and_then(|r| r.get(col));
        let point_type = self.types.get(row).and_then(|r| r.get(col));

        match (temp, point_type) {
            (Some(&temp), Some(&point_type)) => Ok(CellState { temp, point_type }),
            _ => Err(ThermError::OutOfBounds {
                x: col,
                y: row,
                width: self.width,
                height: self.height,
            }),
        }
    }
}
