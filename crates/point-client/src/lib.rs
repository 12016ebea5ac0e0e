//! Native feeder for the thermal grid server
//!
//! Reads temperature readings for one grid point and pushes them with
//! `POST /state`.

pub mod client;
pub mod reading;

pub use client::{ClientError, PointClient};
pub use reading::{parse_reading, Reading, ReadingParser};
