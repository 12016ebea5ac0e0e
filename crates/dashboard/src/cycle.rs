//! Classification cycle applied when an input cell is clicked

use serde::{Deserialize, Serialize};
use therm_shared::{PointType, ThermError, ThermResult};

/// Named cycle configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CyclePreset {
    /// Boundary -> GroundTruth -> OutOfRange, new value when leaving OutOfRange
    #[default]
    RefreshOutOfRange,
    /// Boundary -> OutOfRange -> GroundTruth, new value when leaving GroundTruth
    RefreshGroundTruth,
}

impl CyclePreset {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "refresh-out-of-range" => Some(CyclePreset::RefreshOutOfRange),
            "refresh-ground-truth" => Some(CyclePreset::RefreshGroundTruth),
            _ => None,
        }
    }

    pub fn policy(&self) -> CyclePolicy {
        match self {
            CyclePreset::RefreshOutOfRange => CyclePolicy {
                order: [
                    PointType::Boundary,
                    PointType::GroundTruth,
                    PointType::OutOfRange,
                ],
                refresh_on_leave: PointType::OutOfRange,
            },
            CyclePreset::RefreshGroundTruth => CyclePolicy {
                order: [
                    PointType::Boundary,
                    PointType::OutOfRange,
                    PointType::GroundTruth,
                ],
                refresh_on_leave: PointType::GroundTruth,
            },
        }
    }
}

/// A 3-cycle over the point types plus the type whose departure needs a
/// fresh temperature from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclePolicy {
    order: [PointType; 3],
    refresh_on_leave: PointType,
}

impl CyclePolicy {
    pub fn new(order: [PointType; 3], refresh_on_leave: PointType) -> ThermResult<Self> {
        let distinct = PointType::ALL.iter().all(|ty| order.contains(ty));
        if !distinct {
            return Err(ThermError::InvalidCycle {
                message: format!("{:?} is not a permutation of all point types", order),
            });
        }
        Ok(Self {
            order,
            refresh_on_leave,
        })
    }

    pub fn next(&self, current: PointType) -> PointType {
        // order holds every type exactly once
        let idx = self
            .order
            .iter()
            .position(|&ty| ty == current)
            .unwrap_or(0);
        self.order[(idx + 1) % self.order.len()]
    }

    pub fn needs_new_value(&self, current: PointType) -> bool {
        current == self.refresh_on_leave
    }
}

impl Default for CyclePolicy {
    fn default() -> Self {
        CyclePreset::default().policy()
    }
}
