//! Decides what a click on an input cell sends to the server

use therm_shared::{PointType, PointUpdate, ThermResult};

use crate::cache::GridCache;
use crate::cycle::CyclePolicy;

/// Outcome of a click before any user interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickAction {
    /// Send right away, keeping the cached temperature
    Submit(PointUpdate),
    /// Ask the user for a temperature first
    Prompt(PendingUpdate),
}

/// Update waiting on a user-supplied temperature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingUpdate {
    pub x: u16,
    pub y: u16,
    pub current_temp: f32,
    pub next_type: PointType,
}

impl PendingUpdate {
    pub fn complete(self, temp: f32) -> PointUpdate {
        PointUpdate {
            x: self.x,
            y: self.y,
            temp,
            point_type: self.next_type,
        }
    }
}

pub fn plan_click(
    cache: &GridCache,
    policy: &CyclePolicy,
    row: usize,
    col: usize,
) -> ThermResult<ClickAction> {
    let cell = cache.cell(row, col)?;
    let next_type = policy.next(cell.point_type);
    // cache.cell already bounds-checked against u16 dimensions
    let (x, y) = (col as u16, row as u16);

    if policy.needs_new_value(cell.point_type) {
        Ok(ClickAction::Prompt(PendingUpdate {
            x,
            y,
            current_temp: cell.temp,
            next_type,
        }))
    } else {
        Ok(ClickAction::Submit(PointUpdate {
            x,
            y,
            temp: cell.temp,
            point_type: next_type,
        }))
    }
}

/// Parses the answer typed into the temperature prompt.
pub fn parse_temperature(input: &str) -> Option<f32> {
    input
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|t| t.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::CyclePreset;
    use therm_shared::GridInfo;

    fn cache() -> GridCache {
        let mut cache = GridCache::new(3, 2);
        cache
            .replace(&GridInfo {
                temp: vec![vec![20.0, 21.0, 22.0], vec![23.0, 24.0, 25.0]],
                types: vec![
                    vec![PointType::Boundary, PointType::GroundTruth, PointType::OutOfRange],
                    vec![PointType::GroundTruth; 3],
                ],
            })
            .unwrap();
        cache
    }

    #[test]
    fn test_reuses_cached_temperature() {
        let policy = CyclePreset::RefreshOutOfRange.policy();
        let action = plan_click(&cache(), &policy, 0, 1).unwrap();
        assert_eq!(
            action,
            ClickAction::Submit(PointUpdate {
                x: 1,
                y: 0,
                temp: 21.0,
                point_type: PointType::OutOfRange,
            })
        );
    }

    #[test]
    fn test_leaving_out_of_range_prompts() {
        let policy = CyclePreset::RefreshOutOfRange.policy();
        let action = plan_click(&cache(), &policy, 0, 2).unwrap();
        let ClickAction::Prompt(pending) = action else {
            panic!("expected a prompt, got {:?}", action);
        };
        assert_eq!(pending.next_type, PointType::Boundary);
        assert_eq!(pending.complete(19.5).temp, 19.5);
    }

    #[test]
    fn test_ground_truth_prompt_posts_parsed_value() {
        let policy = CyclePreset::RefreshGroundTruth.policy();
        let action = plan_click(&cache(), &policy, 1, 2).unwrap();
        let ClickAction::Prompt(pending) = action else {
            panic!("expected a prompt, got {:?}", action);
        };
        let answer = parse_temperature(" 27.25 ").unwrap();
        let update = pending.complete(answer);
        assert_eq!(
            serde_json::to_value(update).unwrap(),
            serde_json::json!({ "x": 2, "y": 1, "temp": 27.25, "type": "Boundary" })
        );
    }

    #[test]
    fn test_click_outside_grid() {
        let policy = CyclePolicy::default();
        assert!(plan_click(&cache(), &policy, 2, 0).is_err());
    }

    #[test]
    fn test_parse_temperature() {
        assert_eq!(parse_temperature("21"), Some(21.0));
        assert_eq!(parse_temperature("-4.5"), Some(-4.5));
        assert_eq!(parse_temperature(""), None);
        assert_eq!(parse_temperature("warm"), None);
        assert_eq!(parse_temperature("NaN"), None);
        assert_eq!(parse_temperature("inf"), None);
    }
}
