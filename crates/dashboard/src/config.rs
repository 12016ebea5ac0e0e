use serde::{Deserialize, Serialize};

use crate::color::ColorScale;
use crate::cycle::CyclePreset;

pub const MIN_POLL_INTERVAL_MS: u32 = 100;
/// Largest delay `setTimeout` accepts without wrapping
pub const MAX_TIMER_MS: u32 = i32::MAX as u32;

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    /// URL of the state endpoint, used for both GET and POST
    pub endpoint: String,

    /// Delay between two polls
    pub poll_interval_ms: u32,

    /// Abort a request after this long
    pub request_timeout_ms: u32,

    pub color_scale: ColorScale,

    pub cycle: CyclePreset,

    /// Edge length of a table cell in pixels
    pub cell_size_px: u32,

    /// Element ids the dashboard mounts into
    pub input_element_id: String,
    pub results_element_id: String,
    pub notices_element_id: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: "/state".to_string(),
            poll_interval_ms: 1000,
            request_timeout_ms: 5000,
            color_scale: ColorScale::Observed,
            cycle: CyclePreset::RefreshOutOfRange,
            cell_size_px: 60,
            input_element_id: "input".to_string(),
            results_element_id: "results".to_string(),
            notices_element_id: "notices".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Applies overrides from a URL query string such as
    /// `?interval=500&scale=fixed`. Unknown keys are ignored and invalid
    /// values keep the current setting.
    pub fn with_query(mut self, query: &str) -> Self {
        let query = query.trim_start_matches('?');

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if !self.apply_override(&key, &value) {
                log::warn!("Ignoring invalid value for '{}': {}", key, value);
            }
        }
        self
    }

    /// Returns false when `value` is not acceptable for a known `key`.
    fn apply_override(&mut self, key: &str, value: &str) -> bool {
        match key {
            "endpoint" => {
                if value.is_empty() {
                    return false;
                }
                self.endpoint = value.to_string();
            }
            "interval" => match value.parse::<u32>() {
                Ok(ms) => self.poll_interval_ms = ms.clamp(MIN_POLL_INTERVAL_MS, MAX_TIMER_MS),
                Err(_) => return false,
            },
            "timeout" => match value.parse::<u32>() {
                Ok(ms) if ms > 0 => self.request_timeout_ms = ms.min(MAX_TIMER_MS),
                _ => return false,
            },
            "scale" => match ColorScale::parse(value) {
                Some(scale) => self.color_scale = scale,
                None => return false,
            },
            "cycle" => match CyclePreset::parse(value) {
                Some(preset) => self.cycle = preset,
                None => return false,
            },
            "cell" => match value.parse::<u32>() {
                Ok(px) if px > 0 => self.cell_size_px = px,
                _ => return false,
            },
            _ => log::debug!("Unknown query parameter: {}", key),
        }
        true
    }
}
