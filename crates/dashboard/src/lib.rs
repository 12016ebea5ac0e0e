//! Browser dashboard for the thermal grid server
//!
//! Polls `/state` once per second and renders the input grid and every
//! named result grid as color-coded tables. Clicking an input cell cycles
//! its classification and posts the change back to the server.

use wasm_bindgen::prelude::*;

pub mod cache;
pub mod cell;
pub mod click;
pub mod color;
pub mod config;
pub mod cycle;
pub mod dashboard;
pub mod dialog;
pub mod error;
pub mod fetch;
pub mod table;
pub mod timer;

pub use config::DashboardConfig;
pub use dashboard::{Dashboard, PollPhase};
pub use error::{DashboardError, DashboardResult};

fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            // already initialized when the module is loaded twice
            let _ = console_log::init_with_level(log::Level::Info);
        });
    }
}

/// Reads the configuration from the page URL and starts polling.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    init_logging();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
    let query = window.location().search().unwrap_or_default();
    let config = DashboardConfig::default().with_query(&query);
    log::debug!("Dashboard config: {:?}", config);

    let dashboard = Dashboard::new(config)?;
    wasm_bindgen_futures::spawn_local(dashboard.run());
    Ok(())
}
