use js_sys::Promise;
use wasm_bindgen_futures::JsFuture;

use crate::error::{DashboardError, DashboardResult};

/// Resolves after `ms` milliseconds using `window.setTimeout`.
pub async fn sleep(ms: u32) -> DashboardResult<()> {
    let window = web_sys::window().ok_or_else(|| DashboardError::dom("no window object"))?;

    let mut armed = Ok(0);
    let promise = Promise::new(&mut |resolve, _| {
        armed = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            &resolve,
            i32::try_from(ms).unwrap_or(i32::MAX),
        );
    });
    armed?;

    JsFuture::from(promise).await?;
    Ok(())
}
