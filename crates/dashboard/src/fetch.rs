use js_sys::{Array, Promise};
use therm_shared::{PointUpdate, ServerState};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, Response};

use crate::error::{DashboardError, DashboardResult};

const TIMEOUT_MARKER: &str = "therm-request-timeout";

/// `/state` client using the browser's fetch API
pub struct StateClient {
    url: String,
    timeout_ms: u32,
}

impl StateClient {
    pub fn new(url: impl Into<String>, timeout_ms: u32) -> Self {
        Self {
            url: url.into(),
            timeout_ms,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `GET /state`, parsed and checked for a consistent layout. Result
    /// contents are checked individually when rendered.
    pub async fn fetch_state(&self) -> DashboardResult<ServerState> {
        let opts = RequestInit::new();
        opts.set_method("GET");

        let headers = Headers::new()?;
        headers.set("Accept", "application/json")?;
        opts.set_headers(&headers);

        let resp = self.send(&opts).await?;
        let text = JsFuture::from(resp.text()?).await?;
        let text = text
            .as_string()
            .ok_or_else(|| DashboardError::dom("response body is not text"))?;

        let state: ServerState = serde_json::from_str(&text)?;
        state.validate_layout()?;
        Ok(state)
    }

    /// `POST /state` with a single point update. The response body is not
    /// read, only its status.
    pub async fn post_update(&self, update: &PointUpdate) -> DashboardResult<()> {
        let body = serde_json::to_string(update)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_body(&JsValue::from_str(&body));

        let headers = Headers::new()?;
        headers.set("Content-Type", "application/json")?;
        opts.set_headers(&headers);

        self.send(&opts).await?;
        log::debug!(
            "Posted update ({}, {}) -> {} {:.2}",
            update.x,
            update.y,
            update.point_type,
            update.temp
        );
        Ok(())
    }

    /// Runs the request, racing it against a timer that aborts it.
    async fn send(&self, opts: &RequestInit) -> DashboardResult<Response> {
        let window = web_sys::window().ok_or_else(|| DashboardError::dom("no window object"))?;

        let abort_controller = AbortController::new()?;
        opts.set_signal(Some(&abort_controller.signal()));
        let request = Request::new_with_str_and_init(&self.url, opts)?;

        let timeout_ms = self.timeout_ms;
        let mut timer_id = None;
        // Kept alive until the race settles, then dropped with the timer cleared
        let mut on_timeout: Option<Closure<dyn FnMut()>> = None;
        let timeout_promise = Promise::new(&mut |_, reject| {
            let controller = abort_controller.clone();
            let callback: Closure<dyn FnMut()> = Closure::once(move || {
                controller.abort();
                let _ = reject.call1(&JsValue::null(), &JsValue::from_str(TIMEOUT_MARKER));
            });

            match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                i32::try_from(timeout_ms).unwrap_or(i32::MAX),
            ) {
                Ok(id) => timer_id = Some(id),
                Err(e) => log::warn!("Failed to arm request timeout: {:?}", e),
            }
            on_timeout = Some(callback);
        });

        let fetch_promise = window.fetch_with_request(&request);
        let raced = Promise::race(&Array::of2(&fetch_promise, &timeout_promise));
        let outcome = JsFuture::from(raced).await;

        if let Some(id) = timer_id {
            window.clear_timeout_with_handle(id);
        }
        drop(on_timeout);

        let resp_value = outcome.map_err(|e| self.classify_failure(e))?;
        let resp: Response = resp_value.dyn_into()?;

        if !resp.ok() {
            return Err(DashboardError::Http {
                url: self.url.clone(),
                status: resp.status(),
            });
        }
        Ok(resp)
    }

    fn classify_failure(&self, err: JsValue) -> DashboardError {
        if err.as_string().as_deref() == Some(TIMEOUT_MARKER) {
            return DashboardError::Timeout {
                url: self.url.clone(),
                timeout_ms: self.timeout_ms,
            };
        }

        let message = err
            .dyn_ref::<js_sys::Error>()
            .map(|e| String::from(e.message()))
            .or_else(|| err.as_string())
            .unwrap_or_else(|| format!("{err:?}"));
        DashboardError::Fetch {
            url: self.url.clone(),
            message,
        }
    }
}
