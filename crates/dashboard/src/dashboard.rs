//! Poll loop driving the dashboard
//!
//! Loading: fetch until the first state arrives, then build the tables.
//! Polling: render -> sleep -> fetch, for the lifetime of the page.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use therm_shared::ServerState;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

use crate::cache::GridCache;
use crate::click::{parse_temperature, plan_click, ClickAction};
use crate::config::DashboardConfig;
use crate::cycle::CyclePolicy;
use crate::dialog::{Dialogs, NoticeSource, Notices};
use crate::error::{DashboardError, DashboardResult};
use crate::fetch::StateClient;
use crate::table::GridTable;
use crate::timer::sleep;

pub const INPUT_TITLE: &str = "Input";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Waiting for the first state; no tables exist yet
    Loading,
    /// Tables are built and refreshed every tick
    Polling,
}

impl PollPhase {
    pub fn after_tick(self, succeeded: bool) -> Self {
        match (self, succeeded) {
            (PollPhase::Loading, true) => PollPhase::Polling,
            (PollPhase::Loading, false) => PollPhase::Loading,
            (PollPhase::Polling, _) => PollPhase::Polling,
        }
    }
}

/// Everything built from the first successful fetch
struct Session {
    width: u16,
    height: u16,
    cache: Rc<RefCell<GridCache>>,
    input: GridTable,
    results: HashMap<String, GridTable>,
    results_host: Element,
    _listeners: Vec<Closure<dyn FnMut(Event)>>,
}

/// Handles shared with click handlers
#[derive(Clone)]
struct ClickContext {
    cache: Rc<RefCell<GridCache>>,
    policy: CyclePolicy,
    client: Rc<StateClient>,
    dialogs: Rc<Dialogs>,
    notices: Rc<Notices>,
}

pub struct Dashboard {
    config: DashboardConfig,
    document: Document,
    client: Rc<StateClient>,
    dialogs: Rc<Dialogs>,
    notices: Rc<Notices>,
    phase: PollPhase,
    session: Option<Session>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> DashboardResult<Self> {
        let window = web_sys::window().ok_or_else(|| DashboardError::dom("no window object"))?;
        let document = window
            .document()
            .ok_or_else(|| DashboardError::dom("no document"))?;

        let notices_host = mount_point(&document, &config.notices_element_id)?;
        let client = StateClient::new(config.endpoint.clone(), config.request_timeout_ms);

        Ok(Self {
            notices: Rc::new(Notices::new(document.clone(), notices_host)),
            dialogs: Rc::new(Dialogs::new(document.clone())),
            client: Rc::new(client),
            document,
            config,
            phase: PollPhase::Loading,
            session: None,
        })
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    /// Runs forever. Failures are reported and the next tick retries.
    pub async fn run(mut self) {
        log::info!(
            "Polling {} every {} ms",
            self.client.url(),
            self.config.poll_interval_ms
        );

        loop {
            let succeeded = self.tick().await;
            let next = self.phase.after_tick(succeeded);
            if next != self.phase {
                log::info!("Dashboard {:?} -> {:?}", self.phase, next);
                self.phase = next;
            }

            if let Err(e) = sleep(self.config.poll_interval_ms).await {
                log::error!("Poll timer failed, stopping: {}", e);
                self.notices.show(NoticeSource::Poll, &e.to_string());
                return;
            }
        }
    }

    /// One fetch and render. Success clears only the poll loop's notice.
    pub async fn tick(&mut self) -> bool {
        let outcome = match self.client.fetch_state().await {
            Ok(state) => self.apply(&state),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                self.notices.clear(NoticeSource::Poll);
                true
            }
            Err(e) => {
                log::warn!("Tick failed: {}", e);
                self.notices.show(NoticeSource::Poll, &e.to_string());
                false
            }
        }
    }

    /// Renders a fetched state, building the tables on first use.
    pub fn apply(&mut self, state: &ServerState) -> DashboardResult<()> {
        state.validate_layout()?;
        if self.session.is_none() {
            self.session = Some(self.build_session(state)?);
        }
        let scale = self.config.color_scale;
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        if (state.width, state.height) != (session.width, session.height) {
            return Err(DashboardError::DimensionsChanged {
                expected: (session.width, session.height),
                actual: (state.width, state.height),
            });
        }

        session.cache.borrow_mut().replace(&state.info)?;
        session
            .input
            .render_grid(&state.info.temp, &state.info.types, scale)?;

        for result in &state.results {
            if !session.results.contains_key(&result.name) {
                log::info!("New result set '{}'", result.name);
                let table = GridTable::build(
                    &self.document,
                    &session.results_host,
                    &result.name,
                    session.width,
                    session.height,
                    self.config.cell_size_px,
                    None,
                )?;
                session.results.insert(result.name.clone(), table);
            }
            if let Some(table) = session.results.get_mut(&result.name) {
                table.render_result(
                    result,
                    &state.info.types,
                    session.width,
                    session.height,
                    scale,
                )?;
            }
        }
        Ok(())
    }

    /// Builds every table off-page and mounts them only once all of them
    /// exist, so a failed build leaves the page untouched.
    fn build_session(&self, state: &ServerState) -> DashboardResult<Session> {
        let (width, height) = (state.width, state.height);
        log::info!("Grid is {}x{} with {} result sets", width, height, state.results.len());

        let cache = Rc::new(RefCell::new(GridCache::new(width, height)));
        let context = ClickContext {
            cache: Rc::clone(&cache),
            policy: self.config.cycle.policy(),
            client: Rc::clone(&self.client),
            dialogs: Rc::clone(&self.dialogs),
            notices: Rc::clone(&self.notices),
        };

        let input_host = mount_point(&self.document, &self.config.input_element_id)?;
        let mut listeners = Vec::with_capacity(width as usize * height as usize);
        let mut attach = |row: usize, col: usize, cell: &HtmlElement| -> DashboardResult<()> {
            let listener = click_listener(context.clone(), row, col);
            cell.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
            listeners.push(listener);
            Ok(())
        };
        let input = GridTable::build_detached(
            &self.document,
            INPUT_TITLE,
            width,
            height,
            self.config.cell_size_px,
            Some(&mut attach),
        )?;

        let results_host = mount_point(&self.document, &self.config.results_element_id)?;
        let mut results = Vec::with_capacity(state.results.len());
        for result in &state.results {
            let table = GridTable::build_detached(
                &self.document,
                &result.name,
                width,
                height,
                self.config.cell_size_px,
                None,
            )?;
            results.push((result.name.clone(), table));
        }

        input.mount(&input_host)?;
        for (_, table) in &results {
            table.mount(&results_host)?;
        }

        Ok(Session {
            width,
            height,
            cache,
            input,
            results: results.into_iter().collect(),
            results_host,
            _listeners: listeners,
        })
    }

    /// Banner text currently shown on a result table
    pub fn result_error(&self, name: &str) -> Option<String> {
        self.session
            .as_ref()
            .and_then(|s| s.results.get(name))
            .and_then(|t| t.error_text())
    }
}

/// Element with `id`, or `<body>` when the page does not provide one.
fn mount_point(document: &Document, id: &str) -> DashboardResult<Element> {
    if let Some(elem) = document.get_element_by_id(id) {
        return Ok(elem);
    }
    log::debug!("No element #{}, mounting into <body>", id);
    document
        .body()
        .map(Element::from)
        .ok_or_else(|| DashboardError::dom("document has no body"))
}

fn click_listener(context: ClickContext, row: usize, col: usize) -> Closure<dyn FnMut(Event)> {
    Closure::<dyn FnMut(Event)>::new(move |_: Event| {
        let context = context.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = handle_click(&context, row, col).await {
                log::warn!("Update of ({}, {}) failed: {}", col, row, e);
                context.notices.show(NoticeSource::Click, &e.to_string());
            }
        });
    })
}

async fn handle_click(context: &ClickContext, row: usize, col: usize) -> DashboardResult<()> {
    // borrow released before any await
    let action = plan_click(&context.cache.borrow(), &context.policy, row, col)?;

    let update = match action {
        ClickAction::Submit(update) => update,
        ClickAction::Prompt(pending) => {
            let message = format!(
                "New temperature at ({}, {}) as {}",
                pending.x, pending.y, pending.next_type
            );
            let answer = context
                .dialogs
                .prompt_temperature(&message, pending.current_temp)
                .await?;

            let Some(answer) = answer else {
                log::debug!("Update of ({}, {}) cancelled", pending.x, pending.y);
                return Ok(());
            };
            match parse_temperature(&answer) {
                Some(temp) => pending.complete(temp),
                None => {
                    context.notices.show(
                        NoticeSource::Click,
                        &format!("'{}' is not a temperature", answer),
                    );
                    return Ok(());
                }
            }
        }
    };

    context.client.post_update(&update).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        assert_eq!(PollPhase::Loading.after_tick(false), PollPhase::Loading);
        assert_eq!(PollPhase::Loading.after_tick(true), PollPhase::Polling);
        assert_eq!(PollPhase::Polling.after_tick(false), PollPhase::Polling);
        assert_eq!(PollPhase::Polling.after_tick(true), PollPhase::Polling);
    }
}
