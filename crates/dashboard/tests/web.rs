//! DOM rendering tests
//! Run with: wasm-pack test --headless --firefox crates/dashboard
#![cfg(target_arch = "wasm32")]

use therm_dashboard::color::ColorScale;
use therm_dashboard::dialog::{NoticeSource, Notices};
use therm_dashboard::table::GridTable;
use therm_dashboard::{Dashboard, DashboardConfig, DashboardError, DashboardResult, PollPhase};
use therm_shared::{GridInfo, PointType, ResultSet, ServerState};
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn fresh_host(id: &str) -> Element {
    let document = document();
    if let Some(old) = document.get_element_by_id(id) {
        old.remove();
    }
    let host = document.create_element("div").unwrap();
    host.set_id(id);
    document.body().unwrap().append_child(&host).unwrap();
    host
}

fn style(cell: &HtmlElement, property: &str) -> String {
    cell.style().get_property_value(property).unwrap()
}

fn sample_state() -> ServerState {
    ServerState {
        width: 2,
        height: 2,
        info: GridInfo {
            temp: vec![vec![20.0, 25.0], vec![18.0, 30.0]],
            types: vec![
                vec![PointType::Boundary, PointType::GroundTruth],
                vec![PointType::GroundTruth, PointType::OutOfRange],
            ],
        },
        results: vec![
            ResultSet::ready("SOR", vec![vec![21.0, 22.0], vec![23.0, 24.0]]),
            ResultSet::failed("A", 7, "timeout"),
        ],
    }
}

#[wasm_bindgen_test]
fn test_table_starts_with_placeholders() {
    let host = fresh_host("table-placeholders");
    let mut visited = Vec::new();
    let mut hook = |row: usize, col: usize, _: &HtmlElement| -> DashboardResult<()> {
        visited.push((row, col));
        Ok(())
    };
    let table = GridTable::build(&document(), &host, "Input", 3, 2, 60, Some(&mut hook)).unwrap();

    assert_eq!(visited.len(), 6);
    assert_eq!(visited[4], (1, 1));
    let cell = table.cell(1, 2).unwrap();
    assert_eq!(cell.text_content().as_deref(), Some("0.00"));
    assert_eq!(style(cell, "width"), "60px");
    assert!(table.cell(2, 0).is_none());
    let caption = host.query_selector("caption").unwrap().unwrap();
    assert_eq!(caption.text_content().as_deref(), Some("Input"));
}

#[wasm_bindgen_test]
fn test_render_is_idempotent() {
    let host = fresh_host("table-idempotent");
    let state = sample_state();
    let mut table = GridTable::build(&document(), &host, "Input", 2, 2, 60, None).unwrap();

    table
        .render_grid(&state.info.temp, &state.info.types, ColorScale::Fixed)
        .unwrap();
    let first = host.inner_html();
    table
        .render_grid(&state.info.temp, &state.info.types, ColorScale::Fixed)
        .unwrap();
    assert_eq!(host.inner_html(), first);

    let boundary = table.cell(0, 0).unwrap();
    assert_eq!(boundary.text_content().as_deref(), Some("20.00"));
    assert_eq!(style(boundary, "font-size"), "18px");

    let hidden = table.cell(1, 1).unwrap();
    assert_eq!(style(hidden, "opacity"), "0");
    assert_eq!(hidden.text_content().as_deref(), Some(""));
}

#[wasm_bindgen_test]
fn test_error_banner_replaces_refresh() {
    let host = fresh_host("table-error");
    let state = sample_state();
    let mut table = GridTable::build(&document(), &host, "A", 2, 2, 60, None).unwrap();

    table
        .render_result(&state.results[1], &state.info.types, 2, 2, ColorScale::Observed)
        .unwrap();
    assert_eq!(table.error_text().as_deref(), Some("timeout (7)"));
    assert_eq!(table.cell(0, 0).unwrap().text_content().as_deref(), Some("0.00"));

    // error persists across ticks as a single banner
    table
        .render_result(&state.results[1], &state.info.types, 2, 2, ColorScale::Observed)
        .unwrap();
    assert_eq!(host.query_selector_all(".error").unwrap().length(), 1);

    let recovered = ResultSet::ready("A", vec![vec![19.0, 19.5], vec![20.0, 20.5]]);
    table
        .render_result(&recovered, &state.info.types, 2, 2, ColorScale::Observed)
        .unwrap();
    assert!(table.error_text().is_none());
    assert_eq!(host.query_selector_all(".error").unwrap().length(), 0);
    assert_eq!(table.cell(0, 1).unwrap().text_content().as_deref(), Some("19.50"));
}

#[wasm_bindgen_test]
fn test_notices_hold_one_message_per_source() {
    let host = fresh_host("notices-test");
    let notices = Notices::new(document(), host.clone());

    notices.show(NoticeSource::Poll, "Request to /state failed: offline");
    notices.show(NoticeSource::Poll, "Request to /state timed out after 5000 ms");
    assert_eq!(host.child_element_count(), 1);
    assert!(notices.text(NoticeSource::Poll).unwrap().contains("timed out"));

    notices.show(NoticeSource::Click, "'abc' is not a temperature");
    assert_eq!(host.child_element_count(), 2);

    notices.clear(NoticeSource::Poll);
    assert_eq!(host.child_element_count(), 1);
    assert!(notices.text(NoticeSource::Poll).is_none());
    assert_eq!(
        notices.text(NoticeSource::Click).as_deref(),
        Some("'abc' is not a temperature")
    );
}

#[wasm_bindgen_test]
fn test_failed_build_leaves_parent_empty() {
    let host = fresh_host("table-failed-build");
    let mut failing = |row: usize, _: usize, _: &HtmlElement| -> DashboardResult<()> {
        if row == 1 {
            return Err(DashboardError::dom("listener refused"));
        }
        Ok(())
    };
    let built = GridTable::build(&document(), &host, "Input", 2, 2, 60, Some(&mut failing));
    assert!(built.is_err());
    assert_eq!(host.child_element_count(), 0);

    let table = GridTable::build_detached(&document(), "Input", 2, 2, 60, None).unwrap();
    assert_eq!(host.child_element_count(), 0);
    table.mount(&host).unwrap();
    assert_eq!(host.query_selector_all("table").unwrap().length(), 1);
}

#[wasm_bindgen_test]
fn test_dashboard_applies_state() {
    fresh_host("input");
    let results_host = fresh_host("results");
    fresh_host("notices");

    let mut dashboard = Dashboard::new(DashboardConfig::default()).unwrap();
    assert_eq!(dashboard.phase(), PollPhase::Loading);

    let mut state = sample_state();
    dashboard.apply(&state).unwrap();
    assert_eq!(dashboard.result_error("A").as_deref(), Some("timeout (7)"));
    assert!(dashboard.result_error("SOR").is_none());
    assert_eq!(results_host.query_selector_all("table").unwrap().length(), 2);

    // a result name seen for the first time gets its own table
    state
        .results
        .push(ResultSet::ready("MonteCarlo", vec![vec![1.0; 2]; 2]));
    dashboard.apply(&state).unwrap();
    assert_eq!(results_host.query_selector_all("table").unwrap().length(), 3);

    state.width = 3;
    assert!(dashboard.apply(&state).is_err());
}

#[wasm_bindgen_test]
fn test_duplicate_result_names_are_rejected() {
    let input_host = fresh_host("input");
    let results_host = fresh_host("results");
    fresh_host("notices");

    let mut dashboard = Dashboard::new(DashboardConfig::default()).unwrap();
    let mut state = sample_state();
    state.results.push(ResultSet::ready("A", vec![vec![0.5; 2]; 2]));

    assert!(matches!(
        dashboard.apply(&state),
        Err(DashboardError::InvalidState(_))
    ));
    assert_eq!(input_host.child_element_count(), 0);
    assert_eq!(results_host.child_element_count(), 0);

    // once the server fixes the names, the tables appear exactly once
    state.results.pop();
    dashboard.apply(&state).unwrap();
    assert_eq!(input_host.query_selector_all("table").unwrap().length(), 1);
    assert_eq!(results_host.query_selector_all("table").unwrap().length(), 2);
}

#[wasm_bindgen_test]
async fn test_click_notice_survives_successful_poll() {
    fresh_host("input");
    fresh_host("results");
    fresh_host("notices");

    let body = serde_json::to_string(&sample_state()).unwrap();
    let endpoint = format!(
        "data:application/json,{}",
        String::from(js_sys::encode_uri_component(&body))
    );
    let config = DashboardConfig {
        endpoint,
        ..DashboardConfig::default()
    };
    let mut dashboard = Dashboard::new(config).unwrap();

    dashboard
        .notices()
        .show(NoticeSource::Click, "Server answered 500 for /state");
    dashboard
        .notices()
        .show(NoticeSource::Poll, "Request to /state failed: offline");

    assert!(dashboard.tick().await);
    assert!(dashboard.notices().text(NoticeSource::Poll).is_none());
    assert_eq!(
        dashboard.notices().text(NoticeSource::Click).as_deref(),
        Some("Server answered 500 for /state")
    );
}
