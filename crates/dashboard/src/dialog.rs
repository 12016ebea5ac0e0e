//! Non-blocking replacements for `prompt()` and `alert()`

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement, KeyboardEvent};

use crate::error::{DashboardError, DashboardResult};

/// Modal dialogs rendered into the page
pub struct Dialogs {
    document: Document,
}

impl Dialogs {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Shows a modal with a number input and resolves with the typed text,
    /// or `None` if the user cancelled. The poll loop keeps running while
    /// the modal is open.
    pub async fn prompt_temperature(
        &self,
        message: &str,
        initial: f32,
    ) -> DashboardResult<Option<String>> {
        let body = self
            .document
            .body()
            .ok_or_else(|| DashboardError::dom("document has no body"))?;

        let overlay = self.document.create_element("div")?;
        overlay.set_class_name("modal-overlay");

        let dialog = self.document.create_element("div")?;
        dialog.set_class_name("modal");
        overlay.append_child(&dialog)?;

        let label = self.document.create_element("p")?;
        label.set_text_content(Some(message));
        dialog.append_child(&label)?;

        let input: HtmlInputElement = self
            .document
            .create_element("input")?
            .dyn_into()
            .map_err(|_| DashboardError::dom("input is not an HtmlInputElement"))?;
        input.set_type("number");
        input.set_attribute("step", "any")?;
        input.set_value(&format!("{:.2}", initial));
        dialog.append_child(&input)?;

        let ok_button = self.button("OK")?;
        let cancel_button = self.button("Cancel")?;
        dialog.append_child(&ok_button)?;
        dialog.append_child(&cancel_button)?;

        body.append_child(&overlay)?;
        let _ = input.focus();

        let (tx, rx) = oneshot::channel::<Option<String>>();
        let tx = Rc::new(RefCell::new(Some(tx)));
        let answer = move |value: Option<String>| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(value);
            }
        };

        let on_ok = {
            let answer = answer.clone();
            let input = input.clone();
            Closure::<dyn FnMut(Event)>::new(move |_: Event| answer(Some(input.value())))
        };
        let on_cancel = {
            let answer = answer.clone();
            Closure::<dyn FnMut(Event)>::new(move |_: Event| answer(None))
        };
        let on_key = {
            let input = input.clone();
            Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    "Enter" => answer(Some(input.value())),
                    "Escape" => answer(None),
                    _ => {}
                }
            })
        };

        ok_button.add_event_listener_with_callback("click", on_ok.as_ref().unchecked_ref())?;
        cancel_button
            .add_event_listener_with_callback("click", on_cancel.as_ref().unchecked_ref())?;
        input.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;

        // A dropped sender means the page is going away
        let value = rx.await.unwrap_or(None);

        overlay.remove();
        drop((on_ok, on_cancel, on_key));
        Ok(value)
    }

    fn button(&self, label: &str) -> DashboardResult<HtmlElement> {
        let button: HtmlElement = self
            .document
            .create_element("button")?
            .dyn_into()
            .map_err(|_| DashboardError::dom("button is not an HtmlElement"))?;
        button.set_text_content(Some(label));
        Ok(button)
    }
}

/// Where a notice came from. Each source owns one slot, so a successful
/// poll only clears what the poll loop reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeSource {
    /// Fetch and render failures of the poll loop
    Poll,
    /// Failed or rejected cell updates
    Click,
}

impl NoticeSource {
    fn class_name(self) -> &'static str {
        match self {
            NoticeSource::Poll => "notice poll",
            NoticeSource::Click => "notice click",
        }
    }
}

/// Notice area with one slot per `NoticeSource`
pub struct Notices {
    document: Document,
    host: Element,
    current: RefCell<HashMap<NoticeSource, Element>>,
}

impl Notices {
    pub fn new(document: Document, host: Element) -> Self {
        Self {
            document,
            host,
            current: RefCell::new(HashMap::new()),
        }
    }

    /// Replaces the notice of `source` with `message`.
    pub fn show(&self, source: NoticeSource, message: &str) {
        self.clear(source);

        let notice = match self.document.create_element("div") {
            Ok(notice) => notice,
            Err(e) => {
                log::error!("Failed to create notice: {:?}", e);
                return;
            }
        };
        notice.set_class_name(source.class_name());
        notice.set_text_content(Some(message));

        if let Err(e) = self.host.append_child(&notice) {
            log::error!("Failed to show notice: {:?}", e);
            return;
        }
        self.current.borrow_mut().insert(source, notice);
    }

    pub fn clear(&self, source: NoticeSource) {
        if let Some(notice) = self.current.borrow_mut().remove(&source) {
            notice.remove();
        }
    }

    pub fn text(&self, source: NoticeSource) -> Option<String> {
        self.current
            .borrow()
            .get(&source)
            .and_then(|n| n.text_content())
    }
}
