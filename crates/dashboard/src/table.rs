//! DOM tables for the input grid and the result grids
//!
//! A table is built once for the lifetime of the page. Every tick only
//! rewrites cell text and styles in place.

use therm_shared::{Grid, PointType, ResultOutcome, ResultSet};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::cell::{build_frame, Frame, PLACEHOLDER_TEXT};
use crate::color::ColorScale;
use crate::error::{DashboardError, DashboardResult};

pub const ERROR_CLASS: &str = "error";

/// Callback run for every cell while the table is built
pub type CellHook<'a> = &'a mut dyn FnMut(usize, usize, &HtmlElement) -> DashboardResult<()>;

/// Text of the banner shown in place of a failed result
pub fn error_banner_text(code: u32, message: &str) -> String {
    format!("{} ({})", message, code)
}

pub struct GridTable {
    title: String,
    /// Owning `div`; error banners are appended here
    container: Element,
    cells: Vec<Vec<HtmlElement>>,
    banner: Option<Element>,
}

impl GridTable {
    /// Builds the table and appends it to `parent`. Nothing is appended if
    /// the build fails.
    pub fn build(
        document: &Document,
        parent: &Element,
        title: &str,
        width: u16,
        height: u16,
        cell_size_px: u32,
        on_cell: Option<CellHook<'_>>,
    ) -> DashboardResult<Self> {
        let table = Self::build_detached(document, title, width, height, cell_size_px, on_cell)?;
        table.mount(parent)?;
        Ok(table)
    }

    /// Builds `<div class="grid"><table><caption/><tbody/></table></div>`
    /// with `height` rows of `width` placeholder cells, outside the page.
    pub fn build_detached(
        document: &Document,
        title: &str,
        width: u16,
        height: u16,
        cell_size_px: u32,
        mut on_cell: Option<CellHook<'_>>,
    ) -> DashboardResult<Self> {
        let container = document.create_element("div")?;
        container.set_class_name("grid");

        let table = document.create_element("table")?;
        container.append_child(&table)?;

        let caption = document.create_element("caption")?;
        caption.set_text_content(Some(title));
        table.append_child(&caption)?;

        let body = document.create_element("tbody")?;
        table.append_child(&body)?;

        let size = format!("{}px", cell_size_px);
        let mut cells = Vec::with_capacity(height as usize);
        for row in 0..height as usize {
            let row_elem = document.create_element("tr")?;
            let mut row_cells = Vec::with_capacity(width as usize);

            for col in 0..width as usize {
                let cell: HtmlElement = document
                    .create_element("td")?
                    .dyn_into()
                    .map_err(|_| DashboardError::dom("td is not an HtmlElement"))?;
                let style = cell.style();
                style.set_property("color", "white")?;
                style.set_property("width", &size)?;
                style.set_property("height", &size)?;
                style.set_property("background-color", "black")?;
                cell.set_text_content(Some(PLACEHOLDER_TEXT));

                if let Some(hook) = on_cell.as_mut() {
                    hook(row, col, &cell)?;
                }
                row_elem.append_child(&cell)?;
                row_cells.push(cell);
            }

            body.append_child(&row_elem)?;
            cells.push(row_cells);
        }

        log::debug!("Built table '{}' ({}x{})", title, width, height);
        Ok(Self {
            title: title.to_string(),
            container,
            cells,
            banner: None,
        })
    }

    pub fn mount(&self, parent: &Element) -> DashboardResult<()> {
        parent.append_child(&self.container)?;
        Ok(())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&HtmlElement> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    /// Copies a computed frame onto the cells.
    pub fn apply_frame(&self, frame: &Frame) -> DashboardResult<()> {
        for (row_cells, row_frame) in self.cells.iter().zip(frame) {
            for (cell, look) in row_cells.iter().zip(row_frame) {
                // drops the previous text node
                cell.set_text_content(None);

                let style = cell.style();
                style.set_property("font-weight", look.font_weight)?;
                style.set_property("font-size", look.font_size)?;
                style.set_property("opacity", look.opacity)?;
                if let Some(background) = &look.background {
                    style.set_property("background-color", background)?;
                }
                if let Some(text) = &look.text {
                    cell.set_text_content(Some(text));
                }
            }
        }
        Ok(())
    }

    /// Renders `temps` classified by `types`.
    pub fn render_grid(
        &mut self,
        temps: &Grid<f32>,
        types: &Grid<PointType>,
        scale: ColorScale,
    ) -> DashboardResult<()> {
        self.clear_error();
        self.apply_frame(&build_frame(temps, types, scale))
    }

    /// Renders one result set: its grid on success, a banner otherwise.
    /// Cells keep their previous content while a banner is shown.
    pub fn render_result(
        &mut self,
        result: &ResultSet,
        types: &Grid<PointType>,
        width: u16,
        height: u16,
        scale: ColorScale,
    ) -> DashboardResult<()> {
        match result.outcome(width, height) {
            ResultOutcome::Ready(temps) => self.render_grid(temps, types, scale),
            ResultOutcome::Failed { code, message } => {
                self.show_error(&error_banner_text(code, message))
            }
            ResultOutcome::Malformed(e) => {
                log::warn!("Result '{}' is malformed: {}", result.name, e);
                self.show_error(&error_banner_text(result.error_code, &e.to_string()))
            }
        }
    }

    pub fn show_error(&mut self, text: &str) -> DashboardResult<()> {
        self.clear_error();
        log::debug!("Table '{}' shows error: {}", self.title, text);

        let document = self
            .container
            .owner_document()
            .ok_or_else(|| DashboardError::dom("table is detached from a document"))?;
        let banner = document.create_element("div")?;
        banner.set_class_name(ERROR_CLASS);
        banner.set_text_content(Some(text));
        self.container.append_child(&banner)?;
        self.banner = Some(banner);
        Ok(())
    }

    pub fn clear_error(&mut self) {
        if let Some(banner) = self.banner.take() {
            banner.remove();
        }
    }

    pub fn error_text(&self) -> Option<String> {
        self.banner.as_ref().and_then(|b| b.text_content())
    }
}
