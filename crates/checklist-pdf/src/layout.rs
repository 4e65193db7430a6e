//! Page Layout Engine
//!
//! A cursor-driven flow layout over fixed page geometry. Each operation
//! measures its content first, breaks to a new page when the content would
//! cross the bottom margin, draws, then advances the cursor by exactly the
//! measured height. Output depends only on the input stream, the geometry and
//! the text measure, so identical inputs give an identical cursor trace.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cursor::LayoutCursor;
use crate::display::{Align, Page, Painter};
use crate::geometry::PageGeometry;
use crate::metrics::{Font, TextMeasure};
use crate::wrap::wrap_text;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    pub title: f32,
    pub section_header: f32,
    pub field_label: f32,
    pub field_value: f32,
    pub declaration: f32,
    pub table_header: f32,
    pub table_content: f32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title: 14.0,
            section_header: 11.0,
            field_label: 8.0,
            field_value: 9.0,
            declaration: 10.0,
            table_header: 9.0,
            table_content: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// Baseline-to-baseline distance of wrapped text
    pub line_height: f32,
    /// Minimum height of a two-column field row
    pub field_row_height: f32,
    /// Inner padding of table cells and field rows
    pub cell_padding: f32,
    /// Offset of the right field column from the page centre
    pub column_gap: f32,
    /// Space left below a section header rule
    pub section_spacing: f32,
    pub rule_width: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            line_height: 10.0,
            field_row_height: 12.0,
            cell_padding: 2.0,
            column_gap: 20.0,
            section_spacing: 8.0,
            rule_width: 0.5,
        }
    }
}

/// A label/value pair for two-column field rows
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub label: &'a str,
    pub value: &'a str,
}

impl<'a> Field<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self { label, value }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    /// Header text; `\n` starts another header line
    pub header: String,
    pub width: f32,
    pub align: Align,
    /// Decimal places of the running total, for summed columns
    pub total: Option<usize>,
}

impl Column {
    pub fn new(header: &str, width: f32) -> Self {
        Self {
            header: header.to_string(),
            width,
            align: Align::Left,
            total: None,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Sum this column into the synthetic total row
    pub fn summed(mut self, decimals: usize) -> Self {
        self.total = Some(decimals);
        self
    }
}

/// One body row: the printed cells plus the unrounded amounts behind them
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    pub cells: Vec<String>,
    /// Per-column amount that feeds the total row instead of the cell text
    pub amounts: Vec<Option<f64>>,
}

impl TableRow {
    fn amount(&self, column: usize) -> f64 {
        match self.amounts.get(column).copied().flatten() {
            Some(amount) => amount,
            None => self.cells.get(column).map(|c| parse_amount(c)).unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
    /// First-cell text of the total row
    pub total_label: String,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            total_label: "Total".to_string(),
        }
    }

    /// A row whose summed columns are totalled from the cell text
    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(TableRow {
            cells: cells.into_iter().map(Into::into).collect(),
            amounts: Vec::new(),
        });
    }

    /// A row carrying exact amounts, as `(column, amount)`, for summed columns
    pub fn row_with_amounts<I, S, A>(&mut self, cells: I, amounts: A)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        A: IntoIterator<Item = (usize, f64)>,
    {
        let cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        let mut row_amounts = vec![None; cells.len().max(self.columns.len())];
        for (column, amount) in amounts {
            if let Some(slot) = row_amounts.get_mut(column) {
                *slot = Some(amount);
            }
        }
        self.rows.push(TableRow {
            cells,
            amounts: row_amounts,
        });
    }

    fn has_totals(&self) -> bool {
        self.columns.iter().any(|c| c.total.is_some())
    }
}

/// Page number and total passed to the running-header callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumber {
    pub number: usize,
    pub count: usize,
}

pub struct PageLayout<'m> {
    geometry: PageGeometry,
    fonts: FontSizes,
    metrics: LayoutMetrics,
    measure: &'m dyn TextMeasure,
    pages: Vec<Page>,
    cursor: LayoutCursor,
    trace: Vec<LayoutCursor>,
}

impl<'m> PageLayout<'m> {
    pub fn new(
        geometry: PageGeometry,
        fonts: FontSizes,
        metrics: LayoutMetrics,
        measure: &'m dyn TextMeasure,
    ) -> Self {
        let cursor = LayoutCursor::new(geometry.body_top);
        Self {
            geometry,
            fonts,
            metrics,
            measure,
            pages: vec![Page::default()],
            cursor,
            trace: vec![cursor],
        }
    }

    pub fn cursor(&self) -> LayoutCursor {
        self.cursor
    }

    /// Every cursor position the layout has passed through, in order
    pub fn trace(&self) -> &[LayoutCursor] {
        &self.trace
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn fonts(&self) -> &FontSizes {
        &self.fonts
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn wrap(&self, text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
        wrap_text(self.measure, text, font, size, max_width)
    }

    /// Start a new page unconditionally
    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor.next_page(self.geometry.body_top);
        self.trace.push(self.cursor);
        debug!(page = self.cursor.page + 1, "Started page");
    }

    /// Break to a new page when `height` does not fit; returns whether it broke
    ///
    /// A page that is still empty never breaks, so content taller than a
    /// whole page cannot loop.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        let at_top = self.cursor.y <= self.geometry.body_top;
        if at_top || self.cursor.fits(height, self.geometry.bottom_limit()) {
            return false;
        }
        self.new_page();
        true
    }

    pub fn advance(&mut self, dy: f32) {
        self.cursor.advance(dy);
        self.trace.push(self.cursor);
    }

    /// Painter for the current page
    pub fn painter(&mut self) -> Painter<'_> {
        let page = &mut self.pages[self.cursor.page];
        Painter::new(page, &self.geometry, self.measure)
    }

    /// Single line of text at the cursor, without advancing
    pub fn text_at(&mut self, x: f32, text: &str, font: Font, size: f32, align: Align) {
        let baseline = self.cursor.y + size;
        self.painter().text(x, baseline, text, font, size, align);
    }

    /// Centred bold title
    pub fn draw_title(&mut self, text: &str) {
        let size = self.fonts.title;
        let height = size + self.metrics.section_spacing;
        self.ensure_space(height);
        let x = self.geometry.center_x();
        self.text_at(x, text, Font::Bold, size, Align::Center);
        self.advance(height);
    }

    /// Bold section header with a rule below it
    ///
    /// Kept together with at least two lines of following content.
    pub fn draw_section_header(&mut self, text: &str) {
        let size = self.fonts.section_header;
        let rule_offset = size + 4.0;
        let height = rule_offset + self.metrics.section_spacing;
        self.ensure_space(height + 2.0 * self.metrics.line_height);

        let (x, y, rule_width) = (self.geometry.left(), self.cursor.y, self.metrics.rule_width);
        self.text_at(x, text, Font::Bold, size, Align::Left);
        self.painter().rule(y + rule_offset, rule_width);
        self.advance(height);
    }

    pub fn draw_rule(&mut self) {
        let (y, width) = (self.cursor.y, self.metrics.rule_width);
        self.painter().rule(y, width);
    }

    /// Label at `x`, value wrapped to `max_width - label_width` beside it
    ///
    /// Advances by the number of value lines times the line height and
    /// returns that height.
    pub fn draw_labeled_field(
        &mut self,
        label: &str,
        value: &str,
        x: f32,
        label_width: f32,
        max_width: f32,
    ) -> f32 {
        let lines = self.wrap(value, Font::Regular, self.fonts.field_value, max_width - label_width);
        let height = lines.len() as f32 * self.metrics.line_height;
        self.ensure_space(height);
        let top = self.cursor.y;
        self.paint_field(top, label, &lines, x, label_width);
        self.advance(height);
        height
    }

    /// Two fields side by side; the taller one sets the row height
    pub fn draw_field_row(&mut self, left: Option<Field<'_>>, right: Option<Field<'_>>, label_width: f32) {
        let left_x = self.geometry.left();
        let right_x = self.geometry.center_x() + self.metrics.column_gap;
        let left_width = self.geometry.center_x() - left_x;
        let right_width = self.geometry.right() - right_x;

        let left_lines = left.map(|f| self.wrap_value(f.value, left_width - label_width));
        let right_lines = right.map(|f| self.wrap_value(f.value, right_width - label_width));

        let tallest = left_lines
            .iter()
            .chain(right_lines.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(1);
        let height = self
            .metrics
            .field_row_height
            .max(tallest as f32 * self.metrics.line_height + self.metrics.cell_padding);
        self.ensure_space(height);

        let top = self.cursor.y;
        if let (Some(field), Some(lines)) = (left, left_lines.as_ref()) {
            self.paint_field(top, field.label, lines, left_x, label_width);
        }
        if let (Some(field), Some(lines)) = (right, right_lines.as_ref()) {
            self.paint_field(top, field.label, lines, right_x, label_width);
        }
        self.advance(height);
    }

    fn wrap_value(&self, value: &str, width: f32) -> Vec<String> {
        self.wrap(value, Font::Regular, self.fonts.field_value, width)
    }

    fn paint_field(&mut self, top: f32, label: &str, lines: &[String], x: f32, label_width: f32) {
        let label_size = self.fonts.field_label;
        let value_size = self.fonts.field_value;
        let line_height = self.metrics.line_height;
        let mut painter = self.painter();
        painter.text(x, top + value_size, label, Font::Bold, label_size, Align::Left);
        for (i, line) in lines.iter().enumerate() {
            let baseline = top + value_size + i as f32 * line_height;
            painter.text(x + label_width, baseline, line, Font::Regular, value_size, Align::Left);
        }
    }

    /// Header band, one row per entry, then a total row for summed columns
    ///
    /// Rows that would cross the bottom margin move to a new page, where the
    /// header band is drawn again.
    pub fn draw_table(&mut self, table: &Table) {
        let header_cells: Vec<String> = table.columns.iter().map(|c| c.header.clone()).collect();
        let header = self.wrap_row(&table.columns, &header_cells, Font::Bold, self.fonts.table_header);
        let header_height = self.row_height(&header);

        let first_height = table
            .rows
            .first()
            .map(|row| {
                let wrapped = self.wrap_row(&table.columns, &row.cells, Font::Regular, self.fonts.table_content);
                self.row_height(&wrapped)
            })
            .unwrap_or(0.0);
        self.ensure_space(header_height + first_height);
        self.paint_header(&table.columns, &header, header_height);

        let mut totals = vec![0.0_f64; table.columns.len()];
        for row in &table.rows {
            let wrapped = self.wrap_row(&table.columns, &row.cells, Font::Regular, self.fonts.table_content);
            let height = self.row_height(&wrapped);
            if !self.cursor.fits(height, self.geometry.bottom_limit()) {
                self.new_page();
                self.paint_header(&table.columns, &header, header_height);
            }
            self.paint_row(&table.columns, &wrapped, Font::Regular, self.fonts.table_content);
            self.advance(height);

            for (i, column) in table.columns.iter().enumerate() {
                if column.total.is_some() {
                    totals[i] += row.amount(i);
                }
            }
        }

        if table.has_totals() {
            let cells: Vec<String> = table
                .columns
                .iter()
                .enumerate()
                .map(|(i, column)| match column.total {
                    Some(decimals) => format_total(totals[i], decimals),
                    None if i == 0 => table.total_label.clone(),
                    None => String::new(),
                })
                .collect();
            let wrapped = self.wrap_row(&table.columns, &cells, Font::Bold, self.fonts.table_content);
            let height = self.row_height(&wrapped);
            if !self.cursor.fits(height, self.geometry.bottom_limit()) {
                self.new_page();
                self.paint_header(&table.columns, &header, header_height);
            }
            self.draw_rule();
            self.paint_row(&table.columns, &wrapped, Font::Bold, self.fonts.table_content);
            self.advance(height);
        }
        self.draw_rule();
    }

    fn wrap_row(&self, columns: &[Column], cells: &[String], font: Font, size: f32) -> Vec<Vec<String>> {
        let padding = self.metrics.cell_padding;
        columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let text = cells.get(i).map(String::as_str).unwrap_or("");
                self.wrap(text, font, size, column.width - 2.0 * padding)
            })
            .collect()
    }

    fn row_height(&self, wrapped: &[Vec<String>]) -> f32 {
        let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1);
        lines as f32 * self.metrics.line_height + 2.0 * self.metrics.cell_padding
    }

    fn paint_header(&mut self, columns: &[Column], wrapped: &[Vec<String>], height: f32) {
        let (top, rule_width) = (self.cursor.y, self.metrics.rule_width);
        {
            let mut painter = self.painter();
            painter.rule(top, rule_width);
            painter.rule(top + height, rule_width);
        }
        self.paint_row(columns, wrapped, Font::Bold, self.fonts.table_header);
        self.advance(height);
    }

    fn paint_row(&mut self, columns: &[Column], wrapped: &[Vec<String>], font: Font, size: f32) {
        let top = self.cursor.y;
        let padding = self.metrics.cell_padding;
        let line_height = self.metrics.line_height;
        let mut x = self.geometry.left();
        let mut painter = self.painter();

        for (column, lines) in columns.iter().zip(wrapped) {
            let anchor = match column.align {
                Align::Left => x + padding,
                Align::Center => x + column.width / 2.0,
                Align::Right => x + column.width - padding,
            };
            for (i, line) in lines.iter().enumerate() {
                let baseline = top + padding + size + i as f32 * line_height;
                painter.text(anchor, baseline, line, font, size, column.align);
            }
            x += column.width;
        }
    }

    /// Wrapped text across `max_width`, breaking pages between lines
    pub fn draw_paragraph(&mut self, text: &str, max_width: f32, font: Font, size: f32) {
        let line_height = self.metrics.line_height.max(size + 2.0);
        let x = self.geometry.left();
        for line in self.wrap(text, font, size, max_width) {
            self.ensure_space(line_height);
            self.text_at(x, &line, font, size, Align::Left);
            self.advance(line_height);
        }
    }

    /// Apply the running header to every page and hand the pages over
    ///
    /// The header is applied once pagination is complete so that it can
    /// print the final page count, including pages created by overflow.
    pub fn finish<F>(self, mut header: F) -> Vec<Page>
    where
        F: FnMut(&mut Painter<'_>, PageNumber),
    {
        let count = self.pages.len();
        let mut pages = self.pages;
        for (index, page) in pages.iter_mut().enumerate() {
            let mut painter = Painter::new(page, &self.geometry, self.measure);
            header(
                &mut painter,
                PageNumber {
                    number: index + 1,
                    count,
                },
            );
        }
        pages
    }
}

/// Rounded half away from zero, like the money cells, never `-0`
fn format_total(total: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (total * scale).round() / scale;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.*}", decimals, rounded)
}

fn parse_amount(cell: &str) -> f64 {
    let cleaned: String = cell.chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse().unwrap_or(0.0)
}
