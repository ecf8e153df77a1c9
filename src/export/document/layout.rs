//! Page layout for the document renderer.
//!
//! Both layout strategies place content with a [`PageCursor`], which owns the
//! pagination rule: an element is only placed once the cursor has confirmed it
//! fits above the bottom margin, otherwise a new page is started first. No line
//! is ever clipped at the bottom of a page.

use crate::config::{
    A4_HEIGHT_PT, A4_WIDTH_PT, BODY_FONT_SIZE, CELL_PADDING_PT, LINE_HEIGHT_FACTOR,
    META_FONT_SIZE, MIN_COLUMN_WIDTH_PT, PAGE_MARGIN_PT, PLAIN_TEXT_SEPARATOR, TITLE_FONT_SIZE,
};
use crate::error_handling::LayoutError;
use crate::export::heading::{ReportHeading, FILTERS_LABEL};
use crate::export::pipeline::FormattedTable;
use crate::export::types::Orientation;

use super::pdf::text_width;

/// Physical page and font metrics, in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
    /// Margin on every side
    pub margin: f32,
    /// Title font size
    pub title_size: f32,
    /// Subtitle / metadata font size
    pub meta_size: f32,
    /// Table body font size
    pub body_size: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: A4_WIDTH_PT,
            height: A4_HEIGHT_PT,
            margin: PAGE_MARGIN_PT,
            title_size: TITLE_FONT_SIZE,
            meta_size: META_FONT_SIZE,
            body_size: BODY_FONT_SIZE,
        }
    }
}

impl PageGeometry {
    /// Returns this geometry turned to `orientation`.
    ///
    /// Portrait keeps the short side horizontal, landscape the long side.
    pub fn oriented(&self, orientation: Orientation) -> Self {
        let (short, long) = if self.width <= self.height {
            (self.width, self.height)
        } else {
            (self.height, self.width)
        };
        let (width, height) = match orientation {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        };
        Self {
            width,
            height,
            ..*self
        }
    }

    /// Width between the left and right margins.
    pub fn usable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Height between the top and bottom margins.
    pub fn usable_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }

    /// Distance from the top edge to the bottom margin.
    pub fn bottom(&self) -> f32 {
        self.height - self.margin
    }

    /// Vertical advance of a line set in `size`.
    pub fn line_height(&self, size: f32) -> f32 {
        size * LINE_HEIGHT_FACTOR
    }
}

/// A drawing operation. `y` coordinates are measured from the top edge.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text with its baseline at `y`
    #[allow(missing_docs)]
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        text: String,
    },
    /// Filled grey rectangle whose top edge is at `y`
    #[allow(missing_docs)]
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        gray: f32,
    },
    /// Thin horizontal rule at `y`
    #[allow(missing_docs)]
    Rule { x1: f32, x2: f32, y: f32 },
}

/// One laid-out page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Operations in paint order
    pub ops: Vec<DrawOp>,
}

/// The laid-out document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    /// Geometry every page uses
    pub geometry: PageGeometry,
    /// Pages in order; never empty
    pub pages: Vec<Page>,
}

/// Vertical cursor plus the pages written so far.
pub struct PageCursor {
    geometry: PageGeometry,
    pages: Vec<Page>,
    y: f32,
}

impl PageCursor {
    /// Starts a document with one empty page.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::default()],
            y: geometry.margin,
        }
    }

    /// Makes sure a block of `height` fits on the current page, starting a new
    /// page when it does not. Returns `true` if a page break happened.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::NoUsableArea` when the block could not fit even on
    /// an empty page.
    pub fn reserve(&mut self, height: f32) -> Result<bool, LayoutError> {
        if height > self.geometry.usable_height() {
            return Err(LayoutError::NoUsableArea {
                usable: self.geometry.usable_height(),
                line: height,
            });
        }
        if self.y + height > self.geometry.bottom() {
            self.pages.push(Page::default());
            self.y = self.geometry.margin;
            return Ok(true);
        }
        Ok(false)
    }

    /// Writes one line of text at the left margin and advances past it.
    pub fn text_line(&mut self, text: &str, size: f32, bold: bool) -> Result<(), LayoutError> {
        let height = self.geometry.line_height(size);
        self.reserve(height)?;
        let baseline = self.y + size;
        let x = self.geometry.margin;
        self.push(DrawOp::Text {
            x,
            y: baseline,
            size,
            bold,
            text: text.to_string(),
        });
        self.y += height;
        Ok(())
    }

    /// Writes `text` as one or more lines, breaking it at the usable width.
    pub fn wrapped_line(&mut self, text: &str, size: f32, bold: bool) -> Result<(), LayoutError> {
        for piece in wrap_to_width(text, self.geometry.usable_width(), size, bold) {
            self.text_line(&piece, size, bold)?;
        }
        Ok(())
    }

    /// Adds vertical space. Space at the end of a page is simply dropped.
    pub fn gap(&mut self, height: f32) {
        self.y = (self.y + height).min(self.geometry.bottom());
    }

    /// Current distance from the top edge.
    pub fn y(&self) -> f32 {
        self.y
    }

    fn advance(&mut self, height: f32) {
        self.y += height;
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Finishes the document.
    pub fn finish(self) -> DocumentLayout {
        DocumentLayout {
            geometry: self.geometry,
            pages: self.pages,
        }
    }
}

/// Writes the title block: title, subtitle, generation time and filters.
///
/// Lines wider than the page continue on the next line.
pub fn layout_heading(cursor: &mut PageCursor, heading: &ReportHeading) -> Result<(), LayoutError> {
    let geometry = cursor.geometry;
    cursor.wrapped_line(&heading.title, geometry.title_size, true)?;
    if let Some(subtitle) = &heading.subtitle {
        cursor.wrapped_line(subtitle, geometry.meta_size, false)?;
    }
    if let Some(generated) = &heading.generated {
        cursor.wrapped_line(generated, geometry.meta_size, false)?;
    }
    if !heading.filters.is_empty() {
        cursor.wrapped_line(FILTERS_LABEL, geometry.meta_size, true)?;
        for line in &heading.filters {
            cursor.wrapped_line(line, geometry.meta_size, false)?;
        }
    }
    cursor.gap(geometry.meta_size);
    Ok(())
}

/// Structured strategy: a grid table with a shaded header row that repeats on
/// every page and cells truncated to their column.
///
/// # Errors
///
/// Fails when the columns cannot fit across the page or a row cannot fit on a page.
pub fn layout_structured(
    geometry: PageGeometry,
    heading: &ReportHeading,
    table: &FormattedTable,
) -> Result<DocumentLayout, LayoutError> {
    let widths = column_widths(&table.widths, geometry.usable_width())?;
    let mut cursor = PageCursor::new(geometry);
    layout_heading(&mut cursor, heading)?;

    let row_height = geometry.line_height(geometry.body_size);
    cursor.reserve(row_height * 2.0)?;
    table_row(&mut cursor, &widths, &table.headers, true);

    for row in &table.rows {
        if cursor.reserve(row_height)? {
            // header row repeats at the top of each new page
            cursor.reserve(row_height * 2.0)?;
            table_row(&mut cursor, &widths, &table.headers, true);
        }
        table_row(&mut cursor, &widths, row, false);
    }

    Ok(cursor.finish())
}

fn table_row(cursor: &mut PageCursor, widths: &[f32], cells: &[String], header: bool) {
    let geometry = cursor.geometry;
    let size = geometry.body_size;
    let height = geometry.line_height(size);
    let top = cursor.y();
    let left = geometry.margin;
    let right = left + widths.iter().sum::<f32>();

    if header {
        cursor.push(DrawOp::FillRect {
            x: left,
            y: top,
            width: right - left,
            height,
            gray: 0.85,
        });
    }

    let mut x = left;
    for (cell, width) in cells.iter().zip(widths) {
        let fitted = truncate_to_width(cell, width - 2.0 * CELL_PADDING_PT, size, header);
        cursor.push(DrawOp::Text {
            x: x + CELL_PADDING_PT,
            y: top + (height + size) / 2.0 - size * 0.15,
            size,
            bold: header,
            text: fitted,
        });
        x += width;
    }

    cursor.push(DrawOp::Rule {
        x1: left,
        x2: right,
        y: top + height,
    });
    cursor.advance(height);
}

/// Plain-text strategy: header and rows joined with `" | "`, one line each.
///
/// Lines longer than the usable width continue on the next line, so every
/// character of every cell is present in the output.
///
/// # Errors
///
/// Fails only when the page cannot hold a single line of text.
pub fn layout_plain(
    geometry: PageGeometry,
    heading: &ReportHeading,
    table: &FormattedTable,
) -> Result<DocumentLayout, LayoutError> {
    let mut cursor = PageCursor::new(geometry);
    layout_heading(&mut cursor, heading)?;

    let size = geometry.body_size;
    cursor.wrapped_line(&table.headers.join(PLAIN_TEXT_SEPARATOR), size, true)?;
    for row in &table.rows {
        cursor.wrapped_line(&row.join(PLAIN_TEXT_SEPARATOR), size, false)?;
    }

    Ok(cursor.finish())
}

/// Splits the usable width between columns.
///
/// Hinted columns take their hint as a relative weight; unhinted columns share
/// what is left evenly. The result always sums to `available` and no column is
/// narrower than the minimum column width.
///
/// # Errors
///
/// Returns `LayoutError::ColumnsDoNotFit` when even minimum-width columns
/// would overflow the page.
pub fn column_widths(hints: &[Option<u32>], available: f32) -> Result<Vec<f32>, LayoutError> {
    let count = hints.len();
    let required = count as f32 * MIN_COLUMN_WIDTH_PT;
    if count == 0 || required > available {
        return Err(LayoutError::ColumnsDoNotFit {
            columns: count,
            required,
            available,
        });
    }

    let hinted_total: f32 = hints.iter().flatten().map(|w| *w as f32).sum();
    let unhinted = hints.iter().filter(|h| h.is_none()).count();

    let mut widths: Vec<f32> = if unhinted == 0 {
        let scale = available / hinted_total;
        hints
            .iter()
            .map(|h| h.unwrap_or_default() as f32 * scale)
            .collect()
    } else {
        let reserved_for_unhinted = unhinted as f32 * MIN_COLUMN_WIDTH_PT;
        let scale = if hinted_total > available - reserved_for_unhinted {
            (available - reserved_for_unhinted) / hinted_total
        } else {
            1.0
        };
        let even = (available - hinted_total * scale) / unhinted as f32;
        hints
            .iter()
            .map(|h| match h {
                Some(w) => *w as f32 * scale,
                None => even,
            })
            .collect()
    };

    // lift narrow columns to the minimum and take the difference from the rest
    let narrow = widths.iter().filter(|w| **w < MIN_COLUMN_WIDTH_PT).count();
    if narrow > 0 {
        let wide_total: f32 = widths.iter().filter(|w| **w >= MIN_COLUMN_WIDTH_PT).sum();
        let scale = (available - narrow as f32 * MIN_COLUMN_WIDTH_PT) / wide_total;
        for w in widths.iter_mut() {
            *w = if *w < MIN_COLUMN_WIDTH_PT {
                MIN_COLUMN_WIDTH_PT
            } else {
                *w * scale
            };
        }
    }

    Ok(widths)
}

/// Shortens `text` with a trailing ellipsis so it fits in `max_width`.
pub fn truncate_to_width(text: &str, max_width: f32, size: f32, bold: bool) -> String {
    if text_width(text, size, bold) <= max_width {
        return text.to_string();
    }
    let ellipsis = "...";
    let budget = max_width - text_width(ellipsis, size, bold);
    let mut out = String::new();
    let mut used = 0.0;
    for c in text.chars() {
        let w = text_width(c.encode_utf8(&mut [0u8; 4]), size, bold);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ellipsis);
    out
}

/// Breaks `text` into pieces that each fit in `max_width`.
///
/// Pieces concatenate back to the original text.
pub fn wrap_to_width(text: &str, max_width: f32, size: f32, bold: bool) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut used = 0.0;
    for c in text.chars() {
        let w = text_width(c.encode_utf8(&mut [0u8; 4]), size, bold);
        if used + w > max_width && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            used = 0.0;
        }
        used += w;
        current.push(c);
    }
    if !current.is_empty() || pieces.is_empty() {
        pieces.push(current);
    }
    pieces
}
