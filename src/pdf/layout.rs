//! Block layout: turn response text into positioned rows on pages.
//!
//! Every newline-delimited line of the input becomes one block. A block is
//! one or more rows of fixed height spanning the page width; long lines wrap
//! at the last space that fits, or mid-word when there is none. Blocks are
//! kept on one page when they fit on an empty page; only blocks taller than
//! a page are split at the automatic page break.

use super::font;
use crate::config::ExportConfig;
use crate::error::CodeDocError;

const PT_PER_MM: f32 = 72.0 / 25.4;

/// A4 portrait, in points.
pub const A4_WIDTH_PT: f32 = 595.28;
pub const A4_HEIGHT_PT: f32 = 841.89;

/// Page geometry in points, derived from [`ExportConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub break_margin: f32,
    pub row_height: f32,
    pub cell_padding: f32,
    pub font_size: f32,
}

impl PageGeometry {
    pub fn a4(export: &ExportConfig) -> Self {
        let margin = export.margin_mm * PT_PER_MM;
        Self {
            width: A4_WIDTH_PT,
            height: A4_HEIGHT_PT,
            margin,
            break_margin: export.page_break_margin_mm * PT_PER_MM,
            row_height: export.line_height_mm * PT_PER_MM,
            cell_padding: margin / 10.0,
            font_size: export.font_size,
        }
    }

    /// Usable text width of a row, in 1/1000 em of the current font size.
    fn max_units(&self) -> f32 {
        let text_width = self.width - 2.0 * self.margin - 2.0 * self.cell_padding;
        text_width * 1000.0 / self.font_size
    }

    /// Distance from the top edge where rows stop.
    fn break_at(&self) -> f32 {
        self.height - self.break_margin
    }
}

/// One row of text with its baseline origin in PDF user space.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    /// Index of the input line this row belongs to.
    pub block: usize,
    pub x: f32,
    pub y: f32,
    /// WinAnsi-encoded text.
    pub text: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub rows: Vec<PlacedRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
    pub block_count: usize,
}

/// Split text into block lines. A trailing `'\r'` on each line is dropped.
pub fn split_blocks(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Break an encoded line into rows no wider than `max_units`.
///
/// The run of spaces at a break is consumed, so no continuation row starts
/// with a space and no row is empty unless the line is. Always returns at
/// least one row; an empty line yields one empty row.
pub fn wrap_line(encoded: &[u8], max_units: f32) -> Vec<Vec<u8>> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut last_space: Option<usize> = None;
    let mut width: u32 = 0;
    let mut i = 0;

    while i < encoded.len() {
        let code = encoded[i];
        if code == b' ' {
            last_space = Some(i);
        }
        width += u32::from(font::advance(code));

        if width as f32 > max_units {
            match last_space {
                // A space at the row start is indentation, not a break point.
                Some(space) if space > start => {
                    let mut end = space;
                    while end > start && encoded[end - 1] == b' ' {
                        end -= 1;
                    }
                    rows.push(encoded[start..end].to_vec());
                    start = space + 1;
                    while start < encoded.len() && encoded[start] == b' ' {
                        start += 1;
                    }
                }
                _ => {
                    // A single glyph wider than the row still gets a row.
                    let end = if i == start { i + 1 } else { i };
                    rows.push(encoded[start..end].to_vec());
                    start = end;
                }
            }
            i = start;
            last_space = None;
            width = 0;
            continue;
        }
        i += 1;
    }

    if start < encoded.len() || rows.is_empty() {
        rows.push(encoded[start..].to_vec());
    }
    rows
}

/// Lay out `text` as one block per line.
///
/// # Errors
/// [`CodeDocError::UnsupportedGlyph`] for the first character the font
/// cannot encode, with its 1-based line number.
pub fn layout_document(text: &str, geometry: &PageGeometry) -> Result<DocumentLayout, CodeDocError> {
    let max_units = geometry.max_units();
    let break_at = geometry.break_at();
    let lines = split_blocks(text);

    let mut pages = vec![PageLayout::default()];
    let mut y = geometry.margin;

    for (block, line) in lines.iter().enumerate() {
        let encoded = font::encode_line(line)
            .map_err(|ch| CodeDocError::UnsupportedGlyph { line: block + 1, ch })?;
        let rows = wrap_line(&encoded, max_units);

        let block_height = rows.len() as f32 * geometry.row_height;
        let fits_empty_page = geometry.margin + block_height <= break_at;
        if fits_empty_page && y > geometry.margin && y + block_height > break_at {
            pages.push(PageLayout::default());
            y = geometry.margin;
        }

        for text in rows {
            if y > geometry.margin && y + geometry.row_height > break_at {
                pages.push(PageLayout::default());
                y = geometry.margin;
            }
            let baseline_from_top = y + 0.5 * geometry.row_height + 0.3 * geometry.font_size;
            if let Some(page) = pages.last_mut() {
                page.rows.push(PlacedRow {
                    block,
                    x: geometry.margin + geometry.cell_padding,
                    y: geometry.height - baseline_from_top,
                    text,
                });
            }
            y += geometry.row_height;
        }
    }

    Ok(DocumentLayout {
        pages,
        block_count: lines.len(),
    })
}
