//! Minimal PDF writer for exported documents.
//!
//! Builds the object graph directly with `lopdf`: one shared Helvetica font
//! resource, one content stream per page, and one `BT … ET` text object per
//! block so the document structure mirrors the input lines. No outline, no
//! page numbers, no info dictionary.
//!
//! ```text
//! text ──▶ layout (blocks → rows → pages) ──▶ content streams ──▶ bytes
//! ```

pub mod font;
pub mod layout;

use crate::config::ExportConfig;
use crate::error::CodeDocError;
use layout::{DocumentLayout, PageGeometry, PlacedRow};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use tracing::debug;

/// Lay out `text` and serialise it as a PDF.
pub fn render_pdf(text: &str, export: &ExportConfig) -> Result<Vec<u8>, CodeDocError> {
    let geometry = PageGeometry::a4(export);
    let layout = layout::layout_document(text, &geometry)?;
    debug!(
        "Laid out {} blocks on {} pages",
        layout.block_count,
        layout.pages.len()
    );
    write_pdf(&layout, &geometry)
}

/// Serialise a finished layout.
///
/// Each logical block (one input line) becomes one `BT`/`ET` text object per
/// page it lands on. A block that fits a page yields exactly one object; a
/// block taller than an empty page yields one object per page segment.
pub fn write_pdf(layout: &DocumentLayout, geometry: &PageGeometry) -> Result<Vec<u8>, CodeDocError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font::BASE_FONT,
        "Encoding" => font::ENCODING,
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            font::RESOURCE_NAME => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = Content {
            operations: page_operations(&page.rows, geometry.font_size),
        };
        let encoded = content
            .encode()
            .map_err(|e| CodeDocError::PdfWriteFailed(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(geometry.width),
                Object::Real(geometry.height),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| CodeDocError::PdfWriteFailed(e.to_string()))?;
    Ok(bytes)
}

/// Content-stream operations for one page: a text object per run of rows
/// that share a block.
fn page_operations(rows: &[PlacedRow], font_size: f32) -> Vec<Operation> {
    let mut ops = Vec::new();
    let mut current: Option<usize> = None;

    for row in rows {
        if current != Some(row.block) {
            if current.is_some() {
                ops.push(Operation::new("ET", vec![]));
            }
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new(
                "Tf",
                vec![font::RESOURCE_NAME.into(), Object::Real(font_size)],
            ));
            current = Some(row.block);
        }
        ops.push(Operation::new(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                Object::Real(row.x),
                Object::Real(row.y),
            ],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(row.text.clone(), StringFormat::Literal)],
        ));
    }

    if current.is_some() {
        ops.push(Operation::new("ET", vec![]));
    }
    ops
}
