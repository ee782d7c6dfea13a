// src/pdf/writer.rs

use crate::utils::error::StorageError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

// Helvetica has no embedded metrics here; average glyph width as a fraction
// of the font size is close enough for wrapping a single justified column.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// Layout constants for the generated document.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub title_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    pub body_leading: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        // A4 with one-inch margins.
        Self {
            page_width: 595.0,
            page_height: 842.0,
            margin: 72.0,
            title_size: 16.0,
            heading_size: 13.0,
            body_size: 11.0,
            body_leading: 14.0,
        }
    }
}

impl PageLayout {
    fn usable_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    fn char_budget(&self, size: f32) -> usize {
        (self.usable_width() / (size * AVG_GLYPH_WIDTH)).floor() as usize
    }
}

// One positioned line of output text. Empty text is a vertical spacer.
struct TextLine {
    text: String,
    font: &'static str,
    size: f32,
    leading: f32,
    centered: bool,
}

/// Builds a paginated document: a centered title block, an "Abstract"
/// heading, then the body reflowed against the usable column width.
pub fn build_document(
    title: &str,
    body: &str,
    layout: &PageLayout,
) -> Result<Document, StorageError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => bold_id,
            "F2" => regular_id,
        },
    });

    let lines = assemble_lines(title, body, layout);
    let pages_ops = paginate(&lines, layout);

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages_ops {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| StorageError::Pdf(format!("content encoding failed: {e}")))?;
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
                layout.page_width.into(),
                layout.page_height.into(),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    Ok(doc)
}

/// Flattens title, heading, and body into one ordered list of lines with
/// their typography attached. Spacer gaps are blank lines with a leading.
fn assemble_lines(title: &str, body: &str, layout: &PageLayout) -> Vec<TextLine> {
    let mut lines = Vec::new();

    let title_leading = layout.title_size + 4.0;
    for wrapped in wrap_text(title, layout.char_budget(layout.title_size)) {
        lines.push(TextLine {
            text: wrapped,
            font: "F1",
            size: layout.title_size,
            leading: title_leading,
            centered: true,
        });
    }
    lines.push(spacer(24.0));

    lines.push(TextLine {
        text: "Abstract".to_string(),
        font: "F1",
        size: layout.heading_size,
        leading: layout.heading_size + 4.0,
        centered: false,
    });
    lines.push(spacer(12.0));

    for wrapped in wrap_text(body, layout.char_budget(layout.body_size)) {
        lines.push(TextLine {
            text: wrapped,
            font: "F2",
            size: layout.body_size,
            leading: layout.body_leading,
            centered: false,
        });
    }

    lines
}

fn spacer(leading: f32) -> TextLine {
    TextLine {
        text: String::new(),
        font: "F2",
        size: 0.0,
        leading,
        centered: false,
    }
}

/// Greedy word wrap against an approximate character budget. A single word
/// longer than the budget gets its own overflowing line rather than being
/// split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lays lines onto pages top-down, breaking to a fresh page whenever the
/// cursor would cross the bottom margin.
fn paginate(lines: &[TextLine], layout: &PageLayout) -> Vec<Vec<Operation>> {
    let mut pages: Vec<Vec<Operation>> = Vec::new();
    let mut ops: Vec<Operation> = Vec::new();
    let mut y = layout.page_height - layout.margin;

    for line in lines {
        if y - line.leading < layout.margin {
            pages.push(std::mem::take(&mut ops));
            y = layout.page_height - layout.margin;
        }
        y -= line.leading;

        if line.text.is_empty() {
            continue;
        }

        let x = if line.centered {
            let width = line.text.chars().count() as f32 * line.size * AVG_GLYPH_WIDTH;
            layout.margin + ((layout.usable_width() - width) / 2.0).max(0.0)
        } else {
            layout.margin
        };

        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![line.font.into(), line.size.into()]));
        ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.text.as_str())],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    pages.push(ops);
    pages
}
