//! PDF serialization of laid-out pages via `lopdf`.
//!
//! Output uses the base-14 fonts with WinAnsiEncoding, one uncompressed
//! content stream per page, and no timestamps or document IDs, so identical
//! pages always serialize to identical bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::layout::font_metrics::{BuiltinFont, BULLET};
use crate::layout::page::{DrawOp, PageContent, PageGeometry};
use crate::layout::style::Rgb;
use crate::render::RenderError;

const PDF_VERSION: &str = "1.5";
const WIN_ANSI_BULLET: u8 = 0x95;

/// Serializes `pages` into a complete PDF file.
pub fn write_pdf(pages: &[PageContent], geometry: &PageGeometry) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in BuiltinFont::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_name(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let page_id = write_page(&mut doc, pages_id, page, geometry)?;
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(pages.len() as i64),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
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

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

fn write_page(
    doc: &mut Document,
    pages_id: ObjectId,
    page: &PageContent,
    geometry: &PageGeometry,
) -> Result<ObjectId, RenderError> {
    let mut operations = Vec::new();
    let mut annotations: Vec<Object> = Vec::new();

    for op in &page.ops {
        match op {
            DrawOp::Text { x, y, style, text } => {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("rg", color_operands(style.color)));
                operations.push(Operation::new(
                    "Tf",
                    vec![style.font.resource_name().into(), Object::Real(style.size)],
                ));
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Real(*x), Object::Real(geometry.height - *y)],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            DrawOp::Rule {
                x1,
                x2,
                y,
                thickness,
                color,
            } => {
                let pdf_y = geometry.height - *y;
                operations.push(Operation::new("q", vec![]));
                operations.push(Operation::new("RG", color_operands(*color)));
                operations.push(Operation::new("w", vec![Object::Real(*thickness)]));
                operations.push(Operation::new("m", vec![Object::Real(*x1), Object::Real(pdf_y)]));
                operations.push(Operation::new("l", vec![Object::Real(*x2), Object::Real(pdf_y)]));
                operations.push(Operation::new("S", vec![]));
                operations.push(Operation::new("Q", vec![]));
            }
            DrawOp::Link {
                x,
                y,
                width,
                height,
                uri,
            } => {
                let top = geometry.height - *y;
                annotations.push(Object::Dictionary(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Link",
                    "Rect" => vec![
                        Object::Real(*x),
                        Object::Real(top - *height),
                        Object::Real(*x + *width),
                        Object::Real(top),
                    ],
                    "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
                    "A" => dictionary! {
                        "S" => "URI",
                        "URI" => Object::string_literal(uri.as_str()),
                    },
                }));
            }
        }
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let mut page_dict = dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    };
    if !annotations.is_empty() {
        page_dict.set("Annots", annotations);
    }

    Ok(doc.add_object(page_dict))
}

fn color_operands(color: Rgb) -> Vec<Object> {
    color.components().into_iter().map(Object::Real).collect()
}

/// Encodes sanitized text for a WinAnsi base-14 font. The bullet glyph maps to
/// its WinAnsi code point; anything else outside ASCII becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            BULLET => WIN_ANSI_BULLET,
            c if c.is_ascii() => c as u8,
            _ => b'?',
        })
        .collect()
}
