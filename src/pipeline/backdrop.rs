//! Background layer: a filled page-sized rectangle placed *under* the page.
//!
//! A page's `/Contents` may be one stream or an array of streams, and the
//! array is painted in order. Inserting the rectangle as the first stream
//! therefore makes it the bottommost layer; appending it instead would paint
//! it over the page and hide everything. The rectangle is wrapped in `q … Q`
//! so the fill colour does not leak into the original content.

use crate::config::FillColor;
use crate::error::PdfShadeError;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// US Letter, used when a page (and its ancestors) carries no `/MediaBox`.
pub const DEFAULT_PAGE_BOX: PageBox = PageBox {
    x0: 0.0,
    y0: 0.0,
    x1: 612.0,
    y1: 792.0,
};

/// Inherited attributes are looked up at most this many levels up.
const MAX_TREE_DEPTH: usize = 32;

/// A page rectangle in PDF user space, normalised so `x0 <= x1`, `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl PageBox {
    fn from_corners(v: [f32; 4]) -> Self {
        Self {
            x0: v[0].min(v[2]),
            y0: v[1].min(v[3]),
            x1: v[0].max(v[2]),
            y1: v[1].max(v[3]),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// The page's `/MediaBox`, inherited through the page tree if needed.
pub fn page_box(doc: &Document, page_id: ObjectId) -> PageBox {
    let mut current = doc.get_dictionary(page_id).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let Some(dict) = current else { break };
        if let Some(b) = media_box(doc, dict) {
            return b;
        }
        current = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .and_then(|id| doc.get_dictionary(id))
            .ok();
    }

    DEFAULT_PAGE_BOX
}

fn media_box(doc: &Document, dict: &Dictionary) -> Option<PageBox> {
    let obj = dict.get(b"MediaBox").ok()?;
    let arr = match obj {
        Object::Array(arr) => arr,
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok()?,
        _ => return None,
    };
    if arr.len() != 4 {
        return None;
    }

    let mut v = [0.0f32; 4];
    for (slot, o) in v.iter_mut().zip(arr) {
        *slot = match o {
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r,
            _ => return None,
        };
    }
    Some(PageBox::from_corners(v))
}

/// Content stream painting `rect` with `color`: `q r g b rg x y w h re f Q`.
pub fn background_content(color: FillColor, rect: PageBox) -> Result<Vec<u8>, PdfShadeError> {
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new("rg", vec![color.r.into(), color.g.into(), color.b.into()]),
            Operation::new(
                "re",
                vec![
                    rect.x0.into(),
                    rect.y0.into(),
                    rect.width().into(),
                    rect.height().into(),
                ],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ],
    };
    content
        .encode()
        .map_err(|e| PdfShadeError::Internal(format!("encode background content: {e}")))
}

/// Insert `content` as the first content stream of `page_id`.
pub fn prepend_content(
    doc: &mut Document,
    page_id: ObjectId,
    content: Vec<u8>,
) -> Result<(), PdfShadeError> {
    let layer_id = doc.add_object(Stream::new(Dictionary::new(), content));

    let existing = doc
        .get_dictionary(page_id)
        .map_err(|e| PdfShadeError::Internal(format!("page {page_id:?}: {e}")))?
        .get(b"Contents")
        .ok()
        .cloned();

    let new_contents = match existing {
        None => Object::Reference(layer_id),
        Some(Object::Array(mut arr)) => {
            arr.insert(0, Object::Reference(layer_id));
            Object::Array(arr)
        }
        Some(Object::Reference(id)) => match doc.get_object(id) {
            // `/Contents 12 0 R` may name an array of streams that other
            // pages share; the page gets its own copy and the shared array
            // is left alone.
            Ok(Object::Array(shared)) => {
                let mut arr = Vec::with_capacity(shared.len() + 1);
                arr.push(Object::Reference(layer_id));
                arr.extend(shared.iter().cloned());
                Object::Array(arr)
            }
            _ => Object::Array(vec![Object::Reference(layer_id), Object::Reference(id)]),
        },
        Some(other) => Object::Array(vec![Object::Reference(layer_id), other]),
    };

    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfShadeError::Internal(format!("page {page_id:?}: {e}")))?
        .set("Contents", new_contents);
    Ok(())
}
