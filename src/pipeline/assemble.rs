//! Build a PDF from persisted grayscale page images.
//!
//! Each image becomes one page. The page is sized so the image keeps the
//! resolution it was rendered at: `px * 72 / dpi` points per side. A
//! 1275 × 1650 px image rendered at 150 DPI yields a 612 × 792 pt page.
//!
//! Pixels are embedded as 8-bit `/DeviceGray` samples and Flate-compressed
//! once the whole document is built.

use crate::error::PdfShadeError;
use crate::pipeline::render::POINTS_PER_INCH;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::path::PathBuf;
use tracing::debug;

/// Resource name the page content stream draws.
const IMAGE_NAME: &str = "Im0";

/// Page side length in points for `px` pixels rendered at `dpi`.
pub fn page_points(px: u32, dpi: u32) -> f32 {
    px as f32 * POINTS_PER_INCH / dpi as f32
}

/// Assemble one page per image, in the order given.
pub fn assemble_pdf(image_paths: &[PathBuf], dpi: u32) -> Result<Document, PdfShadeError> {
    if image_paths.is_empty() {
        return Err(PdfShadeError::AssemblyFailed(
            "no page images to assemble".into(),
        ));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::with_capacity(image_paths.len());
    for (idx, path) in image_paths.iter().enumerate() {
        let gray = image::open(path)
            .map_err(|e| {
                PdfShadeError::AssemblyFailed(format!("read {}: {e}", path.display()))
            })?
            .to_luma8();
        let (w_px, h_px) = gray.dimensions();
        let (w_pt, h_pt) = (page_points(w_px, dpi), page_points(h_px, dpi));

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => w_px as i64,
                "Height" => h_px as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            gray.into_raw(),
        ));

        let page_id = add_image_page(&mut doc, pages_id, image_id, w_pt, h_pt)?;
        kids.push(page_id.into());
        debug!(
            "Assembled page {} ({}x{} px → {:.1}x{:.1} pt)",
            idx + 1,
            w_px,
            h_px,
            w_pt,
            h_pt
        );
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
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

fn add_image_page(
    doc: &mut Document,
    pages_id: ObjectId,
    image_id: ObjectId,
    w_pt: f32,
    h_pt: f32,
) -> Result<ObjectId, PdfShadeError> {
    // Image space is the unit square; scale it to cover the page.
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    w_pt.into(),
                    0.into(),
                    0.into(),
                    h_pt.into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|e| PdfShadeError::AssemblyFailed(format!("encode page content: {e}")))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), w_pt.into(), h_pt.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                IMAGE_NAME => image_id,
            },
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use std::path::Path;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32, value: u8) -> PathBuf {
        let p = dir.join(name);
        GrayImage::from_pixel(w, h, Luma([value])).save(&p).unwrap();
        p
    }

    fn media_box(doc: &Document, page_id: ObjectId) -> Vec<f32> {
        doc.get_dictionary(page_id)
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect()
    }

    #[test]
    fn page_points_round_trip_letter() {
        assert_eq!(page_points(1275, 150), 612.0);
        assert_eq!(page_points(1650, 150), 792.0);
        assert_eq!(page_points(72, 72), 72.0);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = assemble_pdf(&[], 150).unwrap_err();
        assert!(matches!(err, PdfShadeError::AssemblyFailed(_)));
    }

    #[test]
    fn one_page_per_image_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_png(dir.path(), "a.png", 150, 300, 10),
            write_png(dir.path(), "b.png", 300, 150, 20),
            write_png(dir.path(), "c.png", 75, 75, 30),
        ];
        let doc = assemble_pdf(&paths, 150).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 3);

        assert_eq!(media_box(&doc, pages[&1]), vec![0.0, 0.0, 72.0, 144.0]);
        assert_eq!(media_box(&doc, pages[&2]), vec![0.0, 0.0, 144.0, 72.0]);
        assert_eq!(media_box(&doc, pages[&3]), vec![0.0, 0.0, 36.0, 36.0]);
    }

    #[test]
    fn images_are_device_gray() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![write_png(dir.path(), "a.png", 8, 4, 99)];
        let doc = assemble_pdf(&paths, 72).unwrap();

        let images: Vec<&Stream> = doc
            .objects
            .values()
            .filter_map(|o| o.as_stream().ok())
            .filter(|s| {
                s.dict
                    .get(b"Subtype")
                    .and_then(Object::as_name)
                    .map(|n| n == b"Image")
                    .unwrap_or(false)
            })
            .collect();
        assert_eq!(images.len(), 1);

        let dict = &images[0].dict;
        assert_eq!(dict.get(b"ColorSpace").unwrap().as_name().unwrap(), b"DeviceGray");
        assert_eq!(dict.get(b"BitsPerComponent").unwrap().as_i64().unwrap(), 8);
        assert_eq!(dict.get(b"Width").unwrap().as_i64().unwrap(), 8);
        assert_eq!(dict.get(b"Height").unwrap().as_i64().unwrap(), 4);

        let samples = images[0].decompressed_content().unwrap_or_else(|_| images[0].content.clone());
        assert_eq!(samples.len(), 32);
        assert!(samples.iter().all(|&v| v == 99));
    }

    #[test]
    fn unreadable_image_is_assembly_error() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("nope.png");
        std::fs::write(&bogus, b"not a png").unwrap();
        let err = assemble_pdf(&[bogus], 150).unwrap_err();
        assert!(matches!(err, PdfShadeError::AssemblyFailed(_)));
    }
}
