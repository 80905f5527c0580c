//! Atomic output: serialise a document next to its destination, then rename.
//!
//! The temporary file lives in the destination directory so the final
//! rename never crosses a filesystem. If serialisation fails the temporary
//! file is removed on drop and an existing file at the destination is left
//! untouched.

use crate::error::PdfShadeError;
use lopdf::Document;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Write `doc` to `output`, replacing any existing file only on success.
pub fn save_atomic(doc: &mut Document, output: &Path) -> Result<(), PdfShadeError> {
    let write_err = |source: std::io::Error| PdfShadeError::OutputWriteFailed {
        path: output.to_path_buf(),
        source,
    };

    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(write_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        doc.save_to(&mut writer)
            .map_err(|e| write_err(std::io::Error::other(e.to_string())))?;
        writer.flush().map_err(write_err)?;
    }
    tmp.persist(output).map_err(|e| write_err(e.error))?;

    info!("Wrote {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object};

    fn tiny_doc() -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 100.into(), 100.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn writes_and_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a/b/out.pdf");
        save_atomic(&mut tiny_doc(), &out).unwrap();

        let back = Document::load(&out).unwrap();
        assert_eq!(back.get_pages().len(), 1);
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.pdf");
        std::fs::write(&out, b"old contents").unwrap();

        save_atomic(&mut tiny_doc(), &out).unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.pdf");
        save_atomic(&mut tiny_doc(), &out).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn unwritable_destination_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is needed.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let err = save_atomic(&mut tiny_doc(), &blocker.join("out.pdf")).unwrap_err();
        assert!(matches!(err, PdfShadeError::OutputWriteFailed { .. }));
    }
}
