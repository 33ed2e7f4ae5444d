use std::path::Path;

use anyhow::Context as _;

/// Text of one PDF page.
#[derive(Clone, Debug)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// Extracts per-page text from a PDF file. Pages whose text cannot be
/// decoded are skipped with a warning rather than failing the whole file.
pub fn extract_pages(path: impl AsRef<Path>) -> anyhow::Result<Vec<PageText>> {
    let path = path.as_ref();
    let doc = lopdf::Document::load(path)
        .with_context(|| format!("failed to load PDF {}", path.display()))?;

    let mut pages = Vec::new();
    for (&page_number, _) in doc.get_pages().iter() {
        match doc.extract_text(&[page_number]) {
            Ok(text) => pages.push(PageText { page_number, text }),
            Err(e) => {
                log::warn!(
                    "skipping page {page_number} of {}: {e}",
                    path.display()
                );
            }
        }
    }
    Ok(pages)
}

/// Writes a minimal PDF with one page per entry of `page_texts`.
#[cfg(test)]
pub(crate) fn write_sample_pdf(path: &Path, page_texts: &[&str]) {
    use lopdf::{
        Document, Object, Stream,
        content::{Content, Operation},
        dictionary,
    };

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id =
            doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}
