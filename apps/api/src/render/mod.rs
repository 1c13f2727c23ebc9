//! Cover-letter PDF rendering.
//!
//! Writes the PDF object graph directly with `lopdf`: one shared Helvetica
//! resource, one content stream per page. Nothing time- or randomness-dependent
//! goes into the file (no /ID, no dates), so identical input gives identical bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use thiserror::Error;

use crate::layout::{encode_str, wrap_text, PageLayout};
use crate::session::Language;

const FONT_RESOURCE: &str = "F1";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot render an empty cover letter")]
    EmptyText,

    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Lays out `text` on as many pages as it needs and returns the PDF bytes.
/// `language` is recorded as the document's `/Lang`.
pub fn render_cover_letter(
    text: &str,
    language: Language,
    layout: &PageLayout,
) -> Result<Vec<u8>, RenderError> {
    if text.trim().is_empty() {
        return Err(RenderError::EmptyText);
    }

    let lines = wrap_text(text.trim(), layout);
    let per_page = layout.lines_per_page();

    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { FONT_RESOURCE => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page_lines in lines.chunks(per_page) {
        let page_id = add_page(&mut doc, pages_id, resources_id, page_lines, layout)?;
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(layout.page_width_pt),
                Object::Real(layout.page_height_pt),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "Lang" => Object::string_literal(language.code()),
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(language.letter_title()),
        "Producer" => Object::string_literal(concat!("letterdesk ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    lines: &[String],
    layout: &PageLayout,
) -> Result<ObjectId, RenderError> {
    // Baseline of the first line sits one font size below the top margin
    let first_baseline = layout.page_height_pt - layout.margin_top_pt - layout.font_size_pt;

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![FONT_RESOURCE.into(), Object::Real(layout.font_size_pt)],
        ),
        Operation::new("TL", vec![Object::Real(layout.line_height_pt)]),
        Operation::new(
            "Td",
            vec![
                Object::Real(layout.margin_left_pt),
                Object::Real(first_baseline),
            ],
        ),
    ];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            operations.push(Operation::new("T*", vec![]));
        }
        if !line.is_empty() {
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(encode_str(line))],
            ));
        }
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::extract_text;
    use crate::layout::a4_letter_layout;

    const LETTER_EN: &str = "Dear Hiring Manager,\n\nI am excited to apply for the Senior Backend \
        Engineer role. Over five years I have built Python services on AWS.\n\nSincerely,\nJane Doe";

    const LETTER_FR: &str = "Madame, Monsieur,\n\nJe suis ravie de postuler au poste \
        d’ingénieure backend senior. Très motivée, je souhaite rejoindre votre équipe à Montréal.\n\n\
        Veuillez agréer mes salutations distinguées.\nJane Doe";

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[test]
    fn test_render_is_deterministic() {
        let layout = a4_letter_layout();
        let a = render_cover_letter(LETTER_EN, Language::English, &layout).unwrap();
        let b = render_cover_letter(LETTER_EN, Language::English, &layout).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_output_is_a_pdf() {
        let layout = a4_letter_layout();
        let bytes = render_cover_letter(LETTER_FR, Language::French, &layout).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_language_tag_differs_between_versions() {
        let layout = a4_letter_layout();
        let en = render_cover_letter(LETTER_EN, Language::English, &layout).unwrap();
        let fr = render_cover_letter(LETTER_EN, Language::French, &layout).unwrap();
        assert_ne!(en, fr);
    }

    #[test]
    fn test_long_letter_overflows_to_more_pages() {
        let layout = a4_letter_layout();
        let long = (0..120)
            .map(|i| format!("Paragraph {i}: I delivered measurable results."))
            .collect::<Vec<_>>()
            .join("\n");
        let bytes = render_cover_letter(&long, Language::English, &layout).unwrap();
        assert!(page_count(&bytes) >= 3);
    }

    #[test]
    fn test_rendered_text_can_be_extracted_again() {
        let layout = a4_letter_layout();
        let bytes = render_cover_letter(LETTER_EN, Language::English, &layout).unwrap();
        let text = extract_text(&bytes).unwrap();
        assert!(text.contains("Dear Hiring Manager,"));
        assert!(text.contains("Jane Doe"));
    }

    #[test]
    fn test_empty_text_rejected() {
        let layout = a4_letter_layout();
        assert!(matches!(
            render_cover_letter("  \n ", Language::English, &layout),
            Err(RenderError::EmptyText)
        ));
    }
}
