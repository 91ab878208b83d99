use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// Extract all text content from a PDF document, one page per line block
pub fn extract_text(doc: &LopdfDocument) -> String {
    let mut text = String::new();
    let pages = doc.get_pages();
    for page_num in 1..=pages.len() {
        if let Ok(page_text) = doc.extract_text(&[page_num as u32]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }
    text
}

/// Text of a single page (1-based)
pub fn page_text(doc: &LopdfDocument, page_num: u32) -> String {
    doc.extract_text(&[page_num]).unwrap_or_default()
}

fn resolve_dict<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        other => other.as_dict().ok(),
    }
}

/// BaseFont names referenced from page resources
pub fn extract_font_names(doc: &LopdfDocument) -> Vec<String> {
    let mut fonts = std::collections::BTreeSet::new();
    for (_, page_id) in doc.get_pages() {
        let Some(page) = doc.get_object(page_id).ok().and_then(|o| o.as_dict().ok()) else {
            continue;
        };
        let Some(resources) = page.get(b"Resources").ok().and_then(|r| resolve_dict(doc, r)) else {
            continue;
        };
        let Some(font_dict) = resources.get(b"Font").ok().and_then(|f| resolve_dict(doc, f)) else {
            continue;
        };
        for (_, font) in font_dict.iter() {
            if let Some(name) = resolve_dict(doc, font)
                .and_then(|d| d.get(b"BaseFont").ok())
                .and_then(|b| b.as_name().ok())
            {
                fonts.insert(String::from_utf8_lossy(name).to_string());
            }
        }
    }
    fonts.into_iter().collect()
}

/// URI targets of link annotations, in page order
pub fn extract_link_uris(doc: &LopdfDocument) -> Vec<String> {
    let mut uris = Vec::new();
    for (_, page_id) in doc.get_pages() {
        let Some(page) = doc.get_object(page_id).ok().and_then(|o| o.as_dict().ok()) else {
            continue;
        };
        let Ok(annots) = page.get(b"Annots").and_then(|a| a.as_array()) else {
            continue;
        };
        for annot in annots {
            let uri = resolve_dict(doc, annot)
                .filter(|d| matches!(d.get(b"Subtype").and_then(|s| s.as_name()), Ok(b"Link")))
                .and_then(|d| d.get(b"A").ok())
                .and_then(|a| resolve_dict(doc, a))
                .and_then(|a| a.get(b"URI").ok())
                .and_then(|u| u.as_str().ok());
            if let Some(uri) = uri {
                uris.push(String::from_utf8_lossy(uri).to_string());
            }
        }
    }
    uris
}

/// Get page dimensions (width, height) in points
pub fn get_page_dimensions(doc: &LopdfDocument, page_num: u32) -> Option<(f32, f32)> {
    let pages = doc.get_pages();
    let page_id = pages.get(&page_num)?;
    let page_dict = doc.get_object(*page_id).ok()?.as_dict().ok()?;
    let arr = page_dict.get(b"MediaBox").ok()?.as_array().ok()?;
    if arr.len() < 4 {
        return None;
    }
    let width = arr[2].as_float().ok()? - arr[0].as_float().ok()?;
    let height = arr[3].as_float().ok()? - arr[1].as_float().ok()?;
    Some((width, height))
}

/// Font sizes set by `Tf` operators on a page, in order
pub fn font_sizes(doc: &LopdfDocument, page_num: u32) -> Vec<f32> {
    let Some(page_id) = doc.get_pages().get(&page_num).copied() else {
        return Vec::new();
    };
    let Ok(content) = doc
        .get_page_content(page_id)
        .and_then(|bytes| lopdf::content::Content::decode(&bytes))
    else {
        return Vec::new();
    };
    content
        .operations
        .iter()
        .filter(|op| op.operator == "Tf")
        .filter_map(|op| op.operands.get(1).and_then(|size| size.as_float().ok()))
        .collect()
}

/// Document title from the Info dictionary
pub fn document_title(doc: &LopdfDocument) -> Option<String> {
    let info = doc.trailer.get(b"Info").ok()?;
    let dict = resolve_dict(doc, info)?;
    let title = dict.get(b"Title").ok()?.as_str().ok()?;
    Some(String::from_utf8_lossy(title).to_string())
}

/// Assert that PDF contains specific text
#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            extracted.contains($text),
            "PDF should contain '{}', but extracted text was:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert that PDF does NOT contain specific text
#[macro_export]
macro_rules! assert_pdf_not_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            !extracted.contains($text),
            "PDF should NOT contain '{}', but it was found in:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

/// Assert minimum number of pages
#[macro_export]
macro_rules! assert_pdf_min_pages {
    ($pdf:expr, $min:expr) => {
        assert!(
            $pdf.page_count() >= $min,
            "Expected at least {} pages, got {}",
            $min,
            $pdf.page_count()
        );
    };
}

/// Assert that PDF contains a font matching a pattern
#[macro_export]
macro_rules! assert_pdf_has_font {
    ($pdf:expr, $pattern:expr) => {
        let fonts = $crate::common::pdf_assertions::extract_font_names(&$pdf.doc);
        assert!(
            fonts.iter().any(|f| f.contains($pattern)),
            "PDF should use a font matching '{}', found: {:?}",
            $pattern,
            fonts
        );
    };
}
