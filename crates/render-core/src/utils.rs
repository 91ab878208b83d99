/// Maps a document family onto one of the export surface's built-in families.
pub fn builtin_family(family: &str) -> &'static str {
    let lower = family.to_lowercase();
    if lower.contains("courier") || lower.contains("mono") || lower.contains("consolas") {
        "Courier"
    } else if lower.contains("times")
        || lower.contains("georgia")
        || lower.contains("cambria")
        || lower.contains("garamond")
        || (lower.contains("serif") && !lower.contains("sans"))
    {
        "Times"
    } else {
        "Helvetica"
    }
}

/// Get PDF font name with style suffix
pub fn get_styled_font_name(base_name: &str, bold: bool, italic: bool) -> String {
    // Times uses Roman/Italic, the others use Oblique.
    match (base_name, bold, italic) {
        ("Times", false, false) => "Times-Roman".to_string(),
        ("Times", true, false) => "Times-Bold".to_string(),
        ("Times", false, true) => "Times-Italic".to_string(),
        ("Times", true, true) => "Times-BoldItalic".to_string(),
        (base, false, false) => base.to_string(),
        (base, true, false) => format!("{}-Bold", base),
        (base, false, true) => format!("{}-Oblique", base),
        (base, true, true) => format!("{}-BoldOblique", base),
    }
}

/// Convert layout Y coordinate to PDF Y coordinate (flip origin)
pub fn flip_y(y: f32, page_height: f32) -> f32 {
    page_height - y
}
