mod common;

use common::TestResult;
use common::fixtures::*;
use docview::layout::{EffectiveStyle, FontAvailability, VisualNode, build, build_with_fonts, visual};
use docview::style::font::{FontStyle, FontWeight};
use docview::style::text::{TextAlign, TextDecoration};
use docview::traits::DocumentParser;
use docview::types::Color;
use docview::JsonDocumentParser;
use serde_json::{Value, json};
use std::sync::Arc;

/// Resolved style of every text run, in document order.
fn run_styles(nodes: &[VisualNode]) -> Vec<(String, Arc<EffectiveStyle>)> {
    let mut out = Vec::new();
    visual::walk(nodes, &mut |node: &VisualNode| {
        if let VisualNode::TextRun { text, style, .. } = node {
            out.push((text.clone(), style.clone()));
        }
    });
    out
}

fn styles_of(doc: &Value) -> Result<Vec<(String, Arc<EffectiveStyle>)>, Box<dyn std::error::Error>> {
    let tree = JsonDocumentParser.parse(&to_bytes(doc))?;
    Ok(run_styles(&build(&tree).nodes))
}

fn stylesheet() -> Value {
    json!({
        "docDefaults": { "fontFamily": "Times", "fontSize": 11, "color": "#333333" },
        "paragraphStyles": {
            "Base": { "textAlign": "center", "run": { "fontSize": 13, "fontStyle": "italic" } },
            "Heading": { "basedOn": "Base", "run": { "fontSize": 20, "fontWeight": "bold" } }
        },
        "characterStyles": {
            "Emphasis": { "fontSize": 15, "color": "#aa0000", "textDecoration": "underline" }
        }
    })
}

#[test]
fn test_cascade_tiers_in_priority_order() -> TestResult {
    let doc = styled_document(
        stylesheet(),
        vec![
            paragraph("defaults"),
            styled_paragraph("Base", vec![text("base")]),
            styled_paragraph("Heading", vec![
                text("heading"),
                styled_text("emphasis", "Emphasis"),
                json!({ "type": "text", "text": "direct", "style": "Emphasis", "format": { "fontSize": 30 } }),
            ]),
        ],
    );
    let styles = styles_of(&doc)?;
    let by_text = |t: &str| {
        styles
            .iter()
            .find(|(text, _)| text == t)
            .map(|(_, s)| s.clone())
            .ok_or(format!("no run '{t}'"))
    };

    let defaults = by_text("defaults")?;
    assert_eq!(&*defaults.font_family, "Times");
    assert_eq!(defaults.font_size, 11.0);
    assert_eq!(defaults.color, Color::rgb(0x33, 0x33, 0x33));
    assert_eq!(defaults.text_align, TextAlign::Left);

    let base = by_text("base")?;
    assert_eq!(base.font_size, 13.0);
    assert_eq!(base.font_style, FontStyle::Italic);
    assert_eq!(base.text_align, TextAlign::Center);

    // Heading inherits italic and centring from Base and overrides the size.
    let heading = by_text("heading")?;
    assert_eq!(heading.font_size, 20.0);
    assert_eq!(heading.font_weight, FontWeight::Bold);
    assert_eq!(heading.font_style, FontStyle::Italic);
    assert_eq!(heading.text_align, TextAlign::Center);
    assert_eq!(&*heading.font_family, "Times");

    let emphasis = by_text("emphasis")?;
    assert_eq!(emphasis.font_size, 15.0);
    assert_eq!(emphasis.color, Color::rgb(0xaa, 0, 0));
    assert_eq!(emphasis.text_decoration, TextDecoration::Underline);
    assert_eq!(emphasis.font_weight, FontWeight::Bold);

    let direct = by_text("direct")?;
    assert_eq!(direct.font_size, 30.0);
    assert_eq!(direct.text_decoration, TextDecoration::Underline);
    Ok(())
}

#[test]
fn test_explicit_none_color_falls_back_to_black() -> TestResult {
    let doc = styled_document(
        json!({ "docDefaults": { "color": "#00ff00" } }),
        vec![paragraph_with(vec![
            text("green"),
            formatted_text("auto", json!({ "color": "auto" })),
        ])],
    );
    let styles = styles_of(&doc)?;
    assert_eq!(styles[0].1.color, Color::rgb(0, 0xff, 0));
    assert_eq!(styles[1].1.color, Color::BLACK);
    Ok(())
}

#[test]
fn test_built_in_fallback_without_stylesheet() -> TestResult {
    let styles = styles_of(&document(vec![paragraph("plain")]))?;
    let style = &styles[0].1;
    assert_eq!(&*style.font_family, "Helvetica");
    assert_eq!(style.font_size, 12.0);
    assert_eq!(style.color, Color::BLACK);
    assert_eq!(style.font_weight, FontWeight::Regular);
    Ok(())
}

#[test]
fn test_unknown_and_cyclic_styles_degrade_to_lower_tiers() -> TestResult {
    let doc = styled_document(
        json!({
            "docDefaults": { "fontSize": 9 },
            "paragraphStyles": {
                "A": { "basedOn": "B", "run": { "fontSize": 14 } },
                "B": { "basedOn": "A", "textAlign": "right" }
            }
        }),
        vec![
            styled_paragraph("A", vec![text("cycle")]),
            styled_paragraph("Missing", vec![styled_text("nostyle", "AlsoMissing")]),
        ],
    );
    let styles = styles_of(&doc)?;
    assert_eq!(styles[0].1.font_size, 14.0);
    assert_eq!(styles[0].1.text_align, TextAlign::Right);
    assert_eq!(styles[1].1.font_size, 9.0);
    Ok(())
}

#[test]
fn test_resolution_is_deterministic() -> TestResult {
    let doc = styled_document(
        stylesheet(),
        vec![
            styled_paragraph("Heading", vec![styled_text("same", "Emphasis")]),
            styled_paragraph("Heading", vec![styled_text("same", "Emphasis")]),
        ],
    );
    let first = styles_of(&doc)?;
    let second = styles_of(&doc)?;
    assert_eq!(first, second);
    assert_eq!(first[0].1, first[1].1);
    Ok(())
}

#[test]
fn test_unavailable_family_is_substituted() -> TestResult {
    let doc = document(vec![paragraph_with(vec![formatted_text(
        "fancy",
        json!({ "fontFamily": "Nonexistent Serif" }),
    )])]);
    let tree = JsonDocumentParser.parse(&to_bytes(&doc))?;
    let fonts = FontAvailability::new(["Courier"], vec!["Arial".to_string(), "Courier".to_string()]);
    let styles = run_styles(&build_with_fonts(&tree, &fonts).nodes);

    let style = &styles[0].1;
    assert_eq!(&*style.font_family, "Courier");
    assert_eq!(&*style.requested_family, "Nonexistent Serif");
    assert!(style.was_substituted());
    Ok(())
}
