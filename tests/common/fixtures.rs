use serde_json::{Value, json};

/// Wrap blocks into a document
pub fn document(blocks: Vec<Value>) -> Value {
    json!({ "blocks": blocks })
}

/// Document with a stylesheet
pub fn styled_document(stylesheet: Value, blocks: Vec<Value>) -> Value {
    json!({ "stylesheet": stylesheet, "blocks": blocks })
}

/// Plain text run
pub fn text(content: &str) -> Value {
    json!({ "type": "text", "text": content })
}

/// Text run with direct formatting
pub fn formatted_text(content: &str, format: Value) -> Value {
    json!({ "type": "text", "text": content, "format": format })
}

/// Text run referencing a character style
pub fn styled_text(content: &str, style: &str) -> Value {
    json!({ "type": "text", "text": content, "style": style })
}

/// Paragraph with a single plain run
pub fn paragraph(content: &str) -> Value {
    paragraph_with(vec![text(content)])
}

pub fn paragraph_with(children: Vec<Value>) -> Value {
    json!({ "type": "paragraph", "children": children })
}

/// Paragraph using a named paragraph style
pub fn styled_paragraph(style: &str, children: Vec<Value>) -> Value {
    json!({ "type": "paragraph", "style": style, "children": children })
}

pub fn empty_paragraph() -> Value {
    json!({ "type": "paragraph", "children": [] })
}

pub fn line_break() -> Value {
    json!({ "type": "lineBreak" })
}

pub fn tab() -> Value {
    json!({ "type": "tab" })
}

pub fn hyperlink(href: &str, content: &str) -> Value {
    json!({ "type": "hyperlink", "href": href, "children": [{ "text": content }] })
}

pub fn image(src: &str, width: f32, height: f32, alt: Option<&str>) -> Value {
    let mut img = json!({ "type": "image", "src": src, "width": width, "height": height });
    if let Some(alt) = alt {
        img["alt"] = json!(alt);
    }
    img
}

pub fn footnote_ref(id: &str) -> Value {
    json!({ "type": "noteReference", "id": id })
}

pub fn endnote_ref(id: &str) -> Value {
    json!({ "type": "noteReference", "id": id, "kind": "endnote" })
}

pub fn section_break() -> Value {
    json!({ "type": "sectionBreak" })
}

/// List of single-paragraph items
pub fn list(ordered: bool, start: usize, items: Vec<Value>) -> Value {
    let items: Vec<Value> = items.into_iter().map(|b| json!({ "blocks": [b] })).collect();
    json!({
        "type": "list",
        "kind": if ordered { "ordered" } else { "unordered" },
        "start": start,
        "items": items
    })
}

/// Table from rows of cell block lists
pub fn table(rows: Vec<Vec<Vec<Value>>>) -> Value {
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|cells| {
            let cells: Vec<Value> = cells.into_iter().map(|blocks| json!({ "blocks": blocks })).collect();
            json!({ "cells": cells })
        })
        .collect();
    json!({ "type": "table", "rows": rows })
}

/// Block type the pipeline does not know
pub fn unsupported_block(kind: &str) -> Value {
    json!({ "type": kind, "payload": {} })
}

/// Note table entry
pub fn note(blocks: Vec<Value>) -> Value {
    json!({ "blocks": blocks })
}

/// A long document of numbered paragraphs
pub fn long_document(paragraphs: usize) -> Value {
    let blocks = (0..paragraphs)
        .map(|i| paragraph(&format!("Paragraph {} of a long document with enough words to wrap.", i)))
        .collect();
    document(blocks)
}

pub fn to_bytes(doc: &Value) -> Vec<u8> {
    serde_json::to_vec(doc).unwrap_or_default()
}
