use docview_style::list::{BULLET_MARKER, ListKind};

/// Marker for the item at zero-based `index` of a list numbered from `start`.
pub fn marker_text(kind: ListKind, start: usize, index: usize) -> String {
    match kind {
        ListKind::Unordered => BULLET_MARKER.to_string(),
        ListKind::Ordered => format!("{}. ", start.saturating_add(index)),
    }
}

pub fn int_to_lower_roman(n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let mut num = n;
    let values = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut result = String::new();
    for &(val, sym) in &values {
        while num >= val {
            result.push_str(sym);
            num -= val;
        }
    }
    result
}
