use crate::builder::VisualNodeBuilder;
use crate::visual::VisualNode;
use docview_idf::{MAX_TABLE_COLUMNS, Table};

impl VisualNodeBuilder<'_> {
    pub(crate) fn build_table(&mut self, table: &Table, depth: usize, out: &mut Vec<VisualNode>) {
        out.push(VisualNode::TableStart {
            columns: column_fractions(table),
        });
        for row in &table.rows {
            out.push(VisualNode::Row);
            for cell in &row.cells {
                if cell.col_span > MAX_TABLE_COLUMNS {
                    log::warn!(
                        "Cell spans {} columns, clamping to {}",
                        cell.col_span,
                        MAX_TABLE_COLUMNS
                    );
                }
                let mut content = Vec::new();
                self.build_blocks(&cell.blocks, depth, &mut content);
                out.push(VisualNode::Cell {
                    content,
                    col_span: cell.span(),
                });
            }
        }
        out.push(VisualNode::TableEnd);
    }
}

/// Relative column widths summing to 1. Declared widths are used when they
/// cover every column; otherwise columns share the width equally.
pub fn column_fractions(table: &Table) -> Vec<f32> {
    let count = table.column_count();
    if count == 0 {
        return Vec::new();
    }
    if let Some(widths) = &table.column_widths {
        let total: f32 = widths.iter().sum();
        if widths.len() == count && total > 0.0 && widths.iter().all(|w| *w >= 0.0) {
            return widths.iter().map(|w| w / total).collect();
        }
    }
    vec![1.0 / count as f32; count]
}
