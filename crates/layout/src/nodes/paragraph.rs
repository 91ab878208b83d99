use crate::builder::VisualNodeBuilder;
use crate::style::ParagraphContext;
use crate::visual::VisualNode;
use docview_idf::{InlineNode, Paragraph, TextRun};

impl VisualNodeBuilder<'_> {
    pub(crate) fn build_paragraph(&mut self, paragraph: &Paragraph, out: &mut Vec<VisualNode>) {
        let ctx = self.resolver.paragraph_context(paragraph);
        let plain = self.resolver.resolve_plain(&ctx);

        self.index.begin_block();
        let mut inlines = Vec::with_capacity(paragraph.children.len());
        for child in &paragraph.children {
            self.build_inline(child, &ctx, &mut inlines);
        }

        if inlines.is_empty() {
            out.push(VisualNode::EmptyLine {
                height: plain.line_height,
            });
            return;
        }

        out.push(VisualNode::ParagraphStart {
            align: ctx.text_align,
            line_height: plain.line_height,
            space_after: ctx.space_after,
        });
        out.extend(inlines);
        out.push(VisualNode::ParagraphEnd);
    }

    fn build_inline(&mut self, node: &InlineNode, ctx: &ParagraphContext, out: &mut Vec<VisualNode>) {
        match node {
            InlineNode::Text(run) => self.push_run(run, ctx, None, out),
            InlineNode::LineBreak => out.push(VisualNode::LineBreak {
                entry: self.index.push("\n"),
            }),
            InlineNode::Tab => out.push(VisualNode::Tab {
                entry: self.index.push("\t"),
            }),
            InlineNode::Image(image) => out.push(VisualNode::Image {
                src: image.src.clone(),
                width: image.width.max(0.0),
                height: image.height.max(0.0),
                alt: image.alt.clone(),
            }),
            InlineNode::Hyperlink(link) => {
                for run in &link.children {
                    self.push_run(run, ctx, Some(&link.href), out);
                }
            }
            InlineNode::NoteReference(reference) => {
                let label = self.note_label(&reference.id, reference.kind);
                out.push(VisualNode::NoteReference {
                    id: reference.id.clone(),
                    kind: reference.kind,
                    label,
                    style: self.resolver.resolve_plain(ctx),
                });
            }
            InlineNode::Unsupported => {
                log::debug!("Skipping unsupported inline element");
                self.diagnostics.skipped_inlines += 1;
            }
        }
    }

    fn push_run(
        &mut self,
        run: &TextRun,
        ctx: &ParagraphContext,
        href: Option<&str>,
        out: &mut Vec<VisualNode>,
    ) {
        if run.text.is_empty() {
            return;
        }
        let style = self.resolver.resolve_run(ctx, run);
        out.push(VisualNode::TextRun {
            text: run.text.clone(),
            style,
            href: href.map(str::to_string),
            entry: self.index.push(&run.text),
        });
    }
}
