use crate::error::RenderError;
use crate::types::{FontKey, PageContent, PageFormat};
use lopdf::ObjectId;
use std::collections::BTreeSet;
use std::io::Write;

/// A trait for document renderers, abstracting the PDF-writing primitives.
pub trait DocumentRenderer<W: Write + Send> {
    fn begin_document(&mut self, writer: W, fonts: &BTreeSet<FontKey>) -> Result<(), RenderError>;

    fn render_page_content(
        &mut self,
        page: &PageContent,
        format: &PageFormat,
    ) -> Result<ObjectId, RenderError>;

    fn write_page_object(
        &mut self,
        content_stream_id: ObjectId,
        format: &PageFormat,
    ) -> Result<ObjectId, RenderError>;

    fn finish(self: Box<Self>, page_ids: Vec<ObjectId>) -> Result<W, RenderError>;
}
