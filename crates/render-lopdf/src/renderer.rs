use crate::content::render_page_to_content;
use crate::flow::{font_key, paginate};
use crate::writer::StreamingPdfWriter;
use docview_layout::VisualNode;
use docview_layout::visual::walk;
use docview_render_core::utils::get_styled_font_name;
use docview_render_core::{
    AverageWidthMeasurer, DocumentRenderer, DrawOp, ExportArtifact, FontKey, PageContent,
    PageFormat, RenderError, TextMeasurer,
};
use lopdf::{Dictionary, Object, ObjectId, StringFormat, dictionary};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Seek, Write};
use std::sync::Arc;

/// Writes laid-out pages as PDF objects using the built-in Type1 fonts.
pub struct LopdfRenderer<W: Write + Seek + Send> {
    writer: Option<StreamingPdfWriter<W>>,
    font_map: BTreeMap<FontKey, String>,
    title: Option<String>,
    pending_annotations: Vec<ObjectId>,
}

impl<W: Write + Seek + Send> Default for LopdfRenderer<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Seek + Send> LopdfRenderer<W> {
    pub fn new() -> Self {
        Self {
            writer: None,
            font_map: BTreeMap::new(),
            title: None,
            pending_annotations: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn writer_mut(&mut self) -> Result<&mut StreamingPdfWriter<W>, RenderError> {
        self.writer
            .as_mut()
            .ok_or_else(|| RenderError::Other("Document not started".into()))
    }

    /// Buffers a URI link annotation for every text op that carries a link.
    fn link_annotations(&mut self, page: &PageContent, page_height: f32) -> Result<Vec<ObjectId>, RenderError> {
        let writer = self.writer_mut()?;
        let mut annots = Vec::new();
        for op in &page.ops {
            let DrawOp::Text(text) = op else { continue };
            let Some(href) = &text.href else { continue };
            let rect = vec![
                text.x.into(),
                (page_height - (text.y + text.size * 1.2)).into(),
                (text.x + text.width).into(),
                (page_height - text.y).into(),
            ];
            let action = dictionary! {
                "Type" => "Action",
                "S" => "URI",
                "URI" => Object::String(href.as_bytes().to_vec(), StringFormat::Literal),
            };
            let annot = dictionary! {
                "Type" => "Annot", "Subtype" => "Link", "Rect" => rect,
                "Border" => vec![0.into(), 0.into(), 0.into()], "A" => action,
            };
            annots.push(writer.buffer_object(annot.into()));
        }
        Ok(annots)
    }
}

impl<W: Write + Seek + Send> DocumentRenderer<W> for LopdfRenderer<W> {
    fn begin_document(&mut self, writer: W, fonts: &BTreeSet<FontKey>) -> Result<(), RenderError> {
        let mut font_dict = Dictionary::new();
        let regular = FontKey {
            family: "Helvetica".to_string(),
            bold: false,
            italic: false,
        };
        let faces = std::iter::once(&regular).chain(fonts.iter().filter(|f| **f != regular));
        for (i, face) in faces.enumerate() {
            let internal_name = format!("F{}", i + 1);
            let single_font_dict = dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => get_styled_font_name(&face.family, face.bold, face.italic),
                "Encoding" => "WinAnsiEncoding",
            };
            font_dict.set(internal_name.as_bytes(), Object::Dictionary(single_font_dict));
            self.font_map.insert(face.clone(), internal_name);
        }

        let mut pdf = StreamingPdfWriter::new(writer, "1.7", font_dict)?;
        if let Some(title) = &self.title {
            pdf.set_title(title);
        }
        self.writer = Some(pdf);
        Ok(())
    }

    fn render_page_content(
        &mut self,
        page: &PageContent,
        format: &PageFormat,
    ) -> Result<ObjectId, RenderError> {
        let (_, page_height) = format.dimensions();
        let annots = self.link_annotations(page, page_height)?;
        self.pending_annotations.extend(annots);
        let content = render_page_to_content(page, page_height, &self.font_map);
        self.writer_mut()?.write_content_stream(content)
    }

    fn write_page_object(
        &mut self,
        content_stream_id: ObjectId,
        format: &PageFormat,
    ) -> Result<ObjectId, RenderError> {
        let annotations = std::mem::take(&mut self.pending_annotations);
        let writer = self.writer_mut()?;
        let (page_width, page_height) = format.dimensions();

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => writer.pages_id,
            "MediaBox" => vec![0.0_f32.into(), 0.0_f32.into(), page_width.into(), page_height.into()],
            "Contents" => Object::Reference(content_stream_id),
            "Resources" => writer.resources_id,
        };
        if !annotations.is_empty() {
            page_dict.set(
                "Annots",
                Object::Array(annotations.into_iter().map(Object::Reference).collect()),
            );
        }

        let page_id = writer.write_object(page_dict.into())?;
        Ok(page_id)
    }

    fn finish(self: Box<Self>, page_ids: Vec<ObjectId>) -> Result<W, RenderError> {
        let mut renderer = *self;
        match renderer.writer.take() {
            Some(mut internal_writer) => {
                internal_writer.set_page_ids(page_ids);
                Ok(internal_writer.finish()?)
            }
            None => Err(RenderError::Other(
                "Document not started or already finished".into(),
            )),
        }
    }
}

/// Turns a visual node sequence into a paginated PDF artifact.
#[derive(Clone)]
pub struct PdfExportRenderer {
    format: PageFormat,
    measurer: Arc<dyn TextMeasurer>,
    title: Option<String>,
}

impl std::fmt::Debug for PdfExportRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfExportRenderer")
            .field("format", &self.format)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl PdfExportRenderer {
    pub fn new(format: PageFormat) -> Self {
        Self {
            format,
            measurer: Arc::new(AverageWidthMeasurer::default()),
            title: None,
        }
    }

    pub fn with_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn format(&self) -> &PageFormat {
        &self.format
    }

    pub fn render(&self, nodes: &[VisualNode]) -> Result<ExportArtifact, RenderError> {
        self.format.validate()?;
        let pages = paginate(nodes, &self.format, self.measurer.as_ref());
        let fonts = used_fonts(nodes);

        let mut renderer = LopdfRenderer::new();
        if let Some(title) = &self.title {
            renderer = renderer.with_title(title.clone());
        }
        let mut renderer: Box<dyn DocumentRenderer<Cursor<Vec<u8>>>> = Box::new(renderer);
        renderer.begin_document(Cursor::new(Vec::new()), &fonts)?;

        let mut page_ids = Vec::with_capacity(pages.len());
        for page in &pages {
            let content_id = renderer.render_page_content(page, &self.format)?;
            page_ids.push(renderer.write_page_object(content_id, &self.format)?);
        }
        let page_count = page_ids.len();
        let bytes = renderer.finish(page_ids)?.into_inner();

        log::info!("Exported {} page(s), {} bytes", page_count, bytes.len());
        Ok(ExportArtifact { bytes, page_count })
    }
}

/// Every built-in face the nodes will be drawn with.
fn used_fonts(nodes: &[VisualNode]) -> BTreeSet<FontKey> {
    let mut fonts = BTreeSet::new();
    walk(nodes, &mut |node| match node {
        VisualNode::TextRun { style, .. } | VisualNode::NoteReference { style, .. } => {
            fonts.insert(font_key(style));
        }
        VisualNode::ListItem { marker_style, .. } => {
            fonts.insert(font_key(marker_style));
        }
        VisualNode::Image { alt: Some(_), .. } => {
            fonts.insert(FontKey {
                family: "Helvetica".to_string(),
                bold: false,
                italic: true,
            });
        }
        _ => {}
    });
    fonts
}
