//! The viewer controller: load cycles, zoom, search and toolbar actions.

use crate::callbacks::{ActionOverride, ViewerCallbacks};
use crate::config::ViewerConfig;
use crate::error::{ActionError, ConfigError, LoadError};
use crate::parser::JsonDocumentParser;
use crate::search::SearchState;
use crate::source::DocumentSource;
use crate::surfaces::NoSurface;
use crate::zoom::{ZoomState, fit_to_width};
use docview_idf::DocumentTree;
use docview_layout::{
    BuildOutput, FontAvailability, FontRegistry, MatchSpan, VisualNode, VisualNodeBuilder,
    build_notes_section, build_with_fonts,
};
use docview_render_core::ExportArtifact;
use docview_render_display::{DisplayTree, LayoutMode, render};
use docview_render_lopdf::PdfExportRenderer;
use docview_traits::{
    DocumentParser, DownloadSurface, FontError, FontRegistrar, InMemoryFontRegistrar, PrintSurface,
    ShareSurface,
};
use docview_types::{FamilyName, NoteId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Families the export surface draws without embedding.
pub const BUILTIN_FAMILIES: [&str; 3] = ["Helvetica", "Times", "Courier"];

/// What one successful load produced.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadDiagnostics {
    pub document: String,
    pub registered_fonts: Vec<FamilyName>,
    pub failed_fonts: Vec<(FamilyName, FontError)>,
    pub skipped_elements: usize,
    pub visual_nodes: usize,
    pub searchable_chars: usize,
    pub note_references: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewStatus {
    Empty,
    Loading,
    Ready,
    /// The load failed; the message stands in for the document.
    Failed(String),
}

/// Result of a toolbar action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// A host override handled it.
    Delegated,
    Printed { pages: usize },
    Saved { location: String },
    Shared { file_name: String },
}

#[derive(Debug)]
struct LoadedDocument {
    name: String,
    tree: DocumentTree,
    output: BuildOutput,
    fonts: FontAvailability,
    diagnostics: LoadDiagnostics,
}

#[derive(Debug)]
struct ViewState {
    status: ViewStatus,
    document: Option<Arc<LoadedDocument>>,
    display: Option<DisplayTree>,
    zoom: ZoomState,
    search: SearchState,
    mode: LayoutMode,
    viewport_width: Option<f32>,
    fit_applied: bool,
}

impl ViewState {
    fn refresh_highlights(&mut self) {
        let (Some(doc), Some(display)) = (&self.document, &mut self.display) else {
            return;
        };
        if self.search.matches().is_empty() {
            display.clear_highlights();
        } else {
            display.apply_highlights(
                &doc.output.index,
                self.search.matches(),
                self.search.current_index(),
            );
        }
    }

    /// One-time fit for the current load. Needs both a document and a viewport.
    fn try_fit(&mut self, config: &ViewerConfig) -> Option<f32> {
        if !config.fit_to_width || self.fit_applied || self.document.is_none() {
            return None;
        }
        let viewport = self.viewport_width?;
        self.fit_applied = true;
        let zoom = self.zoom.config();
        let scale = fit_to_width(viewport, &config.padding, config.page_width, zoom.min, zoom.max);
        log::debug!("Fit-to-width: viewport {} -> zoom {}", viewport, scale);
        let changed = self.zoom.set(scale);
        self.sync_zoom();
        changed
    }

    fn sync_zoom(&mut self) {
        if let Some(display) = &mut self.display {
            display.set_zoom(self.zoom.scale());
        }
    }
}

/// Drives one view: loads documents and reacts to zoom, search and actions.
///
/// At most one load is applied at a time. A newer `load` supersedes any
/// in-flight one, whose results are discarded when they arrive.
pub struct DocumentViewer {
    config: ViewerConfig,
    parser: Arc<dyn DocumentParser>,
    fonts: FontRegistry,
    print_surface: Arc<dyn PrintSurface>,
    download_surface: Arc<dyn DownloadSurface>,
    share_surface: Arc<dyn ShareSurface>,
    callbacks: ViewerCallbacks,
    generation: AtomicU64,
    state: Mutex<ViewState>,
}

impl std::fmt::Debug for DocumentViewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentViewer")
            .field("config", &self.config)
            .field("parser", &self.parser.name())
            .field("fonts", &self.fonts)
            .field("callbacks", &self.callbacks)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl DocumentViewer {
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::default()
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn font_registry(&self) -> &FontRegistry {
        &self.fonts
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Runs a full load cycle: read, parse, register fonts, build, display.
    ///
    /// Prior state is cleared before anything is read. Errors are reported
    /// through `on_error` and the view shows them in place of the document.
    pub async fn load(&self, source: impl Into<DocumentSource>) -> Result<LoadDiagnostics, LoadError> {
        let source = source.into();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let name = source.name();
        log::info!("Loading document {} (load #{})", name, generation);

        let zoom_reset = {
            let mut state = self.state();
            state.status = ViewStatus::Loading;
            state.document = None;
            state.display = None;
            state.search.clear();
            state.fit_applied = false;
            state.zoom.reset()
        };
        if let Some(zoom) = zoom_reset {
            self.callbacks.zoom_changed(zoom);
        }

        match self.run_load(source, name, generation).await {
            Ok(doc) => self.apply(doc, generation),
            Err(e) => Err(self.fail(e, generation)),
        }
    }

    async fn run_load(
        &self,
        source: DocumentSource,
        name: String,
        generation: u64,
    ) -> Result<LoadedDocument, LoadError> {
        let bytes = source.read().await?;
        if !self.is_current(generation) {
            return Err(LoadError::Superseded);
        }

        let parser = Arc::clone(&self.parser);
        let tree = tokio::task::spawn_blocking(move || parser.parse(&bytes)).await??;
        if !self.is_current(generation) {
            return Err(LoadError::Superseded);
        }

        let report = self.fonts.register_all(&tree.fonts);
        let fonts = self.fonts.availability(&self.config.font_fallbacks);
        let output = build_with_fonts(&tree, &fonts);

        let diagnostics = LoadDiagnostics {
            document: name.clone(),
            registered_fonts: report.registered,
            failed_fonts: report.failed,
            skipped_elements: output.diagnostics.skipped_elements(),
            visual_nodes: output.node_count(),
            searchable_chars: output.index.char_len(),
            note_references: output.diagnostics.note_references.len(),
        };
        Ok(LoadedDocument {
            name,
            tree,
            output,
            fonts,
            diagnostics,
        })
    }

    fn apply(&self, doc: LoadedDocument, generation: u64) -> Result<LoadDiagnostics, LoadError> {
        let diagnostics = doc.diagnostics.clone();
        let fitted = {
            let mut state = self.state();
            // Checked under the lock so a newer load cannot interleave.
            if !self.is_current(generation) {
                log::debug!("Discarding results of superseded load #{}", generation);
                return Err(LoadError::Superseded);
            }
            let display = render(
                &doc.output.nodes,
                state.zoom.scale(),
                state.mode,
                &self.config.display_options(),
            );
            state.display = Some(display);
            state.document = Some(Arc::new(doc));
            state.status = ViewStatus::Ready;
            state.try_fit(&self.config)
        };

        log::info!(
            "Loaded {}: {} nodes, {} searchable chars, {} skipped, {} font failure(s)",
            diagnostics.document,
            diagnostics.visual_nodes,
            diagnostics.searchable_chars,
            diagnostics.skipped_elements,
            diagnostics.failed_fonts.len()
        );
        self.callbacks.loaded(&diagnostics);
        if let Some(zoom) = fitted {
            self.callbacks.zoom_changed(zoom);
        }
        Ok(diagnostics)
    }

    fn fail(&self, error: LoadError, generation: u64) -> LoadError {
        {
            let mut state = self.state();
            if !self.is_current(generation) {
                log::debug!("Load #{} failed after being superseded: {}", generation, error);
                return LoadError::Superseded;
            }
            state.status = ViewStatus::Failed(error.to_string());
        }
        log::warn!("Load failed: {}", error);
        self.callbacks.error(&error);
        error
    }

    pub fn status(&self) -> ViewStatus {
        self.state().status.clone()
    }

    pub fn diagnostics(&self) -> Option<LoadDiagnostics> {
        self.state().document.as_ref().map(|d| d.diagnostics.clone())
    }

    /// Snapshot of the current display tree.
    pub fn display(&self) -> Option<DisplayTree> {
        self.state().display.clone()
    }

    pub fn visual_nodes(&self) -> Vec<VisualNode> {
        self.state()
            .document
            .as_ref()
            .map(|d| d.output.nodes.clone())
            .unwrap_or_default()
    }

    /// Reports the viewport width. The first report after a load fits the page.
    pub fn set_viewport_width(&self, width: f32) -> Option<f32> {
        let fitted = {
            let mut state = self.state();
            state.viewport_width = Some(width);
            state.try_fit(&self.config)
        };
        if let Some(zoom) = fitted {
            self.callbacks.zoom_changed(zoom);
        }
        fitted
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.state().mode
    }

    /// Rebuilds the display tree only; visual nodes and the index are kept.
    pub fn set_layout_mode(&self, mode: LayoutMode) {
        let mut state = self.state();
        if state.mode == mode {
            return;
        }
        state.mode = mode;
        if let Some(doc) = state.document.clone() {
            state.display = Some(render(
                &doc.output.nodes,
                state.zoom.scale(),
                mode,
                &self.config.display_options(),
            ));
            state.refresh_highlights();
        }
    }

    pub fn zoom(&self) -> f32 {
        self.state().zoom.scale()
    }

    /// Sets the zoom, clamped. Returns the effective zoom.
    pub fn set_zoom(&self, value: f32) -> f32 {
        self.change_zoom(|zoom| zoom.set_user(value))
    }

    pub fn zoom_in(&self) -> f32 {
        self.change_zoom(ZoomState::zoom_in)
    }

    pub fn zoom_out(&self) -> f32 {
        self.change_zoom(ZoomState::zoom_out)
    }

    fn change_zoom(&self, op: impl FnOnce(&mut ZoomState) -> Option<f32>) -> f32 {
        let (changed, scale) = {
            let mut state = self.state();
            let changed = op(&mut state.zoom);
            if changed.is_some() {
                state.sync_zoom();
            }
            (changed, state.zoom.scale())
        };
        if let Some(zoom) = changed {
            self.callbacks.zoom_changed(zoom);
        }
        scale
    }

    /// Searches the loaded document and highlights every match.
    /// Returns the match count.
    pub fn search(&self, query: &str) -> usize {
        if !self.config.enable_search {
            log::debug!("Search is disabled");
            return 0;
        }
        let mut state = self.state();
        let Some(doc) = state.document.clone() else {
            return 0;
        };
        let count = state.search.search(&doc.output.index, query);
        state.refresh_highlights();
        count
    }

    pub fn next_match(&self) -> Option<MatchSpan> {
        let mut state = self.state();
        let span = state.search.next();
        state.refresh_highlights();
        span
    }

    pub fn previous_match(&self) -> Option<MatchSpan> {
        let mut state = self.state();
        let span = state.search.previous();
        state.refresh_highlights();
        span
    }

    pub fn current_match(&self) -> Option<(usize, MatchSpan)> {
        let state = self.state();
        state.search.current_index().zip(state.search.current())
    }

    pub fn match_count(&self) -> usize {
        self.state().search.matches().len()
    }

    /// Original text of a match in the loaded document.
    pub fn match_text(&self, span: MatchSpan) -> Option<String> {
        self.state()
            .document
            .as_ref()
            .map(|d| d.output.index.snippet(span))
    }

    pub fn clear_search(&self) {
        let mut state = self.state();
        state.search.clear();
        state.refresh_highlights();
    }

    /// Builds the content of one note on demand. References inside the
    /// note keep their labels and are not expanded.
    pub fn note_content(&self, id: &NoteId) -> Option<Vec<VisualNode>> {
        let doc = self.state().document.clone()?;
        let note = doc.tree.note(id)?;
        let output = VisualNodeBuilder::new(&doc.tree.stylesheet, &doc.fonts)
            .with_note_labels(&doc.output.diagnostics.note_references)
            .build(&note.blocks);
        Some(output.nodes)
    }

    /// Renders the export artifact. Independent of zoom and layout mode.
    pub async fn export(&self) -> Result<ExportArtifact, ActionError> {
        let doc = self
            .state()
            .document
            .clone()
            .ok_or(ActionError::NoDocument)?;
        let config = self.config.clone();
        let artifact = tokio::task::spawn_blocking(move || export_document(&doc, &config)).await??;
        Ok(artifact)
    }

    pub async fn print(&self) -> Result<ActionOutcome, ActionError> {
        if let Some(outcome) = delegate(&self.callbacks.on_print, "print") {
            return Ok(outcome);
        }
        let artifact = self.export().await?;
        self.print_surface
            .print(&self.config.document_name, &artifact.bytes)?;
        Ok(ActionOutcome::Printed {
            pages: artifact.page_count,
        })
    }

    pub async fn download(&self) -> Result<ActionOutcome, ActionError> {
        if let Some(outcome) = delegate(&self.callbacks.on_download, "download") {
            return Ok(outcome);
        }
        let artifact = self.export().await?;
        let location = self
            .download_surface
            .save(&artifact.file_name(&self.config.document_name), &artifact.bytes)?;
        Ok(ActionOutcome::Saved { location })
    }

    pub async fn share(&self) -> Result<ActionOutcome, ActionError> {
        if let Some(outcome) = delegate(&self.callbacks.on_share, "share") {
            return Ok(outcome);
        }
        let artifact = self.export().await?;
        let file_name = artifact.file_name(&self.config.document_name);
        self.share_surface.share(&file_name, &artifact.bytes)?;
        Ok(ActionOutcome::Shared { file_name })
    }
}

fn delegate(action: &Option<ActionOverride>, name: &str) -> Option<ActionOutcome> {
    let f = action.as_ref()?;
    log::debug!("Delegating {} to host override", name);
    f();
    Some(ActionOutcome::Delegated)
}

/// Body nodes at the export font size, followed by the notes section.
fn export_document(
    doc: &LoadedDocument,
    config: &ViewerConfig,
) -> Result<ExportArtifact, docview_render_core::RenderError> {
    let format = config.export.page_format();
    let tree = &doc.tree;

    let rebuilt;
    let (stylesheet, output) = if tree.stylesheet.doc_defaults.font_size.is_none()
        && format.default_font_size != docview_layout::style::DEFAULT_FONT_SIZE
    {
        let mut stylesheet = tree.stylesheet.clone();
        stylesheet.doc_defaults.font_size = Some(format.default_font_size);
        let output = VisualNodeBuilder::new(&stylesheet, &doc.fonts).build(&tree.blocks);
        rebuilt = stylesheet;
        (&rebuilt, output)
    } else {
        (&tree.stylesheet, doc.output.clone())
    };

    let mut nodes = output.nodes;
    nodes.extend(build_notes_section(
        stylesheet,
        &doc.fonts,
        tree,
        &output.diagnostics.note_references,
    ));

    PdfExportRenderer::new(format)
        .with_title(doc.name.clone())
        .render(&nodes)
}

/// Assembles a `DocumentViewer`. Every collaborator has a default.
#[derive(Default)]
pub struct ViewerBuilder {
    config: Option<ViewerConfig>,
    parser: Option<Arc<dyn DocumentParser>>,
    fonts: Option<FontRegistry>,
    print_surface: Option<Arc<dyn PrintSurface>>,
    download_surface: Option<Arc<dyn DownloadSurface>>,
    share_surface: Option<Arc<dyn ShareSurface>>,
    callbacks: ViewerCallbacks,
}

impl ViewerBuilder {
    pub fn with_config(mut self, config: ViewerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Shares an existing registry, e.g. one per process.
    pub fn with_font_registry(mut self, fonts: FontRegistry) -> Self {
        self.fonts = Some(fonts);
        self
    }

    pub fn with_font_registrar(mut self, registrar: Arc<dyn FontRegistrar>) -> Self {
        self.fonts = Some(FontRegistry::new(registrar));
        self
    }

    pub fn with_print_surface(mut self, surface: Arc<dyn PrintSurface>) -> Self {
        self.print_surface = Some(surface);
        self
    }

    pub fn with_download_surface(mut self, surface: Arc<dyn DownloadSurface>) -> Self {
        self.download_surface = Some(surface);
        self
    }

    pub fn with_share_surface(mut self, surface: Arc<dyn ShareSurface>) -> Self {
        self.share_surface = Some(surface);
        self
    }

    /// Uses one object for print, download and share.
    pub fn with_surfaces<S>(self, surface: Arc<S>) -> Self
    where
        S: PrintSurface + DownloadSurface + ShareSurface + 'static,
    {
        self.with_print_surface(surface.clone())
            .with_download_surface(surface.clone())
            .with_share_surface(surface)
    }

    pub fn with_callbacks(mut self, callbacks: ViewerCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn build(self) -> Result<DocumentViewer, ConfigError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let fonts = self.fonts.unwrap_or_else(|| {
            FontRegistry::new(Arc::new(InMemoryFontRegistrar::with_builtin(
                BUILTIN_FAMILIES,
            )))
        });
        let state = ViewState {
            status: ViewStatus::Empty,
            document: None,
            display: None,
            zoom: ZoomState::new(config.zoom.clone()),
            search: SearchState::default(),
            mode: config.page_mode,
            viewport_width: None,
            fit_applied: false,
        };
        Ok(DocumentViewer {
            parser: self.parser.unwrap_or_else(|| Arc::new(JsonDocumentParser)),
            fonts,
            print_surface: self.print_surface.unwrap_or_else(|| Arc::new(NoSurface)),
            download_surface: self.download_surface.unwrap_or_else(|| Arc::new(NoSurface)),
            share_surface: self.share_surface.unwrap_or_else(|| Arc::new(NoSurface)),
            callbacks: self.callbacks,
            generation: AtomicU64::new(0),
            state: Mutex::new(state),
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docview_traits::RecordingSurface;

    const DOC: &str = r#"{ "blocks": [
        { "type": "paragraph", "children": [
            { "type": "text", "text": "Alpha beta" },
            { "type": "noteReference", "id": "1" }
        ]},
        { "type": "paragraph", "children": [{ "type": "text", "text": "beta gamma" }] }
    ], "notes": { "1": { "blocks": [
        { "type": "paragraph", "children": [{ "type": "text", "text": "A note" }] }
    ]}}}"#;

    fn viewer() -> DocumentViewer {
        DocumentViewer::builder()
            .with_surfaces(Arc::new(RecordingSurface::new()))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn load_builds_display_and_index() {
        let viewer = viewer();
        assert_eq!(viewer.status(), ViewStatus::Empty);
        let diagnostics = viewer.load(DOC.as_bytes().to_vec()).await.unwrap();
        assert_eq!(viewer.status(), ViewStatus::Ready);
        assert_eq!(diagnostics.note_references, 1);
        assert_eq!(diagnostics.searchable_chars, "Alpha betabeta gamma".chars().count());
        assert!(viewer.display().is_some());
    }

    #[tokio::test]
    async fn search_highlights_current_match() {
        let viewer = viewer();
        viewer.load(DOC.as_bytes().to_vec()).await.unwrap();
        assert_eq!(viewer.search("BETA"), 2);
        viewer.next_match();
        let display = viewer.display().unwrap();
        let current: Vec<_> = display
            .spans()
            .into_iter()
            .flat_map(|s| s.highlights().to_vec())
            .filter(|h| h.current)
            .collect();
        assert_eq!(current.len(), 1);
        assert_eq!((current[0].start, current[0].len), (0, 4));
    }

    #[tokio::test]
    async fn note_content_is_built_on_demand() {
        let viewer = viewer();
        assert!(viewer.note_content(&NoteId::new("1")).is_none());
        viewer.load(DOC.as_bytes().to_vec()).await.unwrap();
        let nodes = viewer.note_content(&NoteId::new("1")).unwrap();
        assert_eq!(docview_layout::visual::flatten_text(&nodes), "A note");
        assert!(viewer.note_content(&NoteId::new("2")).is_none());
    }

    #[tokio::test]
    async fn export_without_document_fails() {
        let viewer = viewer();
        assert!(matches!(viewer.export().await, Err(ActionError::NoDocument)));
    }
}
