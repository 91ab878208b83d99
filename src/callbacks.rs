use crate::error::LoadError;
use crate::viewer::LoadDiagnostics;
use std::fmt;
use std::sync::Arc;

pub type LoadedCallback = Arc<dyn Fn(&LoadDiagnostics) + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(&LoadError) + Send + Sync>;
pub type ZoomCallback = Arc<dyn Fn(f32) + Send + Sync>;
/// Replaces a toolbar action's default behaviour entirely.
pub type ActionOverride = Arc<dyn Fn() + Send + Sync>;

/// Host hooks. All are optional; missing action overrides fall back to
/// exporting and delivering to the configured surface.
#[derive(Clone, Default)]
pub struct ViewerCallbacks {
    pub on_loaded: Option<LoadedCallback>,
    pub on_error: Option<ErrorCallback>,
    pub on_zoom_changed: Option<ZoomCallback>,
    pub on_print: Option<ActionOverride>,
    pub on_download: Option<ActionOverride>,
    pub on_share: Option<ActionOverride>,
}

impl ViewerCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_loaded(mut self, f: impl Fn(&LoadDiagnostics) + Send + Sync + 'static) -> Self {
        self.on_loaded = Some(Arc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&LoadError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    pub fn on_zoom_changed(mut self, f: impl Fn(f32) + Send + Sync + 'static) -> Self {
        self.on_zoom_changed = Some(Arc::new(f));
        self
    }

    pub fn on_print(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_print = Some(Arc::new(f));
        self
    }

    pub fn on_download(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_download = Some(Arc::new(f));
        self
    }

    pub fn on_share(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_share = Some(Arc::new(f));
        self
    }

    pub(crate) fn loaded(&self, diagnostics: &LoadDiagnostics) {
        if let Some(f) = &self.on_loaded {
            f(diagnostics);
        }
    }

    pub(crate) fn error(&self, error: &LoadError) {
        if let Some(f) = &self.on_error {
            f(error);
        }
    }

    pub(crate) fn zoom_changed(&self, zoom: f32) {
        if let Some(f) = &self.on_zoom_changed {
            f(zoom);
        }
    }
}

impl fmt::Debug for ViewerCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewerCallbacks")
            .field("on_loaded", &self.on_loaded.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_zoom_changed", &self.on_zoom_changed.is_some())
            .field("on_print", &self.on_print.is_some())
            .field("on_download", &self.on_download.is_some())
            .field("on_share", &self.on_share.is_some())
            .finish()
    }
}
