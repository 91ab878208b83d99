use clap::Parser;
use docview::layout::FontdbRegistrar;
use docview::{
    ActionError, ActionOutcome, ConfigError, DirectorySurface, DocumentSource, DocumentViewer,
    LoadError, ViewerCallbacks, ViewerConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("Invalid argument: {0}")]
    Argument(String),
}

/// Loads a JSON document tree, prints a summary and optionally searches and exports it.
#[derive(Parser, Debug)]
#[command(name = "docview", version)]
struct Args {
    /// Document tree in JSON form.
    document: PathBuf,

    /// Viewer configuration (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the PDF export to this path.
    #[arg(long)]
    export: Option<PathBuf>,

    /// Case-insensitive text to search for.
    #[arg(long)]
    search: Option<String>,

    /// Viewport width in logical pixels, used for fit-to-width.
    #[arg(long)]
    viewport_width: Option<f32>,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_json_file(path)?,
        None => ViewerConfig::default(),
    };

    let out_dir = match &args.export {
        Some(path) => {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .ok_or_else(|| CliError::Argument(format!("bad export path '{}'", path.display())))?;
            config.document_name = stem;
            path.parent().map(PathBuf::from).unwrap_or_default()
        }
        None => PathBuf::from("."),
    };

    let registrar = Arc::new(FontdbRegistrar::new().with_system_fonts());
    let callbacks = ViewerCallbacks::new()
        .on_zoom_changed(|zoom| log::info!("Zoom changed to {:.2}", zoom));
    let viewer = DocumentViewer::builder()
        .with_config(config)
        .with_font_registrar(registrar)
        .with_surfaces(Arc::new(DirectorySurface::new(out_dir)))
        .with_callbacks(callbacks)
        .build()?;

    let diagnostics = viewer
        .load(DocumentSource::Path(args.document.clone()))
        .await?;
    println!("Loaded {}", args.document.display());
    println!("  visual nodes:      {}", diagnostics.visual_nodes);
    println!("  searchable chars:  {}", diagnostics.searchable_chars);
    println!("  skipped elements:  {}", diagnostics.skipped_elements);
    println!("  note references:   {}", diagnostics.note_references);
    println!("  embedded fonts:    {}", diagnostics.registered_fonts.len());
    for (family, error) in &diagnostics.failed_fonts {
        println!("  font fallback:     {} ({})", family, error);
    }

    if let Some(width) = args.viewport_width {
        viewer.set_viewport_width(width);
        println!("Zoom: {:.2}", viewer.zoom());
    }

    if let Some(query) = &args.search {
        let count = viewer.search(query);
        println!("Search '{}': {} match(es)", query, count);
        for _ in 0..count {
            if let Some((i, span)) = viewer.current_match() {
                let text = viewer.match_text(span).unwrap_or_default();
                println!("  #{} at {}: {:?}", i + 1, span.start, text);
            }
            viewer.next_match();
        }
    }

    if args.export.is_some() {
        match viewer.download().await? {
            ActionOutcome::Saved { location } => println!("Exported to {}", location),
            other => println!("Export: {:?}", other),
        }
    }
    Ok(())
}
