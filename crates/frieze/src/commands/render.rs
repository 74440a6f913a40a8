//! Render command - one or more update cycles over a template

use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use frieze::config::load_config;
use frieze::relief::{Map, Value, ValueExt};
use frieze::{FriezeError, Result, View};

#[derive(Args)]
pub struct RenderArgs {
    /// Template file to render
    pub template: PathBuf,

    /// JSON object whose members seed the root scope
    #[arg(short, long)]
    pub scope: Option<PathBuf>,

    /// JSON object assigned into the root scope before one more update (repeatable)
    #[arg(long)]
    pub then: Vec<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the HTML here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let config = load_config(args.config.as_deref());
    let markup = read(&args.template)?;

    let mut view = View::new(&markup, config.render)?;
    if let Some(path) = &args.scope {
        view.assign(read_scope(path)?)?;
    }
    view.update()?;

    for (cycle, path) in args.then.iter().enumerate() {
        view.assign(read_scope(path)?)?;
        view.update()?;
        debug!(cycle = cycle + 1, path = %path.display(), "applied update");
    }

    let html = view.html();
    match &args.output {
        Some(path) => {
            fs::write(path, &html).map_err(|source| FriezeError::Io {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), bytes = html.len(), "wrote output");
        }
        None => println!("{html}"),
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| FriezeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_scope(path: &Path) -> Result<Map<String, Value>> {
    let content = read(path)?;
    let value: Value = serde_json::from_str(&content).map_err(|source| FriezeError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(members) => Ok(members),
        other => Err(FriezeError::ScopeShape {
            path: path.to_path_buf(),
            found: other.type_name(),
        }),
    }
}
