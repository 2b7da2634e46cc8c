//! `rubicon-style` - resolve a component style from a YAML rule source.
//!
//! Loads a stylesheet, seals it into a store and prints the resolution for
//! one component path as JSON:
//!
//! ```text
//! rubicon-style theme.yaml Card --modifier raised --child Text.muted --driver 40 --height 200
//! ```
//!
//! `--config store.json` reads a store configuration such as
//! `{ "max_inclusion_depth": 16 }`; `--max-depth` overrides it.
//!
//! Set `RUST_LOG=rubicon_style=debug` to see registration and resolution
//! events on stderr.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rubicon_style::{
    AnimationCatalog, AnimationContext, FragmentStore, Layout, PathSegment, ResolutionContext,
    StoreConfig, StyleMap,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Resolve a component style from a YAML rule source
#[derive(Debug, Parser)]
#[command(name = "rubicon-style")]
#[command(version)]
#[command(about = "Resolve a component style from a YAML rule source")]
struct Cli {
    /// Stylesheet to load
    source: PathBuf,

    /// Root component tag
    root: String,

    /// Active modifier on the root component (repeatable)
    #[arg(short, long = "modifier", value_name = "NAME")]
    modifiers: Vec<String>,

    /// Nested child segment, as TAG or TAG.mod1,mod2 (repeatable, outermost first)
    #[arg(short, long = "child", value_name = "SEGMENT", value_parser = parse_segment)]
    children: Vec<PathSegment>,

    /// Driver value used to evaluate bound animations
    #[arg(long, default_value_t = 0.0)]
    driver: f64,

    /// Layout width handed to animations
    #[arg(long, default_value_t = 0.0)]
    width: f64,

    /// Layout height handed to animations
    #[arg(long, default_value_t = 0.0)]
    height: f64,

    /// Store configuration file (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum inclusion nesting followed during expansion [default: 64]
    #[arg(long)]
    max_depth: Option<usize>,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,
}

#[derive(Debug, Serialize)]
struct Output {
    path: String,
    style: StyleMap,
    animations: BTreeMap<String, StyleMap>,
}

fn parse_segment(raw: &str) -> Result<PathSegment, String> {
    PathSegment::parse(raw).ok_or_else(|| {
        format!(
            "'{}' is not a component segment (expected TAG or TAG.modifier,other)",
            raw
        )
    })
}

impl Cli {
    fn context(&self) -> ResolutionContext {
        let root = PathSegment::new(&self.root).modifiers(&self.modifiers);
        self.children
            .iter()
            .cloned()
            .fold(ResolutionContext::new(root), ResolutionContext::child)
    }
}

fn load_config(path: &Path) -> Result<StoreConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn run(cli: &Cli) -> Result<Output> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => StoreConfig::default(),
    };
    if let Some(depth) = cli.max_depth {
        config.max_inclusion_depth = depth;
    }

    let mut store = FragmentStore::with_config(config);
    store
        .load_file(&cli.source, &AnimationCatalog::with_builtins())
        .with_context(|| format!("loading {}", cli.source.display()))?;
    let store = store.seal().context("sealing fragment store")?;

    let context = cli.context();
    tracing::debug!(path = %context, fragments = store.len(), "resolving");
    let resolution = store
        .resolve(&context)
        .with_context(|| format!("resolving {}", context))?;

    let animation_cx = AnimationContext::new(Layout::sized(cli.width, cli.height));
    let animations = resolution.evaluate_animations(cli.driver, &animation_cx);

    Ok(Output {
        path: context.to_string(),
        style: resolution.style,
        animations,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = run(&cli)?;

    let json = if cli.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubicon_style::StyleValue;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const THEME: &str = r#"
base:
  color: red
  padding: 4
Card:
  $include: base
  padding: 8
  .raised:
    elevation: 2
  "*":
    marginBottom: 10
  Text.muted:
    color: grey
  $animations:
    fade:
      kind: interpolate
      property: opacity
      inputRange: [0, 1]
      outputRange: [1, 0]
      relativeTo: height
"#;

    fn theme_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", THEME).unwrap();
        file
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rubicon-style").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_resolve_root_with_modifier() {
        let file = theme_file();
        let path = file.path().to_str().unwrap();
        let output = run(&cli(&[path, "Card", "--modifier", "raised"])).unwrap();

        assert_eq!(output.path, "Card.raised");
        assert_eq!(output.style["padding"], StyleValue::from(8));
        assert_eq!(output.style["elevation"], StyleValue::from(2));
    }

    #[test]
    fn test_resolve_child_segment() {
        let file = theme_file();
        let path = file.path().to_str().unwrap();
        let output = run(&cli(&[path, "Card", "--child", "Text.muted"])).unwrap();

        assert_eq!(output.style["color"], StyleValue::from("grey"));
        assert_eq!(output.style["marginBottom"], StyleValue::from(10));
        assert!(output.animations.is_empty());
    }

    #[test]
    fn test_animations_are_evaluated() {
        let file = theme_file();
        let path = file.path().to_str().unwrap();
        let output = run(&cli(&[path, "Card", "--driver", "50", "--height", "200"])).unwrap();

        assert_eq!(output.animations["fade"]["opacity"], StyleValue::from(0.75));
    }

    #[test]
    fn test_config_file_sets_depth_limit() {
        let file = theme_file();
        let path = file.path().to_str().unwrap();
        let mut config = NamedTempFile::new().unwrap();
        write!(config, r#"{{ "max_inclusion_depth": 1 }}"#).unwrap();
        let config_path = config.path().to_str().unwrap();

        let err = run(&cli(&[path, "Card", "--config", config_path])).unwrap_err();
        assert!(err.to_string().contains("resolving Card"));

        let output = run(&cli(&[path, "Card", "--config", config_path, "--max-depth", "8"])).unwrap();
        assert_eq!(output.style["color"], StyleValue::from("red"));
    }

    #[test]
    fn test_malformed_config_reports_context() {
        let file = theme_file();
        let path = file.path().to_str().unwrap();
        let mut config = NamedTempFile::new().unwrap();
        write!(config, "max_inclusion_depth = 1").unwrap();
        let config_path = config.path().to_str().unwrap();

        let err = run(&cli(&[path, "Card", "--config", config_path])).unwrap_err();
        assert!(err.to_string().starts_with("parsing config"));
    }

    #[test]
    fn test_invalid_child_segment_is_rejected() {
        let result = Cli::try_parse_from(["rubicon-style", "x.yaml", "Card", "--child", "lower"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_source_reports_context() {
        let err = run(&cli(&["/nonexistent/theme.yaml", "Card"])).unwrap_err();
        assert!(err.to_string().contains("loading /nonexistent/theme.yaml"));
    }
}
