//! Mask preview binary.
//!
//! Reads a file, applies the configured masks through a headless host and prints the text as an
//! editor would draw it. Carets can be placed to check which matches are revealed.

use std::path::PathBuf;

use clap::Parser;
use mask_core::{
    CursorStyle, HeadlessHost, MaskConfiguration, MaskDefinition, MaskError, MaskRegistry,
    MaskSettings, PatternDefinition, Position, Selection,
};
use mask_core_lang::language_id_for_path;
use tracing::{debug, info};

/// Preview command line arguments.
#[derive(Parser, Debug)]
#[command(name = "mask-preview")]
#[command(about = "Print a file the way the masking engine would render it")]
struct Args {
    /// File to render
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// JSON mask configuration
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Extra mask as PATTERN=TEXT (split at the last '='), applied to every language
    #[arg(short, long = "mask", value_name = "PATTERN=TEXT", value_parser = parse_inline_mask)]
    masks: Vec<PatternDefinition>,

    /// Language id of the file (guessed from the extension by default)
    #[arg(short, long)]
    language: Option<String>,

    /// Caret as 1-based LINE:COLUMN; repeat for multiple carets. With none, every match is masked
    #[arg(long = "cursor", value_name = "LINE:COLUMN", value_parser = parse_position)]
    cursors: Vec<Position>,

    /// Caret shape: line, line-thin, block, block-outline, underline, underline-thin
    #[arg(long, default_value = "line", value_parser = parse_cursor_style)]
    cursor_style: CursorStyle,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    setup_tracing(args.verbose);

    let text = std::fs::read_to_string(&args.file)?;
    let language = args
        .language
        .unwrap_or_else(|| language_id_for_path(&args.file.to_string_lossy()).to_string());
    debug!(file = %args.file.display(), %language, "opening document");

    let configured = match &args.config {
        Some(path) => MaskConfiguration::from_path(path)?.masks,
        None => Vec::new(),
    };
    info!(masks = configured.len(), inline = args.masks.len(), "loaded masks");

    let mut host = HeadlessHost::new();
    host.set_mask_configuration(configured);
    host.set_cursor_style(args.cursor_style);
    let doc = host.open_document(&text, language);
    let editor = host.open_editor(doc)?;
    host.set_selections(
        editor,
        args.cursors.into_iter().map(Selection::caret).collect(),
    )?;

    let mut registry = MaskRegistry::activate(&mut host, MaskSettings::default());
    if !args.masks.is_empty() {
        registry.add_additional_masks(&mut host, vec![MaskDefinition::new("*", args.masks)]);
    }
    let stats = registry.render_editor(&mut host, editor);
    info!(masked = stats.masked, revealed = stats.revealed, "rendered");

    let rendered = host
        .render_text(editor)
        .ok_or(MaskError::EditorNotFound(editor))?;
    print!("{rendered}");
    Ok(())
}

fn setup_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();
}

fn parse_position(s: &str) -> Result<Position, String> {
    let (line, column) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COLUMN, got '{s}'"))?;
    let line: usize = line
        .trim()
        .parse()
        .map_err(|e| format!("invalid line '{line}': {e}"))?;
    let column: usize = column
        .trim()
        .parse()
        .map_err(|e| format!("invalid column '{column}': {e}"))?;
    if line == 0 || column == 0 {
        return Err("line and column are 1-based".to_string());
    }
    Ok(Position::new(line - 1, column - 1))
}

fn parse_inline_mask(s: &str) -> Result<PatternDefinition, String> {
    let (pattern, text) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected PATTERN=TEXT, got '{s}'"))?;
    if pattern.is_empty() {
        return Err("empty pattern".to_string());
    }
    Ok(PatternDefinition::replace_with(pattern, text))
}

fn parse_cursor_style(s: &str) -> Result<CursorStyle, MaskError> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mask_core::Replacement;

    #[test]
    fn test_parse_position_is_one_based() {
        assert_eq!(parse_position("1:1").unwrap(), Position::new(0, 0));
        assert_eq!(parse_position("3: 7").unwrap(), Position::new(2, 6));
        assert!(parse_position("0:1").is_err());
        assert!(parse_position("12").is_err());
        assert!(parse_position("a:b").is_err());
    }

    #[test]
    fn test_parse_inline_mask_splits_at_last_equals() {
        let mask = parse_inline_mask("a==b=≠").unwrap();
        assert_eq!(mask.pattern, "a==b");
        assert_eq!(mask.replace, Some(Replacement::Text("≠".to_string())));
        assert!(parse_inline_mask("=x").is_err());
        assert!(parse_inline_mask("nothing").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "mask-preview",
            "notes.env",
            "--mask",
            r"secret\d+=***",
            "--cursor",
            "2:4",
            "--cursor-style",
            "block",
        ])
        .unwrap();
        assert_eq!(args.file, PathBuf::from("notes.env"));
        assert_eq!(args.masks.len(), 1);
        assert_eq!(args.cursors, vec![Position::new(1, 3)]);
        assert_eq!(args.cursor_style, CursorStyle::Block);
        assert!(args.language.is_none());

        assert!(
            Args::try_parse_from(["mask-preview", "f.txt", "--cursor-style", "beam"]).is_err()
        );
    }
}
