use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use postmd::{Block, Config, ConfigError, inline_text};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "postmd")]
#[command(about = "Parse a post body into its block tree")]
struct Cli {
    /// Input Markdown file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Parser config file (defaults to the bundled config)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Debug,
    Outline,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to write stdout: {0}")]
    Stdout(#[source] io::Error),
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let markdown = match &cli.input {
        Some(path) => fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        })?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(CliError::Stdin)?;
            buf
        }
    };

    let config = match &cli.config {
        Some(path) => Config::try_load(path)?,
        None => Config::compiled_default(),
    };

    let blocks = postmd::parse_document_with_config(&markdown, &config);
    log::info!("parsed {} blocks", blocks.len());

    let rendered = match cli.format {
        Format::Json => {
            let mut json = serde_json::to_string_pretty(&blocks)?;
            json.push('\n');
            json
        }
        Format::Debug => format!("{:#?}\n", blocks),
        Format::Outline => outline(&blocks),
    };

    match cli.output {
        Some(path) => fs::write(&path, rendered).map_err(|source| CliError::Write { path, source }),
        None => io::stdout()
            .write_all(rendered.as_bytes())
            .map_err(CliError::Stdout),
    }
}

/// One summary line per block.
fn outline(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        let line = match block {
            Block::Heading { level, inline } => format!("H{} {}", level, inline_text(inline)),
            Block::Paragraph { inline } => format!("paragraph {:.40}", inline_text(inline)),
            Block::CodeBlock { language, content } => {
                let language = if language.is_empty() { "-" } else { language.as_str() };
                format!("code {} ({} lines)", language, content.lines().count())
            }
            Block::List(list) => format!(
                "list ({}, {} items)",
                if list.ordered { "ordered" } else { "unordered" },
                list.items.len()
            ),
            Block::Blockquote { inline } => format!("quote {:.40}", inline_text(inline)),
            Block::Image { alt, url } => format!("image {:?} -> {}", alt, url),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn outline_summarizes_each_block() {
        let blocks = postmd::parse_document(
            "## Intro to `x`\n\n- a\n- b\n1. c\n```sh\nls\npwd\n```\n> **note** this\n![logo](l.png)",
        );
        assert_eq!(
            outline(&blocks),
            "H2 Intro to x\n\
             list (unordered, 2 items)\n\
             list (ordered, 1 items)\n\
             code sh (2 lines)\n\
             quote note this\n\
             image \"logo\" -> l.png\n"
        );
    }

    #[test]
    fn outline_truncates_long_paragraphs() {
        let line = "x".repeat(60);
        let blocks = postmd::parse_document(&line);
        assert_eq!(outline(&blocks), format!("paragraph {}\n", "x".repeat(40)));
    }

    #[test]
    fn cli_parses_format_flag() {
        let cli = Cli::try_parse_from(["postmd", "post.md", "--format", "outline"]).unwrap();
        assert!(matches!(cli.format, Format::Outline));
        assert_eq!(cli.input, Some(PathBuf::from("post.md")));
        assert!(cli.config.is_none());
    }
}
