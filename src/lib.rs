//! Parser for the markdown subset used in post bodies.
//!
//! Raw text is split into [`Block`]s line by line; the text of every block
//! except code blocks is then split into flat [`InlineNode`]s. Rendering the
//! tree is left to the caller.

mod block;
mod config;
mod inline;
mod parser;

pub use block::{Block, InlineNode, List, inline_text};
pub use config::{BlocksConfig, Config, ConfigError, InlineConfig};
pub use inline::{MatchOrder, tokenize, tokenize_with};
pub use parser::segment;

/// Parse a post body into blocks using the default config.
pub fn parse_document(raw: &str) -> Vec<Block> {
    parse_document_with_config(raw, &Config::compiled_default())
}

/// Parse a post body into blocks with a custom config.
pub fn parse_document_with_config(raw: &str, config: &Config) -> Vec<Block> {
    parser::parse(raw, config)
}
