use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Block, InlineNode, List};
use crate::config::Config;
use crate::inline::{MatchOrder, tokenize_with};

const FENCE: &str = "```";

static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("Invalid image regex"));
static ORDERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s").expect("Invalid ordered list regex"));

/// What a single line is, judged without any surrounding context.
///
/// Fences are not represented here: they are checked first, and inside a
/// code block every other line is content regardless of its class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineClass<'a> {
    Blank,
    Heading { level: u8, rest: &'a str },
    Quote(&'a str),
    Image { alt: &'a str, url: &'a str },
    Bullet(&'a str),
    Numbered(&'a str),
    Text(&'a str),
}

pub(crate) fn classify(line: &str) -> LineClass<'_> {
    if line.trim().is_empty() {
        return LineClass::Blank;
    }
    for (level, prefix) in [(1, "# "), (2, "## "), (3, "### ")] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return LineClass::Heading { level, rest };
        }
    }
    if let Some(rest) = line.strip_prefix("> ") {
        return LineClass::Quote(rest);
    }
    if let Some(caps) = IMAGE.captures(line) {
        let group = |i| caps.get(i).map_or("", |m| m.as_str());
        return LineClass::Image {
            alt: group(1),
            url: group(2),
        };
    }
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return LineClass::Bullet(rest);
    }
    if let Some(marker) = ORDERED_MARKER.find(line) {
        return LineClass::Numbered(&line[marker.end()..]);
    }
    LineClass::Text(line)
}

/// Language tag of a fence line, or `None` if the line is not a fence.
fn fence_info(line: &str) -> Option<&str> {
    line.strip_prefix(FENCE).map(str::trim)
}

/// Parse text into blocks using the compiled default config.
pub fn segment(text: &str) -> Vec<Block> {
    parse(text, &Config::compiled_default())
}

/// Parse text into blocks, one line at a time.
pub fn parse(text: &str, config: &Config) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut state = ParseState::new(config);

    for line in text.split('\n') {
        process_line(line, &mut state, &mut blocks);
    }
    finish(state, &mut blocks);

    log::debug!("segmented {} lines into {} blocks", text.split('\n').count(), blocks.len());
    blocks
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ListKind {
    Ordered,
    Unordered,
}

#[derive(Debug)]
struct ParseState<'a> {
    // Code block state
    in_code_block: bool,
    code_language: String,
    code_lines: Vec<&'a str>,

    // Raw item text, tokenized when the list is flushed
    list_items: Vec<&'a str>,
    list_kind: Option<ListKind>,

    order: MatchOrder,
    keep_unterminated_code: bool,
}

impl ParseState<'_> {
    fn new(config: &Config) -> Self {
        Self {
            in_code_block: false,
            code_language: String::new(),
            code_lines: Vec::new(),
            list_items: Vec::new(),
            list_kind: None,
            order: config.inline.match_order(),
            keep_unterminated_code: config.blocks.keep_unterminated_code,
        }
    }

    fn tokenize(&self, text: &str) -> Vec<InlineNode> {
        tokenize_with(text, self.order)
    }
}

fn process_line<'a>(line: &'a str, state: &mut ParseState<'a>, blocks: &mut Vec<Block>) {
    if let Some(info) = fence_info(line) {
        if state.in_code_block {
            close_code_block(state, blocks);
        } else {
            flush_list(state, blocks);
            log::trace!("code fence opened (language {info:?})");
            state.in_code_block = true;
            state.code_language = info.to_string();
        }
        return;
    }

    if state.in_code_block {
        state.code_lines.push(line);
        return;
    }

    match classify(line) {
        LineClass::Blank => flush_list(state, blocks),
        LineClass::Heading { level, rest } => {
            flush_list(state, blocks);
            let inline = state.tokenize(rest);
            blocks.push(Block::Heading { level, inline });
        }
        LineClass::Quote(rest) => {
            flush_list(state, blocks);
            let inline = state.tokenize(rest);
            blocks.push(Block::Blockquote { inline });
        }
        // The image replaces the whole line, surrounding text included.
        LineClass::Image { alt, url } => {
            flush_list(state, blocks);
            blocks.push(Block::Image {
                alt: alt.to_string(),
                url: url.to_string(),
            });
        }
        LineClass::Bullet(rest) => push_list_item(ListKind::Unordered, rest, state, blocks),
        LineClass::Numbered(rest) => push_list_item(ListKind::Ordered, rest, state, blocks),
        LineClass::Text(text) => {
            flush_list(state, blocks);
            let inline = state.tokenize(text);
            blocks.push(Block::Paragraph { inline });
        }
    }
}

fn push_list_item<'a>(
    kind: ListKind,
    item: &'a str,
    state: &mut ParseState<'a>,
    blocks: &mut Vec<Block>,
) {
    if state.list_kind.is_some_and(|pending| pending != kind) {
        flush_list(state, blocks);
    }
    state.list_kind = Some(kind);
    state.list_items.push(item);
}

fn flush_list(state: &mut ParseState<'_>, blocks: &mut Vec<Block>) {
    let kind = state.list_kind.take();
    let items = std::mem::take(&mut state.list_items);
    if items.is_empty() {
        return;
    }

    log::trace!("flushing {kind:?} list with {} items", items.len());
    let items = items.into_iter().map(|item| state.tokenize(item)).collect();
    blocks.push(Block::List(List {
        ordered: kind == Some(ListKind::Ordered),
        items,
    }));
}

fn close_code_block(state: &mut ParseState<'_>, blocks: &mut Vec<Block>) {
    state.in_code_block = false;
    let content = std::mem::take(&mut state.code_lines).join("\n");
    let language = std::mem::take(&mut state.code_language);
    log::trace!("code fence closed");
    blocks.push(Block::CodeBlock { language, content });
}

fn finish(mut state: ParseState<'_>, blocks: &mut Vec<Block>) {
    flush_list(&mut state, blocks);

    if state.in_code_block {
        if state.keep_unterminated_code {
            close_code_block(&mut state, blocks);
        } else {
            log::warn!(
                "dropping {} lines of unterminated code block",
                state.code_lines.len()
            );
        }
    }
}
