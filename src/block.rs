use serde::Serialize;

/// Inline text spans with formatting.
///
/// Captured values are stored literally: a `Bold` holding `` `x` `` is bold
/// text with backticks in it, never a nested code span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InlineNode {
    Text(String),
    Bold(String),
    Code(String),
    Link { label: String, url: String },
}

impl InlineNode {
    /// The literal characters a reader sees for this span.
    pub fn text(&self) -> &str {
        match self {
            InlineNode::Text(value) | InlineNode::Bold(value) | InlineNode::Code(value) => value,
            InlineNode::Link { label, .. } => label,
        }
    }
}

/// Flatten a run of inline nodes to plain text.
pub fn inline_text(nodes: &[InlineNode]) -> String {
    nodes.iter().map(InlineNode::text).collect()
}

/// A list (ordered or unordered). Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<Vec<InlineNode>>,
}

/// Block-level elements, in source line order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        inline: Vec<InlineNode>,
    },
    Paragraph {
        inline: Vec<InlineNode>,
    },
    CodeBlock {
        /// Trimmed text after the opening fence, empty when absent.
        language: String,
        content: String,
    },
    List(List),
    Blockquote {
        inline: Vec<InlineNode>,
    },
    Image {
        alt: String,
        url: String,
    },
}
