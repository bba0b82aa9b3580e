use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::block::InlineNode;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("Invalid bold regex"));
static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("Invalid code regex"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("Invalid link regex"));

/// How the tokenizer picks the next span when several patterns match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchOrder {
    /// Try bold, then code, then link, each against the whole remaining text.
    /// Whatever precedes the chosen match becomes one opaque `Text` node, so
    /// `` `a` **b** `` yields no `Code` node.
    #[default]
    Priority,
    /// Take the match that starts first; ties go bold, code, link.
    Leftmost,
}

#[derive(Debug, Clone, Copy)]
enum Pattern {
    Bold,
    Code,
    Link,
}

impl Pattern {
    const ALL: [Pattern; 3] = [Pattern::Bold, Pattern::Code, Pattern::Link];

    fn regex(self) -> &'static Regex {
        match self {
            Pattern::Bold => &BOLD,
            Pattern::Code => &CODE,
            Pattern::Link => &LINK,
        }
    }

    fn node(self, caps: &Captures<'_>) -> InlineNode {
        let group = |i| caps.get(i).map_or("", |m| m.as_str()).to_string();
        match self {
            Pattern::Bold => InlineNode::Bold(group(1)),
            Pattern::Code => InlineNode::Code(group(1)),
            Pattern::Link => InlineNode::Link {
                label: group(1),
                url: group(2),
            },
        }
    }
}

/// A matched span inside the remaining text.
struct Found {
    start: usize,
    end: usize,
    node: InlineNode,
}

fn find(pattern: Pattern, s: &str) -> Option<Found> {
    let caps = pattern.regex().captures(s)?;
    let whole = caps.get(0)?;
    Some(Found {
        start: whole.start(),
        end: whole.end(),
        node: pattern.node(&caps),
    })
}

fn next_match(s: &str, order: MatchOrder) -> Option<Found> {
    let mut candidates = Pattern::ALL.into_iter().filter_map(|p| find(p, s));
    match order {
        MatchOrder::Priority => candidates.next(),
        MatchOrder::Leftmost => candidates.min_by_key(|found| found.start),
    }
}

/// Tokenize a block's raw text into flat inline nodes.
pub fn tokenize(text: &str) -> Vec<InlineNode> {
    tokenize_with(text, MatchOrder::Priority)
}

/// Tokenize with an explicit match order.
///
/// Each round consumes one matched span plus everything before it; the text
/// before the match is never re-scanned. An empty input yields no nodes.
pub fn tokenize_with(text: &str, order: MatchOrder) -> Vec<InlineNode> {
    let mut nodes = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        let Some(found) = next_match(remaining, order) else {
            nodes.push(InlineNode::Text(remaining.to_string()));
            break;
        };
        if found.start > 0 {
            nodes.push(InlineNode::Text(remaining[..found.start].to_string()));
        }
        nodes.push(found.node);
        remaining = &remaining[found.end..];
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(s: &str) -> InlineNode {
        InlineNode::Text(s.to_string())
    }

    fn bold(s: &str) -> InlineNode {
        InlineNode::Bold(s.to_string())
    }

    fn code(s: &str) -> InlineNode {
        InlineNode::Code(s.to_string())
    }

    fn link(label: &str, url: &str) -> InlineNode {
        InlineNode::Link {
            label: label.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn plain_text_is_one_node() {
        assert_eq!(tokenize("hello world"), vec![text("hello world")]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(tokenize(""), vec![]);
    }

    #[rstest]
    #[case("**bold**", vec![bold("bold")])]
    #[case("`code`", vec![code("code")])]
    #[case("[label](http://x)", vec![link("label", "http://x")])]
    #[case("a **b** c", vec![text("a "), bold("b"), text(" c")])]
    #[case("a `b` c", vec![text("a "), code("b"), text(" c")])]
    #[case("see [docs](/d) now", vec![text("see "), link("docs", "/d"), text(" now")])]
    fn single_span(#[case] input: &str, #[case] expected: Vec<InlineNode>) {
        assert_eq!(tokenize(input), expected);
    }

    #[test]
    fn bold_wins_over_earlier_code() {
        assert_eq!(
            tokenize("`code` and **bold**"),
            vec![text("`code` and "), bold("bold")]
        );
    }

    #[test]
    fn bold_wins_over_earlier_link() {
        assert_eq!(
            tokenize("[a](b) then **c**"),
            vec![text("[a](b) then "), bold("c")]
        );
    }

    #[test]
    fn code_wins_over_earlier_link() {
        assert_eq!(
            tokenize("[a](b) then `c`"),
            vec![text("[a](b) then "), code("c")]
        );
    }

    #[test]
    fn text_after_a_match_is_still_scanned() {
        assert_eq!(
            tokenize("**a** `b` [c](d)"),
            vec![bold("a"), text(" "), code("b"), text(" "), link("c", "d")]
        );
    }

    #[test]
    fn captured_values_are_not_retokenized() {
        assert_eq!(tokenize("**see `x` here**"), vec![bold("see `x` here")]);
        assert_eq!(tokenize("`**x**`"), vec![text("`"), bold("x"), text("`")]);
        assert_eq!(tokenize("[`x`](u)"), vec![text("["), code("x"), text("](u)")]);
    }

    #[rstest]
    #[case("**unclosed")]
    #[case("`unclosed")]
    #[case("[label](no close")]
    #[case("****")]
    #[case("``")]
    #[case("[](empty)")]
    fn unmatched_markers_stay_literal(#[case] input: &str) {
        assert_eq!(tokenize(input), vec![text(input)]);
    }

    #[test]
    fn bold_content_may_not_contain_stars() {
        assert_eq!(tokenize("**a*b**"), vec![text("**a*b**")]);
    }

    #[test]
    fn leftmost_order_takes_the_first_span() {
        assert_eq!(
            tokenize_with("`code` and **bold**", MatchOrder::Leftmost),
            vec![code("code"), text(" and "), bold("bold")]
        );
        assert_eq!(
            tokenize_with("[a](b) then `c` and **d**", MatchOrder::Leftmost),
            vec![
                link("a", "b"),
                text(" then "),
                code("c"),
                text(" and "),
                bold("d"),
            ]
        );
    }

    #[test]
    fn orders_agree_without_overlap() {
        let input = "**a** then `b` then [c](d)";
        assert_eq!(
            tokenize_with(input, MatchOrder::Priority),
            tokenize_with(input, MatchOrder::Leftmost)
        );
    }
}
