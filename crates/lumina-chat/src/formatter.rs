//! Response formatter.
//!
//! Turns the lightweight markdown the personas ask for into a typed
//! [`Document`]: headings, numbered and bulleted items, and paragraphs made
//! of styled spans. Nothing here produces markup; renderers walk the blocks.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.)\s+(\S.*)$").expect("Invalid numbered-item regex"));

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-•]\s+(\S.*)$").expect("Invalid bullet regex"));

static INLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|\*(.+?)\*").expect("Invalid inline regex"));

// =============================================================================
// Document model
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingLevel {
    /// `## `
    Section,
    /// `### `
    Subsection,
}

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", content = "text", rename_all = "snake_case")]
pub enum Span {
    Text(String),
    Strong(String),
    Emphasis(String),
}

impl Span {
    pub fn text(&self) -> &str {
        match self {
            Span::Text(t) | Span::Strong(t) | Span::Emphasis(t) => t,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: HeadingLevel,
        spans: Vec<Span>,
    },
    /// `number` keeps the marker as written, e.g. `"1."` or `"01."`.
    NumberedItem {
        number: String,
        spans: Vec<Span>,
    },
    BulletItem {
        spans: Vec<Span>,
    },
    /// One entry per source line; lines are joined by hard breaks.
    Paragraph {
        lines: Vec<Vec<Span>>,
    },
}

impl Block {
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { spans, .. } => spans_text(spans),
            Block::NumberedItem { number, spans } => format!("{} {}", number, spans_text(spans)),
            Block::BulletItem { spans } => format!("• {}", spans_text(spans)),
            Block::Paragraph { lines } => lines
                .iter()
                .map(|line| spans_text(line))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Formatted reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Unstyled rendering, one block per line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn spans_text(spans: &[Span]) -> String {
    spans.iter().map(Span::text).collect()
}

// =============================================================================
// Parsing
// =============================================================================

/// Format a reply into a [`Document`].
///
/// Never fails: anything unrecognised becomes paragraph text.
pub fn format_response(text: &str) -> Document {
    let mut blocks = Vec::new();

    for chunk in text.split("\n\n") {
        let mut lines: Vec<Vec<Span>> = Vec::new();

        for raw in chunk.split('\n') {
            let line = raw.trim_end();
            if line.trim().is_empty() {
                flush_paragraph(&mut lines, &mut blocks);
                continue;
            }

            match structural_block(line.trim_start()) {
                Some(block) => {
                    flush_paragraph(&mut lines, &mut blocks);
                    blocks.push(block);
                }
                None => lines.push(parse_spans(line)),
            }
        }

        flush_paragraph(&mut lines, &mut blocks);
    }

    Document { blocks }
}

fn flush_paragraph(lines: &mut Vec<Vec<Span>>, blocks: &mut Vec<Block>) {
    if !lines.is_empty() {
        blocks.push(Block::Paragraph {
            lines: std::mem::take(lines),
        });
    }
}

fn structural_block(line: &str) -> Option<Block> {
    if let Some(rest) = line.strip_prefix("### ") {
        return heading(HeadingLevel::Subsection, rest);
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return heading(HeadingLevel::Section, rest);
    }
    if let Some(caps) = NUMBERED_RE.captures(line) {
        return Some(Block::NumberedItem {
            number: caps[1].to_string(),
            spans: parse_spans(&caps[2]),
        });
    }
    if let Some(caps) = BULLET_RE.captures(line) {
        return Some(Block::BulletItem {
            spans: parse_spans(&caps[1]),
        });
    }
    None
}

fn heading(level: HeadingLevel, rest: &str) -> Option<Block> {
    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }
    Some(Block::Heading {
        level,
        spans: parse_spans(rest),
    })
}

/// Split a line into styled spans.
///
/// `**x**` binds before `*x*`; matching is non-greedy and needs at least one
/// character, so stray asterisks stay literal.
pub fn parse_spans(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE_RE.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            spans.push(Span::Text(line[last..whole.start()].to_string()));
        }
        if let Some(strong) = caps.get(1) {
            spans.push(Span::Strong(strong.as_str().to_string()));
        } else if let Some(em) = caps.get(2) {
            spans.push(Span::Emphasis(em.as_str().to_string()));
        }
        last = whole.end();
    }

    if last < line.len() {
        spans.push(Span::Text(line[last..].to_string()));
    }
    spans
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Span {
        Span::Text(s.to_string())
    }

    #[test]
    fn test_mixed_reply() {
        let doc = format_response("## Morning\n1. Cleanse\n- Pat dry\n**Tip**: *wait 1 min*");

        assert_eq!(
            doc.blocks,
            vec![
                Block::Heading {
                    level: HeadingLevel::Section,
                    spans: vec![text("Morning")],
                },
                Block::NumberedItem {
                    number: "1.".to_string(),
                    spans: vec![text("Cleanse")],
                },
                Block::BulletItem {
                    spans: vec![text("Pat dry")],
                },
                Block::Paragraph {
                    lines: vec![vec![
                        Span::Strong("Tip".to_string()),
                        text(": "),
                        Span::Emphasis("wait 1 min".to_string()),
                    ]],
                },
            ]
        );
    }

    #[test]
    fn test_subsection_heading() {
        let doc = format_response("### Step one");
        assert_eq!(
            doc.blocks,
            vec![Block::Heading {
                level: HeadingLevel::Subsection,
                spans: vec![text("Step one")],
            }]
        );
    }

    #[test]
    fn test_number_kept_as_written() {
        let doc = format_response("07. Moisturize\n10. Sunscreen");
        let numbers: Vec<&str> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::NumberedItem { number, .. } => Some(number.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(numbers, vec!["07.", "10."]);
    }

    #[test]
    fn test_unicode_bullet() {
        let doc = format_response("• Use *daily*");
        assert_eq!(
            doc.blocks,
            vec![Block::BulletItem {
                spans: vec![text("Use "), Span::Emphasis("daily".to_string())],
            }]
        );
    }

    #[test]
    fn test_plain_text_is_single_paragraph() {
        let doc = format_response("Hello there.");
        assert_eq!(
            doc.blocks,
            vec![Block::Paragraph {
                lines: vec![vec![text("Hello there.")]],
            }]
        );
    }

    #[test]
    fn test_double_newline_splits_paragraphs() {
        let doc = format_response("First line\nsecond line\n\nNext paragraph");
        assert_eq!(
            doc.blocks,
            vec![
                Block::Paragraph {
                    lines: vec![vec![text("First line")], vec![text("second line")]],
                },
                Block::Paragraph {
                    lines: vec![vec![text("Next paragraph")]],
                },
            ]
        );
    }

    #[test]
    fn test_structural_line_ends_paragraph() {
        let doc = format_response("Intro text\n## Evening\nAfter");
        assert_eq!(doc.blocks.len(), 3);
        assert!(matches!(doc.blocks[0], Block::Paragraph { .. }));
        assert!(matches!(doc.blocks[1], Block::Heading { .. }));
        assert!(matches!(doc.blocks[2], Block::Paragraph { .. }));
    }

    #[test]
    fn test_blank_lines_are_not_blocks() {
        assert!(format_response("").is_empty());
        assert!(format_response("\n\n\n\n").is_empty());
        assert!(format_response("   \n  ").is_empty());

        let doc = format_response("a\n\n\n\nb");
        assert_eq!(doc.blocks.len(), 2);
    }

    #[test]
    fn test_unmatched_asterisks_stay_literal() {
        assert_eq!(parse_spans("5 * 3"), vec![text("5 * 3")]);
        assert_eq!(parse_spans("**open"), vec![text("**open")]);
        assert_eq!(parse_spans("a ** b"), vec![text("a ** b")]);
    }

    #[test]
    fn test_strong_is_non_greedy() {
        assert_eq!(
            parse_spans("**a** and **b**"),
            vec![
                Span::Strong("a".to_string()),
                text(" and "),
                Span::Strong("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_headings_carry_spans() {
        let doc = format_response("## **Bold** heading");
        assert_eq!(
            doc.blocks,
            vec![Block::Heading {
                level: HeadingLevel::Section,
                spans: vec![Span::Strong("Bold".to_string()), text(" heading")],
            }]
        );
    }

    #[test]
    fn test_marker_without_space_is_text() {
        let doc = format_response("##Heading\n-dash\n1.5 ml");
        assert_eq!(doc.blocks.len(), 1);
        assert!(matches!(&doc.blocks[0], Block::Paragraph { lines } if lines.len() == 3));
    }

    #[test]
    fn test_crlf_input() {
        let doc = format_response("## Night\r\n- Rinse\r\n");
        assert_eq!(doc.plain_text(), "Night\n• Rinse");
    }

    #[test]
    fn test_plain_text_rendering() {
        let doc = format_response("## Morning\n1. Cleanse\n- Pat dry\n**Tip**: *wait 1 min*");
        assert_eq!(doc.plain_text(), "Morning\n1. Cleanse\n• Pat dry\nTip: wait 1 min");
    }
}
