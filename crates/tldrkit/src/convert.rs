//! HTML to text block conversion
//!
//! A small streaming scanner, not a full HTML parser. It splits the body
//! into ordered text blocks at block-level elements and drops the content
//! of script-like elements entirely.

use std::iter::Peekable;
use std::str::Chars;

/// Elements whose content is never text
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "svg", "template"];

/// Containers that end the current block but carry no category of their own
const CONTAINER_TAGS: &[&str] = &[
    "div",
    "section",
    "article",
    "main",
    "header",
    "footer",
    "nav",
    "aside",
    "ul",
    "ol",
    "dl",
    "table",
    "thead",
    "tbody",
    "tfoot",
    "figure",
    "figcaption",
    "form",
    "fieldset",
    "details",
    "summary",
    "address",
];

/// Category of a text block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    Paragraph,
    ListItem,
    Preformatted,
    Quote,
    TableRow,
    Text,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Paragraph => "paragraph",
            BlockKind::ListItem => "list_item",
            BlockKind::Preformatted => "preformatted",
            BlockKind::Quote => "quote",
            BlockKind::TableRow => "table_row",
            BlockKind::Text => "text",
        }
    }

    fn for_tag(name: &str) -> Option<Self> {
        let kind = match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => BlockKind::Heading,
            "p" => BlockKind::Paragraph,
            "li" | "dt" | "dd" => BlockKind::ListItem,
            "pre" => BlockKind::Preformatted,
            "blockquote" => BlockKind::Quote,
            "tr" => BlockKind::TableRow,
            _ if CONTAINER_TAGS.contains(&name) => BlockKind::Text,
            _ => return None,
        };
        Some(kind)
    }
}

/// One run of text between block boundaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub kind: BlockKind,
    pub text: String,
}

/// Text extracted from an HTML document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlDocument {
    /// Content of `<title>`, if any
    pub title: Option<String>,
    /// Text blocks in document order
    pub blocks: Vec<TextBlock>,
}

/// Check if content is HTML based on content type and body
pub fn is_html(content_type: Option<&str>, body: &str) -> bool {
    if let Some(ct) = content_type {
        let ct_lower = ct.to_lowercase();
        if ct_lower.contains("text/html") || ct_lower.contains("application/xhtml") {
            return true;
        }
    }

    let head: String = body.trim_start().chars().take(14).collect();
    let head = head.to_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

/// Split an HTML document into ordered text blocks
pub fn extract_blocks(html: &str) -> HtmlDocument {
    let mut builder = BlockBuilder::default();
    let mut title: Option<String> = None;
    let mut title_buf = String::new();
    let mut in_title = false;

    let mut chars = html.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '<' if starts_tag(chars.peek()) => match read_tag(&mut chars) {
                Tag::Open { name, self_closing } => {
                    if SKIP_TAGS.contains(&name.as_str()) {
                        if !self_closing {
                            skip_until_close(&mut chars, &name);
                        }
                    } else if name == "title" {
                        in_title = !self_closing;
                    } else if name == "br" {
                        builder.push_str("\n");
                    } else if name == "hr" {
                        builder.flush();
                    } else if matches!(name.as_str(), "td" | "th") {
                        builder.cell_separator();
                    } else if let Some(kind) = BlockKind::for_tag(&name) {
                        if self_closing {
                            builder.flush();
                        } else {
                            builder.open(name, kind);
                        }
                    }
                }
                Tag::Close { name } => {
                    if name == "title" {
                        in_title = false;
                        let text = collapse_whitespace(&title_buf);
                        if title.is_none() && !text.is_empty() {
                            title = Some(text);
                        }
                        title_buf.clear();
                    } else if BlockKind::for_tag(&name).is_some() {
                        builder.close(&name);
                    }
                }
                Tag::Other => {}
            },
            '&' => {
                let decoded = read_entity(&mut chars);
                if in_title {
                    title_buf.push_str(&decoded);
                } else {
                    builder.push_str(&decoded);
                }
            }
            _ => {
                if in_title {
                    title_buf.push(c);
                } else {
                    builder.push(c);
                }
            }
        }
    }

    builder.flush();

    HtmlDocument {
        title,
        blocks: builder.blocks,
    }
}

/// Collapse every whitespace run to one space and trim
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<TextBlock>,
    buffer: String,
    stack: Vec<(String, BlockKind)>,
}

impl BlockBuilder {
    fn current_kind(&self) -> BlockKind {
        self.stack
            .last()
            .map(|(_, kind)| *kind)
            .unwrap_or(BlockKind::Text)
    }

    fn in_pre(&self) -> bool {
        self.stack
            .iter()
            .any(|(_, kind)| *kind == BlockKind::Preformatted)
    }

    fn push(&mut self, c: char) {
        self.buffer.push(c);
    }

    fn push_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    fn cell_separator(&mut self) {
        if !self.buffer.trim().is_empty() {
            self.buffer.push_str(" | ");
        }
    }

    fn open(&mut self, name: String, kind: BlockKind) {
        self.flush();
        self.stack.push((name, kind));
    }

    fn close(&mut self, name: &str) {
        if let Some(pos) = self.stack.iter().rposition(|(n, _)| n == name) {
            self.flush();
            self.stack.truncate(pos);
        }
    }

    fn flush(&mut self) {
        let text = if self.in_pre() {
            self.buffer
                .trim_matches(|c: char| c == '\n' || c == '\r')
                .trim_end()
                .to_string()
        } else {
            collapse_whitespace(&self.buffer)
        };
        self.buffer.clear();

        let text = text.trim_end_matches(" |").to_string();
        if text.trim().is_empty() {
            return;
        }

        let kind = if self.in_pre() {
            BlockKind::Preformatted
        } else {
            self.current_kind()
        };
        self.blocks.push(TextBlock { kind, text });
    }
}

enum Tag {
    Open { name: String, self_closing: bool },
    Close { name: String },
    Other,
}

fn starts_tag(next: Option<&char>) -> bool {
    matches!(next, Some(c) if c.is_ascii_alphabetic() || *c == '/' || *c == '!' || *c == '?')
}

/// Read a tag after its `<`, consuming through the closing `>`
fn read_tag(chars: &mut Peekable<Chars<'_>>) -> Tag {
    let mut raw = String::new();
    for next in chars.by_ref() {
        // Comments may contain '>' and only end at "-->"
        if next == '>' && !(raw.starts_with("!--") && !raw.ends_with("--")) {
            break;
        }
        raw.push(next);
    }

    if raw.starts_with('!') || raw.starts_with('?') {
        return Tag::Other;
    }

    let (is_closing, body) = match raw.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, raw.as_str()),
    };

    let name = body
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
        .to_lowercase();

    if name.is_empty() {
        return Tag::Other;
    }

    if is_closing {
        Tag::Close { name }
    } else {
        Tag::Open {
            name,
            self_closing: raw.trim_end().ends_with('/'),
        }
    }
}

/// Consume raw content up to and including `</name ...>`
fn skip_until_close(chars: &mut Peekable<Chars<'_>>, name: &str) {
    let target: Vec<char> = format!("</{}", name).chars().collect();
    let mut matched = 0;

    while let Some(c) = chars.next() {
        let c = c.to_ascii_lowercase();
        if c == target[matched] {
            matched += 1;
            if matched == target.len() {
                for c in chars.by_ref() {
                    if c == '>' {
                        break;
                    }
                }
                return;
            }
        } else {
            matched = usize::from(c == target[0]);
        }
    }
}

/// Decode an entity after its `&`; unknown entities are kept verbatim
fn read_entity(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();

    while let Some(&next) = chars.peek() {
        if next == ';' {
            chars.next();
            return match entity_char(&name) {
                Some(ch) => ch.to_string(),
                None => format!("&{};", name),
            };
        }
        if !(next.is_ascii_alphanumeric() || next == '#') || name.len() > 10 {
            break;
        }
        name.push(next);
        chars.next();
    }

    format!("&{}", name)
}

fn entity_char(name: &str) -> Option<char> {
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "mdash" => '—',
        "ndash" => '–',
        "hellip" => '…',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "copy" => '©',
        "reg" => '®',
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            return char::from_u32(code);
        }
    };
    Some(ch)
}
