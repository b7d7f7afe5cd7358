//! Structured rich text and its plain-text / HTML renderings

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Rich text field: an ordered list of blocks
pub type RichText = Vec<RichTextBlock>;

/// A single block of rich text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
    /// Image source (image blocks only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Image alternative text (image blocks only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Embedded resource (embed blocks only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oembed: Option<Embed>,
}

impl RichTextBlock {
    /// Convenience constructor for a plain paragraph
    pub fn paragraph(text: &str) -> Self {
        Self::new(BlockKind::Paragraph, text)
    }

    /// Block of any kind without spans
    pub fn new(kind: BlockKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
            spans: Vec::new(),
            url: None,
            alt: None,
            oembed: None,
        }
    }

    /// Attach a span
    pub fn with_span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    #[serde(rename = "heading1")]
    Heading1,
    #[serde(rename = "heading2")]
    Heading2,
    #[serde(rename = "heading3")]
    Heading3,
    #[serde(rename = "heading4")]
    Heading4,
    #[serde(rename = "heading5")]
    Heading5,
    #[serde(rename = "heading6")]
    Heading6,
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "preformatted")]
    Preformatted,
    #[serde(rename = "list-item")]
    ListItem,
    #[serde(rename = "o-list-item")]
    OrderedListItem,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "embed")]
    Embed,
    #[serde(other)]
    Unknown,
}

impl BlockKind {
    /// Wrapping element for text blocks
    fn tag(self) -> Option<&'static str> {
        match self {
            BlockKind::Heading1 => Some("h1"),
            BlockKind::Heading2 => Some("h2"),
            BlockKind::Heading3 => Some("h3"),
            BlockKind::Heading4 => Some("h4"),
            BlockKind::Heading5 => Some("h5"),
            BlockKind::Heading6 => Some("h6"),
            BlockKind::Paragraph => Some("p"),
            BlockKind::Preformatted => Some("pre"),
            BlockKind::ListItem | BlockKind::OrderedListItem => Some("li"),
            BlockKind::Image | BlockKind::Embed | BlockKind::Unknown => None,
        }
    }

    fn list_tag(self) -> Option<&'static str> {
        match self {
            BlockKind::ListItem => Some("ul"),
            BlockKind::OrderedListItem => Some("ol"),
            _ => None,
        }
    }
}

/// An inline mark over `[start, end)`, counted in characters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: SpanKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SpanData>,
}

impl Span {
    pub fn new(kind: SpanKind, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            kind,
            data: None,
        }
    }

    pub fn hyperlink(start: usize, end: usize, url: &str) -> Self {
        Self {
            start,
            end,
            kind: SpanKind::Hyperlink,
            data: Some(SpanData {
                url: Some(url.to_string()),
                ..SpanData::default()
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Strong,
    Em,
    Hyperlink,
    Label,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Plain text of all blocks, joined by a single space
pub fn as_text(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render rich text to HTML.
///
/// All text and attribute values are escaped. Hyperlinks and images whose
/// URL is not http(s), mailto or site-relative are dropped.
pub fn as_html(blocks: &[RichTextBlock]) -> String {
    let mut html = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let list = block.kind.list_tag();
        if open_list != list {
            if let Some(tag) = open_list {
                let _ = write!(html, "</{}>", tag);
            }
            if let Some(tag) = list {
                let _ = write!(html, "<{}>", tag);
            }
            open_list = list;
        }

        match block.kind {
            BlockKind::Image => render_image(&mut html, block),
            BlockKind::Embed => render_embed(&mut html, block),
            BlockKind::Unknown => {
                tracing::debug!("Skipping unsupported rich text block");
            }
            kind => {
                if let Some(tag) = kind.tag() {
                    let _ = write!(html, "<{}>", tag);
                    render_spans(&mut html, block, kind == BlockKind::Preformatted);
                    let _ = write!(html, "</{}>", tag);
                }
            }
        }
    }

    if let Some(tag) = open_list {
        let _ = write!(html, "</{}>", tag);
    }

    html
}

fn render_image(html: &mut String, block: &RichTextBlock) {
    let Some(url) = block.url.as_deref().filter(|u| is_safe_url(u)) else {
        return;
    };
    let _ = write!(
        html,
        r#"<p class="block-img"><img src="{}" alt="{}"></p>"#,
        escape_html(url),
        escape_html(block.alt.as_deref().unwrap_or(""))
    );
}

fn render_embed(html: &mut String, block: &RichTextBlock) {
    let Some(embed) = &block.oembed else {
        return;
    };
    let Some(url) = embed.embed_url.as_deref().filter(|u| is_safe_url(u)) else {
        return;
    };
    let url = escape_html(url);
    let label = embed
        .title
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| url.clone());
    let _ = write!(
        html,
        r#"<div data-oembed="{}" data-oembed-type="{}"><a href="{}">{}</a></div>"#,
        url,
        escape_html(embed.kind.as_deref().unwrap_or("")),
        url,
        label
    );
}

/// Render the block text with properly nested inline marks
fn render_spans(html: &mut String, block: &RichTextBlock, preformatted: bool) {
    let chars: Vec<char> = block.text.chars().collect();
    let len = chars.len();

    let spans: Vec<&Span> = block
        .spans
        .iter()
        .filter(|s| s.start < s.end.min(len) && open_tag(s).is_some())
        .collect();

    let mut boundaries: Vec<usize> = vec![0, len];
    for span in &spans {
        boundaries.push(span.start);
        boundaries.push(span.end.min(len));
    }
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut stack: Vec<&Span> = Vec::new();

    for window in boundaries.windows(2) {
        let (pos, next) = (window[0], window[1]);

        // Close everything from the lowest span ending here, reopening the
        // ones above it that are still active.
        let mut reopen = Vec::new();
        if let Some(lowest) = stack.iter().position(|s| s.end.min(len) <= pos) {
            while stack.len() > lowest {
                if let Some(span) = stack.pop() {
                    let _ = write!(html, "</{}>", close_tag(span));
                    if span.end.min(len) > pos {
                        reopen.push(span);
                    }
                }
            }
        }

        let mut opening: Vec<&Span> = reopen;
        opening.extend(spans.iter().copied().filter(|s| s.start == pos));
        // Longest span outermost
        opening.sort_by(|a, b| b.end.cmp(&a.end));
        for span in opening {
            if let Some(tag) = open_tag(span) {
                html.push_str(&tag);
                stack.push(span);
            }
        }

        let segment: String = chars[pos..next].iter().collect();
        push_text(html, &segment, preformatted);
    }

    while let Some(span) = stack.pop() {
        let _ = write!(html, "</{}>", close_tag(span));
    }
}

fn open_tag(span: &Span) -> Option<String> {
    match span.kind {
        SpanKind::Strong => Some("<strong>".to_string()),
        SpanKind::Em => Some("<em>".to_string()),
        SpanKind::Hyperlink => {
            let data = span.data.as_ref()?;
            let url = data.url.as_deref().filter(|u| is_safe_url(u))?;
            let target = match data.target.as_deref() {
                Some(t) => format!(r#" target="{}" rel="noopener""#, escape_html(t)),
                None => String::new(),
            };
            Some(format!(r#"<a href="{}"{}>"#, escape_html(url), target))
        }
        SpanKind::Label => {
            let label = span.data.as_ref().and_then(|d| d.label.as_deref())?;
            Some(format!(r#"<span class="{}">"#, escape_html(label)))
        }
        SpanKind::Unknown => None,
    }
}

fn close_tag(span: &Span) -> &'static str {
    match span.kind {
        SpanKind::Strong => "strong",
        SpanKind::Em => "em",
        SpanKind::Hyperlink => "a",
        SpanKind::Label | SpanKind::Unknown => "span",
    }
}

fn push_text(html: &mut String, text: &str, preformatted: bool) {
    let escaped = escape_html(text);
    if preformatted {
        html.push_str(&escaped);
    } else {
        html.push_str(&escaped.replace('\n', "<br />"));
    }
}

/// Accept only schemes that cannot run script
pub fn is_safe_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("mailto:")
        || (lower.starts_with('/') && !lower.starts_with("//"))
        || lower.starts_with('#')
}

/// Simple HTML escaping
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text_joins_blocks() {
        let blocks = vec![
            RichTextBlock::paragraph("Lorem ipsum"),
            RichTextBlock::new(BlockKind::Heading2, "dolor"),
            RichTextBlock::paragraph("sit amet"),
        ];
        assert_eq!(as_text(&blocks), "Lorem ipsum dolor sit amet");
        assert_eq!(as_text(&[]), "");
    }

    #[test]
    fn test_paragraph_and_heading() {
        let blocks = vec![
            RichTextBlock::new(BlockKind::Heading3, "Title"),
            RichTextBlock::paragraph("Body"),
        ];
        assert_eq!(as_html(&blocks), "<h3>Title</h3><p>Body</p>");
    }

    #[test]
    fn test_text_is_escaped() {
        let blocks = vec![RichTextBlock::paragraph("<script>alert('x')</script> & co")];
        assert_eq!(
            as_html(&blocks),
            "<p>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; co</p>"
        );
    }

    #[test]
    fn test_line_breaks() {
        let blocks = vec![
            RichTextBlock::paragraph("a\nb"),
            RichTextBlock::new(BlockKind::Preformatted, "fn main() {\n}"),
        ];
        assert_eq!(as_html(&blocks), "<p>a<br />b</p><pre>fn main() {\n}</pre>");
    }

    #[test]
    fn test_simple_spans() {
        let block = RichTextBlock::paragraph("Hello bold world")
            .with_span(Span::new(SpanKind::Strong, 6, 10));
        assert_eq!(as_html(&[block]), "<p>Hello <strong>bold</strong> world</p>");
    }

    #[test]
    fn test_overlapping_spans_stay_nested() {
        // strong [0, 7), em [4, 10)
        let block = RichTextBlock::paragraph("abcdefghij")
            .with_span(Span::new(SpanKind::Strong, 0, 7))
            .with_span(Span::new(SpanKind::Em, 4, 10));
        assert_eq!(
            as_html(&[block]),
            "<p><strong>abcd<em>efg</em></strong><em>hij</em></p>"
        );
    }

    #[test]
    fn test_spans_use_character_offsets() {
        let block = RichTextBlock::paragraph("ação rápida")
            .with_span(Span::new(SpanKind::Em, 5, 11));
        assert_eq!(as_html(&[block]), "<p>ação <em>rápida</em></p>");
    }

    #[test]
    fn test_hyperlinks() {
        let block = RichTextBlock::paragraph("see docs")
            .with_span(Span::hyperlink(4, 8, "https://example.com/?a=1&b=2"));
        assert_eq!(
            as_html(&[block]),
            r#"<p>see <a href="https://example.com/?a=1&amp;b=2">docs</a></p>"#
        );
    }

    #[test]
    fn test_unsafe_hyperlink_is_dropped() {
        let block = RichTextBlock::paragraph("click me")
            .with_span(Span::hyperlink(0, 5, "javascript:alert(1)"));
        assert_eq!(as_html(&[block]), "<p>click me</p>");
    }

    #[test]
    fn test_out_of_range_span_is_clamped() {
        let block = RichTextBlock::paragraph("abc").with_span(Span::new(SpanKind::Strong, 1, 99));
        assert_eq!(as_html(&[block]), "<p>a<strong>bc</strong></p>");
    }

    #[test]
    fn test_list_grouping() {
        let blocks = vec![
            RichTextBlock::new(BlockKind::ListItem, "one"),
            RichTextBlock::new(BlockKind::ListItem, "two"),
            RichTextBlock::new(BlockKind::OrderedListItem, "first"),
            RichTextBlock::paragraph("after"),
        ];
        assert_eq!(
            as_html(&blocks),
            "<ul><li>one</li><li>two</li></ul><ol><li>first</li></ol><p>after</p>"
        );
    }

    #[test]
    fn test_image_block() {
        let mut image = RichTextBlock::new(BlockKind::Image, "");
        image.url = Some("https://images.prismic.io/a.png".to_string());
        image.alt = Some("a \"quoted\" alt".to_string());
        assert_eq!(
            as_html(&[image]),
            r#"<p class="block-img"><img src="https://images.prismic.io/a.png" alt="a &quot;quoted&quot; alt"></p>"#
        );
    }

    #[test]
    fn test_deserialize_blocks() {
        let json = r#"[
            { "type": "heading2", "text": "Intro", "spans": [] },
            { "type": "paragraph", "text": "Go here", "spans": [
                { "start": 3, "end": 7, "type": "hyperlink", "data": { "link_type": "Web", "url": "https://rust-lang.org" } }
            ] },
            { "type": "some-future-block", "text": "ignored" }
        ]"#;
        let blocks: RichText = serde_json::from_str(json).unwrap();
        assert_eq!(blocks[0].kind, BlockKind::Heading2);
        assert_eq!(blocks[1].spans[0].kind, SpanKind::Hyperlink);
        assert_eq!(blocks[2].kind, BlockKind::Unknown);
        assert_eq!(
            as_html(&blocks),
            r#"<h2>Intro</h2><p>Go <a href="https://rust-lang.org">here</a></p>"#
        );
    }
}
