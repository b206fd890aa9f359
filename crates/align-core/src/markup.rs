use std::ops::Range;

use tl::{HTMLTag, Node, NodeHandle, Parser, ParserOptions, VDom};

pub(crate) const SECTION_CLASS: &str = "align-section";
pub(crate) const BG_IMAGE_CLASS: &str = "align-bgImage";
pub(crate) const BG_VIDEO_CLASS: &str = "align-bgVideo";

pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn unescape(text: &str) -> String {
    const ENTITIES: [(&str, &str); 6] = [
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&nbsp;", "\u{a0}"),
        ("&amp;", "&"),
    ];

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'outer: while let Some(ix) = rest.find('&') {
        out.push_str(&rest[..ix]);
        rest = &rest[ix..];
        for (entity, replacement) in ENTITIES {
            if let Some(tail) = rest.strip_prefix(entity) {
                out.push_str(replacement);
                rest = tail;
                continue 'outer;
            }
        }
        out.push('&');
        rest = &rest[1..];
    }
    out.push_str(rest);
    out
}

fn parse(markup: &str) -> Option<VDom<'_>> {
    tl::parse(markup, ParserOptions::default()).ok()
}

/// Byte range of `part` inside `source`, when the parser borrowed it from
/// there.
fn span(source: &str, part: &[u8]) -> Option<Range<usize>> {
    let start = (part.as_ptr() as usize).checked_sub(source.as_ptr() as usize)?;
    let end = start + part.len();
    (end <= source.len()).then_some(start..end)
}

fn node_span(source: &str, node: &Node<'_>) -> Option<Range<usize>> {
    match node {
        Node::Tag(tag) => span(source, tag.raw().as_bytes()),
        Node::Raw(bytes) | Node::Comment(bytes) => span(source, bytes.as_bytes()),
    }
}

fn attr(tag: &HTMLTag<'_>, name: &'static str) -> Option<String> {
    tag.attributes()
        .get(name)
        .flatten()
        .map(|value| unescape(&value.as_utf8_str()))
}

fn ends_with_close(outer: &str, name: &str) -> bool {
    let close = format!("</{name}>");
    outer
        .len()
        .checked_sub(close.len())
        .and_then(|at| outer.get(at..))
        .is_some_and(|tail| tail.eq_ignore_ascii_case(&close))
}

fn children(tag: &HTMLTag<'_>) -> Vec<NodeHandle> {
    tag.children().top().iter().copied().collect()
}

/// Literal text of a markup fragment: tags dropped, entities decoded.
pub(crate) fn text_content(markup: &str) -> String {
    let Some(dom) = parse(markup) else {
        return unescape(markup);
    };
    let parser = dom.parser();
    let text: String = dom
        .children()
        .iter()
        .filter_map(|handle| handle.get(parser))
        .map(|node| node.inner_text(parser))
        .collect();
    unescape(&text)
}

pub(crate) fn is_line_break(markup: &str) -> bool {
    let Some(dom) = parse(markup) else {
        return false;
    };
    let parser = dom.parser();
    let mut nodes = dom
        .children()
        .iter()
        .filter_map(|handle| handle.get(parser))
        .filter(|node| !matches!(node, Node::Raw(text) if text.as_utf8_str().trim().is_empty()));
    match (nodes.next(), nodes.next()) {
        (Some(Node::Tag(tag)), None) => {
            tag.name().as_utf8_str().eq_ignore_ascii_case("br")
                && tag.children().top().iter().next().is_none()
        }
        _ => false,
    }
}

/// An element located in a markup string by byte ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub classes: Vec<String>,
    pub style: Option<String>,
    pub src: Option<String>,
    pub range: Range<usize>,
    pub inner: Range<usize>,
}

impl Element {
    fn from_tag(source: &str, tag: &HTMLTag<'_>, parser: &Parser<'_>) -> Option<Self> {
        let range = span(source, tag.raw().as_bytes())?;
        let spans: Vec<_> = children(tag)
            .iter()
            .filter_map(|handle| handle.get(parser))
            .filter_map(|node| node_span(source, node))
            .collect();
        let inner = match (spans.first(), spans.last()) {
            (Some(first), Some(last)) => first.start..last.end,
            _ => range.end..range.end,
        };
        Some(Self {
            name: tag.name().as_utf8_str().to_ascii_lowercase(),
            classes: attr(tag, "class")
                .unwrap_or_default()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            style: attr(tag, "style"),
            src: attr(tag, "src"),
            range,
            inner,
        })
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn is_closed(&self, source: &str) -> bool {
        ends_with_close(&source[self.range.clone()], &self.name)
    }
}

fn collect(
    source: &str,
    parser: &Parser<'_>,
    handles: &[NodeHandle],
    matches: &dyn Fn(&Element) -> bool,
    closed_only: bool,
    found: &mut Vec<Element>,
) {
    for handle in handles {
        let Some(Node::Tag(tag)) = handle.get(parser) else {
            continue;
        };
        let Some(element) = Element::from_tag(source, tag, parser) else {
            continue;
        };
        if matches(&element) && (!closed_only || element.is_closed(source)) {
            found.push(element);
            continue;
        }
        collect(source, parser, &children(tag), matches, closed_only, found);
    }
}

fn search(markup: &str, matches: &dyn Fn(&Element) -> bool, closed_only: bool) -> Vec<Element> {
    let Some(dom) = parse(markup) else {
        return Vec::new();
    };
    let mut found = Vec::new();
    collect(
        markup,
        dom.parser(),
        dom.children(),
        matches,
        closed_only,
        &mut found,
    );
    found
}

/// Outermost elements satisfying `matches`, in document order. Elements
/// without a closing tag are skipped.
pub(crate) fn elements(markup: &str, matches: impl Fn(&Element) -> bool) -> Vec<Element> {
    search(markup, &matches, true)
}

pub(crate) fn elements_named(markup: &str, name: &str) -> Vec<Element> {
    elements(markup, |el| el.name == name)
}

/// Replaces every range in `elements` (document order, non overlapping)
/// with the output of `replace`.
pub(crate) fn replace_elements(
    markup: &str,
    elements: &[Element],
    mut replace: impl FnMut(&Element, &str) -> String,
) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut cursor = 0;
    for element in elements {
        out.push_str(&markup[cursor..element.range.start]);
        out.push_str(&replace(element, &markup[element.range.clone()]));
        cursor = element.range.end;
    }
    out.push_str(&markup[cursor..]);
    out
}

pub(crate) fn style_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (key, value) = decl.split_once(':')?;
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();
            (!key.is_empty() && !value.is_empty()).then(|| (key, value.to_string()))
        })
        .collect()
}

/// Unwraps `url(...)`, with or without quotes.
pub(crate) fn css_url(value: &str) -> Option<String> {
    let inner = value.trim().strip_prefix("url(")?.strip_suffix(')')?.trim();
    let inner = inner
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| inner.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(inner);
    (!inner.is_empty()).then(|| inner.to_string())
}

/// A persisted section split into its wrapper attributes and its payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SectionMarkup {
    pub classes: Vec<String>,
    pub style: Vec<(String, String)>,
    pub background_image: Option<String>,
    pub background_video: Option<String>,
    pub body: String,
}

impl SectionMarkup {
    pub fn parse(markup: &str) -> Self {
        let trimmed = markup.trim();
        let wrapper = elements(trimmed, is_wrapper)
            .into_iter()
            .next()
            .filter(|el| el.range == (0..trimmed.len()));

        let Some(wrapper) = wrapper else {
            return Self {
                body: trimmed.to_string(),
                ..Self::default()
            };
        };

        let classes = wrapper
            .classes
            .iter()
            .filter(|class| *class != SECTION_CLASS)
            .cloned()
            .collect();
        let style = style_declarations(wrapper.style.as_deref().unwrap_or_default());

        let inner = &trimmed[wrapper.inner.clone()];
        let decorations = elements(inner, |el| {
            el.name == "div" && (el.has_class(BG_IMAGE_CLASS) || el.has_class(BG_VIDEO_CLASS))
        });

        let mut background_image = None;
        let mut background_video = None;
        for element in &decorations {
            if element.has_class(BG_IMAGE_CLASS) {
                background_image = style_declarations(element.style.as_deref().unwrap_or_default())
                    .into_iter()
                    .find(|(key, _)| key == "background-image")
                    .and_then(|(_, value)| css_url(&value));
            } else {
                let source = &inner[element.inner.clone()];
                background_video = search(source, &|el: &Element| el.name == "source", false)
                    .into_iter()
                    .next()
                    .and_then(|el| el.src)
                    .filter(|src| !src.is_empty());
            }
        }
        let body = replace_elements(inner, &decorations, |_, _| String::new());

        Self {
            classes,
            style,
            background_image,
            background_video,
            body: body.trim().to_string(),
        }
    }
}

fn is_wrapper(element: &Element) -> bool {
    element.name == "div" && element.has_class(SECTION_CLASS)
}

/// Splits persisted document markup into what precedes the first section
/// wrapper and the top-level wrappers themselves.
pub(crate) fn split_sections(markup: &str) -> (&str, Vec<&str>) {
    let wrappers = elements(markup, is_wrapper);
    let leading = wrappers
        .first()
        .map_or(markup, |el| &markup[..el.range.start]);
    let sections = wrappers.into_iter().map(|el| &markup[el.range]).collect();
    (leading, sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_element_attributes() {
        let markup = r#"<div class="a  b" style="content: &quot;x&quot;" hidden>y</div>"#;
        let found = elements_named(markup, "div");
        assert_eq!(found.len(), 1);
        let div = &found[0];
        assert_eq!(div.classes, vec!["a", "b"]);
        assert_eq!(div.style.as_deref(), Some(r#"content: "x""#));
        assert!(div.src.is_none());
        assert_eq!(div.range, 0..markup.len());
        assert_eq!(&markup[div.inner.clone()], "y");
    }

    #[test]
    fn finds_outermost_nested_elements() {
        let markup = "<p>x</p><table><tr><td><table><tr><td>y</td></tr></table></td></tr></table><a href=\"#\">z</a>";
        let tables = elements_named(markup, "table");
        assert_eq!(tables.len(), 1);
        assert!(markup[tables[0].range.clone()].ends_with("</table></td></tr></table>"));

        let links = elements_named(markup, "a");
        assert_eq!(links.len(), 1);
        assert_eq!(&markup[links[0].inner.clone()], "z");
    }

    #[test]
    fn skips_unclosed_elements_and_comments() {
        let markup = "<!-- <figure>no</figure> --><figure>open";
        assert!(elements_named(markup, "figure").is_empty());
    }

    #[test]
    fn ranges_survive_multibyte_text() {
        let markup = "<p>caf\u{e9} \u{1f389}</p><figure><img src=\"\u{e9}.png\"></figure>";
        let figures = elements_named(markup, "figure");
        assert_eq!(figures.len(), 1);
        assert_eq!(
            &markup[figures[0].range.clone()],
            "<figure><img src=\"\u{e9}.png\"></figure>"
        );
        assert_eq!(text_content(markup), "caf\u{e9} \u{1f389}");
    }

    #[test]
    fn detects_line_break_payloads() {
        assert!(is_line_break("<br>"));
        assert!(is_line_break("  <BR/> "));
        assert!(!is_line_break("<br><p>x</p>"));
        assert!(!is_line_break("<p></p>"));
    }

    #[test]
    fn text_content_decodes_entities() {
        assert_eq!(
            text_content("<pre data-align-html=\"true\">&lt;p&gt;a &amp; b&lt;/p&gt;</pre>"),
            "<p>a & b</p>"
        );
        assert_eq!(unescape("&amp;lt;"), "&lt;");
        assert_eq!(unescape("a & b"), "a & b");
    }

    #[test]
    fn parses_section_wrapper() {
        let markup = concat!(
            r#"<div class="align-section is-full hero has-bgColor" style="background-color: red; margin-top: 4px">"#,
            r#"<div class="align-bgVideo"><video autoplay muted loop><source src="v.mp4"></video></div>"#,
            r#"<div class="align-bgImage" style="background-image: url('i.png')"></div>"#,
            "<p>hello</p></div>"
        );
        let parsed = SectionMarkup::parse(markup);
        assert_eq!(parsed.classes, vec!["is-full", "hero", "has-bgColor"]);
        assert_eq!(
            parsed.style,
            vec![
                ("background-color".to_string(), "red".to_string()),
                ("margin-top".to_string(), "4px".to_string()),
            ]
        );
        assert_eq!(parsed.background_image.as_deref(), Some("i.png"));
        assert_eq!(parsed.background_video.as_deref(), Some("v.mp4"));
        assert_eq!(parsed.body, "<p>hello</p>");
    }

    #[test]
    fn bare_markup_is_all_body() {
        let parsed = SectionMarkup::parse(" <p>x</p> ");
        assert!(parsed.classes.is_empty());
        assert_eq!(parsed.body, "<p>x</p>");
    }

    #[test]
    fn splits_top_level_sections() {
        let markup = r#"Title<div class="align-section"><p>a</p></div><div class="align-section"><div class="x"></div></div>"#;
        let (leading, sections) = split_sections(markup);
        assert_eq!(leading, "Title");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0], r#"<div class="align-section"><p>a</p></div>"#);
    }
}
