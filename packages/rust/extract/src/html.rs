//! HTML paragraph extraction.
//!
//! Each pass is applied in sequence: markup repair and truncation work on the
//! raw string, footnote removal and paragraph collection on the parsed tree.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

/// How footnote-reference anchors are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FootnotePolicy {
    /// Remove only the `<a name="fnN">` anchor.
    #[default]
    Anchor,
    /// Remove the anchor's containing element (speech pages wrap the
    /// reference in a `<sup>` or similar).
    ContainingElement,
}

/// Options for HTML extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlOptions {
    pub footnotes: FootnotePolicy,
}

/// Extract the trimmed text of every paragraph, in document order.
pub fn extract_sections(html: &str, opts: &HtmlOptions) -> Vec<String> {
    let repaired = repair_paragraphs(html);
    let truncated = truncate_back_matter(&repaired);

    let mut doc = Html::parse_document(&truncated);
    strip_footnotes(&mut doc, opts.footnotes);
    collect_paragraphs(&doc)
}

// ---------------------------------------------------------------------------
// Pass 1: Repair unclosed paragraphs
// ---------------------------------------------------------------------------

/// Elements whose start or end tag ends an open paragraph when parsed.
const PARAGRAPH_BREAKERS: &[&str] = &[
    "address", "article", "aside", "blockquote", "caption", "center", "dd", "details", "dir",
    "div", "dl", "dt", "fieldset", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "main", "menu", "nav", "ol", "pre", "section", "table", "td",
    "th", "tr", "ul",
];

/// Close every paragraph before the next one opens.
///
/// Older pages use upper-case `<P>` and rarely close it. Paragraph tags are
/// lower-cased, an open paragraph is closed before the next `<p>`, and
/// closing tags with no open paragraph are dropped (an HTML5 parser would
/// turn them into empty paragraphs). A block-level tag such as `<UL>` or
/// `</BLOCKQUOTE>` already ends the paragraph for the parser, so nothing is
/// inserted after one.
pub(crate) fn repair_paragraphs(html: &str) -> String {
    static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)((?:\s[^>]*)?)>").expect("valid regex")
    });

    let mut out = String::with_capacity(html.len() + 64);
    let mut open = false;
    let mut last = 0;

    for caps in TAG_RE.captures_iter(html) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let name = name.as_str().to_ascii_lowercase();
        if name != "p" {
            if PARAGRAPH_BREAKERS.contains(&name.as_str()) {
                open = false;
            }
            continue;
        }

        out.push_str(&html[last..whole.start()]);
        last = whole.end();

        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        if closing {
            if open {
                out.push_str("</p>");
                open = false;
            }
        } else {
            if open {
                out.push_str("</p>");
            }
            out.push_str("<p");
            out.push_str(caps.get(3).map_or("", |m| m.as_str()));
            out.push('>');
            open = true;
        }
    }

    out.push_str(&html[last..]);
    out
}

// ---------------------------------------------------------------------------
// Pass 2: Truncate references / appendix
// ---------------------------------------------------------------------------

/// Cut everything from the first bold `References` or `Appendix` heading.
pub(crate) fn truncate_back_matter(html: &str) -> String {
    static BACK_MATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"<b>references|<b>appendix|<strong>references|<strong>appendix")
            .expect("valid regex")
    });

    // ASCII lowering keeps byte offsets aligned with the input.
    let lowered = html.to_ascii_lowercase();
    match BACK_MATTER_RE.find(&lowered) {
        Some(m) => {
            let mut kept = html[..m.start()].to_string();
            kept.push_str("</body></html>");
            kept
        }
        None => html.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Pass 3: Remove footnote references
// ---------------------------------------------------------------------------

/// Detach `<a name="fn1">`-style anchors so footnote markers do not bleed
/// into paragraph text.
pub(crate) fn strip_footnotes(doc: &mut Html, policy: FootnotePolicy) {
    static FOOTNOTE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"fn\d").expect("valid regex"));
    let anchor_sel = Selector::parse("a[name]").expect("valid selector");

    let mut targets = Vec::new();
    for el in doc.select(&anchor_sel) {
        let Some(name) = el.value().attr("name") else {
            continue;
        };
        if !FOOTNOTE_RE.is_match(name) {
            continue;
        }
        let node = *el;
        let target = match policy {
            FootnotePolicy::Anchor => node.id(),
            FootnotePolicy::ContainingElement => node.parent().map_or(node.id(), |p| p.id()),
        };
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    for id in targets {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
}

// ---------------------------------------------------------------------------
// Pass 4: Collect paragraphs
// ---------------------------------------------------------------------------

fn collect_paragraphs(doc: &Html) -> Vec<String> {
    let p_sel = Selector::parse("p").expect("valid selector");
    doc.select(&p_sel)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .collect()
}
