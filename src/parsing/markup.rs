//! Flattening of filing documents into narrative text.
//!
//! Filing documents are (X)HTML with no fixed schema. Before any section heuristic
//! can run, the document is reduced to one string: table cells are removed together
//! with everything beneath them, the remaining text nodes are concatenated in
//! document order, and line feeds are dropped without a replacement character.
//!
//! Inline XBRL filings are well-formed XHTML and go through a streaming XML reader.
//! Older filings are HTML 4 with void elements (`<BR>`, `<META>`) and unclosed
//! paragraphs; when the XML reader rejects a document it is parsed again with an
//! HTML5 parser, which recovers from such markup the way browsers do.
use crate::{EdgarError, Result};
use html_escape::decode_html_entities;
use quick_xml::Reader;
use quick_xml::events::Event;
use scraper::{Html, Node};

/// Element whose subtree is excluded from the narrative text.
const TABLE_CELL: &str = "td";

/// Returns the narrative text of a filing document.
///
/// * Every `td` element and its descendants are skipped (matched case-insensitively).
/// * Text outside those subtrees is concatenated as-is; HTML named and numeric
///   entities are decoded. CDATA sections count as text in XHTML documents.
/// * Comments, processing instructions and the doctype contribute nothing.
/// * Literal `\n` characters are removed, so fragments on adjacent lines are joined
///   directly.
///
/// # Errors
///
/// Returns `EdgarError::XmlError` when the input contains no markup at all.
///
/// # Example
///
/// ```rust
/// use mdnakit::parsing::markup::narrative_text;
///
/// let text = narrative_text("<html><body><p>Net sales\nrose</p><table><tr><td>42</td></tr></table></body></html>")?;
/// assert_eq!(text, "Net salesrose");
///
/// let legacy = narrative_text("<HTML><BODY><P>Net sales<BR>rose<P>again</BODY></HTML>")?;
/// assert_eq!(legacy, "Net salesroseagain");
/// # Ok::<(), mdnakit::EdgarError>(())
/// ```
pub fn narrative_text(markup: &str) -> Result<String> {
    if !markup.contains('<') {
        return Err(EdgarError::XmlError(
            "document contains no markup".to_string(),
        ));
    }

    let text = match xhtml_text(markup) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("Not well-formed XML ({}), parsing as HTML", e);
            html_text(markup)
        }
    };

    let text = text.replace('\n', "");
    tracing::debug!("Flattened {} bytes of markup into {} chars", markup.len(), text.len());
    Ok(text)
}

/// Strict pass: fails on the first mismatched end tag.
fn xhtml_text(markup: &str) -> Result<String> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(false);

    let mut text = String::with_capacity(markup.len() / 2);
    // Depth inside the current table cell; zero when outside any cell.
    let mut skip_depth: usize = 0;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(EdgarError::XmlError(format!(
                    "{} (at byte {})",
                    e,
                    reader.buffer_position()
                )));
            }
        };

        match event {
            Event::Start(ref e) => {
                if skip_depth > 0 {
                    skip_depth += 1;
                } else if e
                    .local_name()
                    .as_ref()
                    .eq_ignore_ascii_case(TABLE_CELL.as_bytes())
                {
                    skip_depth = 1;
                }
            }
            Event::End(_) => {
                skip_depth = skip_depth.saturating_sub(1);
            }
            Event::Text(ref e) if skip_depth == 0 => {
                let raw = String::from_utf8_lossy(e);
                text.push_str(&decode_html_entities(&raw));
            }
            Event::CData(ref e) if skip_depth == 0 => {
                text.push_str(&String::from_utf8_lossy(e));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

/// Lenient pass over the HTML5 tree; never fails.
fn html_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let mut text = String::with_capacity(markup.len() / 2);

    for node in document.tree.root().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let in_cell = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| element.name().eq_ignore_ascii_case(TABLE_CELL))
        });
        if !in_cell {
            text.push_str(fragment);
        }
    }

    text
}
