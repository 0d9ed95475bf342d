use std::fmt;

use tracing::debug;

use crate::document::{DocumentError, DocumentTree, NodeId};

/// Elements whose contents are never text nodes from the pipeline's point of view.
/// `title` is included so head text is never rewritten.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Markup(String),
    Text(String),
    Element { class: String, content: String },
}

/// An HTML page split into markup and text runs.
///
/// Tags, comments and raw-text element bodies are kept verbatim; everything
/// between them is a text node. Serializing the document gives back the
/// original source, except for text nodes that were replaced by elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlDocument {
    segments: Vec<Segment>,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = source;

        while !rest.is_empty() {
            if rest.starts_with("<!--") {
                let end = rest.find("-->").map(|idx| idx + 3).unwrap_or(rest.len());
                segments.push(Segment::Markup(rest[..end].to_string()));
                rest = &rest[end..];
                continue;
            }

            if starts_tag(rest) {
                let end = tag_end(rest);
                let tag = &rest[..end];
                segments.push(Segment::Markup(tag.to_string()));
                rest = &rest[end..];

                if let Some(name) = raw_text_element(tag) {
                    let closing = format!("</{name}");
                    let body_end = rest
                        .to_ascii_lowercase()
                        .find(&closing)
                        .unwrap_or(rest.len());
                    if body_end > 0 {
                        segments.push(Segment::Markup(rest[..body_end].to_string()));
                    }
                    rest = &rest[body_end..];
                }
                continue;
            }

            let end = rest
                .char_indices()
                .skip(1)
                .find(|(idx, c)| *c == '<' && starts_tag(&rest[*idx..]))
                .map(|(idx, _)| idx)
                .unwrap_or(rest.len());
            segments.push(Segment::Text(rest[..end].to_string()));
            rest = &rest[end..];
        }

        debug!("parsed html document into {} segments", segments.len());

        Self { segments }
    }

    fn segment(&self, node: NodeId) -> Result<&Segment, DocumentError> {
        self.segments
            .get(node.0)
            .ok_or(DocumentError::UnknownNode(node))
    }
}

impl DocumentTree for HtmlDocument {
    fn text_nodes(&self) -> Vec<NodeId> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| matches!(segment, Segment::Text(_)))
            .map(|(idx, _)| NodeId(idx))
            .collect()
    }

    fn text(&self, node: NodeId) -> Option<String> {
        match self.segments.get(node.0)? {
            Segment::Text(raw) => Some(decode_entities(raw)),
            _ => None,
        }
    }

    fn replace_with_element(
        &mut self,
        node: NodeId,
        class: &str,
    ) -> Result<NodeId, DocumentError> {
        if !matches!(self.segment(node)?, Segment::Text(_)) {
            return Err(DocumentError::NotText(node));
        }

        self.segments[node.0] = Segment::Element {
            class: class.to_string(),
            content: String::new(),
        };
        Ok(node)
    }

    fn set_content(&mut self, element: NodeId, html: &str) -> Result<(), DocumentError> {
        match self.segments.get_mut(element.0) {
            Some(Segment::Element { content, .. }) => {
                *content = html.to_string();
                Ok(())
            }
            Some(_) => Err(DocumentError::NotElement(element)),
            None => Err(DocumentError::UnknownNode(element)),
        }
    }
}

impl fmt::Display for HtmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Markup(raw) | Segment::Text(raw) => f.write_str(raw)?,
                Segment::Element { class, content } => {
                    write!(f, r#"<div class="{class}">{content}</div>"#)?
                }
            }
        }
        Ok(())
    }
}

fn starts_tag(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next() == Some('<')
        && chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// Byte offset just past the `>` closing the tag at the start of `s`, ignoring
/// any `>` inside quoted attribute values.
fn tag_end(s: &str) -> usize {
    let mut quote = None;
    for (idx, byte) in s.bytes().enumerate() {
        match (quote, byte) {
            (None, b'"' | b'\'') => quote = Some(byte),
            (Some(open), _) if open == byte => quote = None,
            (None, b'>') => return idx + 1,
            _ => {}
        }
    }
    s.len()
}

fn raw_text_element(tag: &str) -> Option<&'static str> {
    if tag.ends_with("/>") {
        return None;
    }
    let name: String = tag
        .trim_start_matches('<')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    RAW_TEXT_ELEMENTS.into_iter().find(|raw| *raw == name)
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        rest = &rest[start..];

        let reference = rest[1..]
            .find(';')
            .map(|end| &rest[1..end + 1])
            .and_then(|name| Some((name.len() + 2, decode_reference(name)?)));
        match reference {
            Some((consumed, c)) => {
                decoded.push(c);
                rest = &rest[consumed..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

/// Resolves the body of `&...;`: a handful of named entities plus decimal
/// and hex character references.
fn decode_reference(name: &str) -> Option<char> {
    let code = match name {
        "amp" => return Some('&'),
        "lt" => return Some('<'),
        "gt" => return Some('>'),
        "quot" => return Some('"'),
        "apos" => return Some('\''),
        "nbsp" => return Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            match number.strip_prefix(['x', 'X']) {
                Some(hex) if hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
                    u32::from_str_radix(hex, 16).ok()?
                }
                None if number.bytes().all(|b| b.is_ascii_digit()) => number.parse().ok()?,
                _ => return None,
            }
        }
    };
    char::from_u32(code)
}
