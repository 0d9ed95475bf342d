use tracing::debug;

use crate::document::{DocumentTree, NodeId};
use crate::shortcode::ShortcodeToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcodeMatch {
    pub node: NodeId,
    pub token: ShortcodeToken,
}

/// Collects every text node holding exactly one shortcode, in document order.
///
/// The document is only read here; callers mutate it once the scan is done.
pub fn scan<D: DocumentTree + ?Sized>(document: &D) -> Vec<ShortcodeMatch> {
    let matches: Vec<ShortcodeMatch> = document
        .text_nodes()
        .into_iter()
        .filter_map(|node| {
            let text = document.text(node)?;
            let token = ShortcodeToken::parse(&text)?;
            Some(ShortcodeMatch { node, token })
        })
        .collect();

    debug!("found {} shortcodes", matches.len());
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlDocument;

    #[test]
    fn test_scan_selects_only_matching_nodes() {
        let doc = HtmlDocument::parse(
            "<p>[Style-1/Travel/3]</p>\
             <p>Read [Style-1/Travel/3] later</p>\
             <div>\n  [STYLE-2/News/5]  \n</div>\
             <!-- [Style-1/Hidden/1] -->\
             <p>[Style-1/Broken]</p>",
        );

        let matches = scan(&doc);
        let tokens: Vec<String> = matches.iter().map(|m| m.token.to_string()).collect();
        assert_eq!(tokens, vec!["[Style-1/Travel/3]", "[Style-2/News/5]"]);
        assert!(matches[0].node < matches[1].node);
    }

    #[test]
    fn test_scan_ignores_non_ascii_lookalikes() {
        let doc = HtmlDocument::parse(
            "<p>[Style-\u{0663}/Travel/3]</p><p>[\u{017F}tyle-1/Travel/3]</p>",
        );
        assert!(scan(&doc).is_empty());
    }

    #[test]
    fn test_scan_skips_head_title() {
        let doc = HtmlDocument::parse(
            "<html><head><title>[Style-1/Travel/3]</title></head><body></body></html>",
        );
        assert!(scan(&doc).is_empty());
    }

    #[test]
    fn test_scan_empty_document() {
        assert!(scan(&HtmlDocument::parse("")).is_empty());
    }
}
