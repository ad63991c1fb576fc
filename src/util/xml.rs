use anyhow::{anyhow, Result};
use roxmltree::{Document, Node, ParsingOptions};

/// Parses an XML document. A DOCTYPE declaration is accepted.
pub fn parse_document(xml: &str) -> Result<Document<'_>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };

    Document::parse_with_options(xml, options)
        .map_err(|why| anyhow!("Failed to parse XML because: {:?}", why))
}

/// Returns the first element named `tag_name` under `node` in document order,
/// `node` itself included. Only the local name is compared.
pub fn find_first<'a, 'input>(node: Node<'a, 'input>, tag_name: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == tag_name)
}

/// Extracts the text of the first element named `tag_name` under `node`.
///
/// The text is returned as sent, without trimming. Returns `None` when no
/// such element exists.
///
/// # Examples
///
/// ```
/// use firstrade_quote::util::xml::{parse_document, parse_value};
///
/// let document = parse_document("<quote><bid> 150.25 </bid></quote>").unwrap();
///
/// assert_eq!(parse_value(document.root(), "bid"), Some(" 150.25 ".to_string()));
/// assert_eq!(parse_value(document.root(), "ask"), None);
/// ```
pub fn parse_value(node: Node, tag_name: &str) -> Option<String> {
    find_first(node, tag_name).map(text_content)
}

/// Concatenates every text node under `node`, CDATA sections included.
pub fn text_content(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
