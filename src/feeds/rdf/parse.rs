use super::{Feed, Image, Item, TextInput};
use crate::config::ParseOptions;
use crate::detect::detect_rdf_text;
use crate::error::{FeedError, Format};
use crate::namespaces::{atom, content, dc, slash, sy, NamespaceNormalizer, NamespaceTable};
use crate::tree::{read_tree_with, Node, Value};
use crate::util::{
    detect_namespaces, parse_array_of_limited, parse_singular_of, parse_text_string, trim_object,
};

const STOP_NODES: &[&str] = &[
    "rdf:rdf.channel.description",
    "rdf:rdf.item.description",
    "rdf:rdf.item.content:encoded",
    "rdf.channel.description",
    "rdf.item.description",
    "rdf.item.content:encoded",
];

/// Parses an RDF (RSS 1.0 / 0.90) document.
///
/// `image`, `textinput` and `item` are siblings of `channel` under the root;
/// items nested inside `channel` are accepted as a fallback.
///
/// # Errors
///
/// - [`FeedError::InvalidInput`] when the text is not recognized as RDF or
///   yields no fields at all
/// - [`FeedError::Xml`] / [`FeedError::MaxDepthExceeded`] from the tokenizer
pub fn parse(xml: &str, options: &ParseOptions) -> Result<Feed, FeedError> {
    if !detect_rdf_text(xml) {
        return Err(FeedError::InvalidInput(Format::Rdf));
    }

    let table = NamespaceTable::standard();
    let raw = read_tree_with(xml, STOP_NODES, |name, uri| table.canonical_name(name, uri))?;
    let document = NamespaceNormalizer::new(table).normalize(&raw);

    let root = document
        .get("rdf:rdf")
        .or_else(|| document.get("rdf"))
        .and_then(Value::first)
        .and_then(Value::as_node)
        .ok_or(FeedError::InvalidInput(Format::Rdf))?;

    parse_root(root, options.max_items).ok_or(FeedError::InvalidInput(Format::Rdf))
}

fn parse_root(root: &Node, max_items: Option<usize>) -> Option<Feed> {
    let channel = parse_singular_of(root.get("channel"), |value| value.as_node().cloned())
        .unwrap_or_default();
    let text = |key: &str| parse_singular_of(channel.get(key), parse_text_string);
    let namespaces = detect_namespaces(&channel);

    let items = root.get("item").or_else(|| channel.get("item"));
    let image = root.get("image").or_else(|| channel.get("image"));
    let text_input = root.get("textinput").or_else(|| channel.get("textinput"));

    trim_object(Feed {
        title: text("title"),
        link: text("link"),
        description: text("description"),
        image: parse_singular_of(image, parse_image),
        items: parse_array_of_limited(items, parse_item, max_items),
        text_input: parse_singular_of(text_input, parse_text_input),
        atom: namespaces
            .contains("atom")
            .then(|| atom::retrieve_feed(&channel))
            .flatten(),
        dc: namespaces
            .contains("dc")
            .then(|| dc::retrieve_item_or_feed(&channel))
            .flatten(),
        sy: namespaces
            .contains("sy")
            .then(|| sy::retrieve_feed(&channel))
            .flatten(),
    })
}

/// Images, text inputs and items missing their required fields are dropped.
fn parse_image(value: &Value) -> Option<Image> {
    let node = value.as_node()?;
    let text = |key: &str| parse_singular_of(node.get(key), parse_text_string);
    trim_object(Image {
        title: text("title"),
        link: text("link"),
        url: text("url"),
    })
    .filter(|image| image.title.is_some() && image.link.is_some())
}

fn parse_text_input(value: &Value) -> Option<TextInput> {
    let node = value.as_node()?;
    let text = |key: &str| parse_singular_of(node.get(key), parse_text_string);
    trim_object(TextInput {
        title: text("title"),
        description: text("description"),
        name: text("name"),
        link: text("link"),
    })
    .filter(|input| {
        input.title.is_some()
            && input.description.is_some()
            && input.name.is_some()
            && input.link.is_some()
    })
}

fn parse_item(value: &Value) -> Option<Item> {
    let item = value.as_node()?;
    let text = |key: &str| parse_singular_of(item.get(key), parse_text_string);
    let namespaces = detect_namespaces(item);

    trim_object(Item {
        title: text("title"),
        link: text("link"),
        description: text("description"),
        content: namespaces
            .contains("content")
            .then(|| content::retrieve_item(item))
            .flatten(),
        atom: namespaces
            .contains("atom")
            .then(|| atom::retrieve_entry(item))
            .flatten(),
        dc: namespaces
            .contains("dc")
            .then(|| dc::retrieve_item_or_feed(item))
            .flatten(),
        slash: namespaces
            .contains("slash")
            .then(|| slash::retrieve_item(item))
            .flatten(),
    })
    .filter(|item| item.title.is_some() && item.link.is_some())
}
