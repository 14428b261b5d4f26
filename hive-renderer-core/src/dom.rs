//! Small helpers over the `markup5ever_rcdom` tree.

use html5ever::serialize::{SerializeOpts, TraversalScope};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{parse_fragment, serialize, Attribute, LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::RefCell;
use std::rc::Rc;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Parse `html` as `<body>` content and return the fragment's root element.
///
/// Fragment parsing keeps `script`, `style` and `meta` where they appear
/// instead of hoisting them into a `<head>`. The `<html>` wrapper tags are
/// ignored. The `RcDom` is returned alongside since it owns the tree.
pub fn parse_fragment_root(html: &str) -> (RcDom, Option<Handle>) {
    let context = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body"));
    let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new()).one(html);
    let root = find_element(&dom.document, "html");
    (dom, root)
}

/// Serialize the children of `node` as HTML.
pub fn serialize_children(node: &Handle) -> String {
    let mut bytes = Vec::new();
    let handle: SerializableHandle = node.clone().into();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    if let Err(e) = serialize(&mut bytes, &handle, opts) {
        tracing::warn!(error = %e, "HTML serialization failed");
        return String::new();
    }
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Depth-first search for the first element named `name`.
pub fn find_element(node: &Handle, name: &str) -> Option<Handle> {
    if element_name(node).as_deref() == Some(name) {
        return Some(node.clone());
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, name))
}

/// Local name of an element node.
pub fn element_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

pub fn get_attr(node: &Handle, attr: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == attr)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Set `attr`, updating it in place when present so attribute order is stable.
pub fn set_attr(node: &Handle, attr: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        match attrs.iter_mut().find(|a| &*a.name.local == attr) {
            Some(existing) => existing.value = StrTendril::from(value),
            None => attrs.push(attribute(attr, value)),
        }
    }
}

pub fn remove_attr(node: &Handle, attr: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        attrs.borrow_mut().retain(|a| &*a.name.local != attr);
    }
}

/// Concatenated text of every descendant text node.
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        _ => {
            for child in node.children.borrow().iter() {
                collect_text(child, out);
            }
        }
    }
}

pub fn text_node(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from(text)),
    })
}

pub fn element(name: &str, attrs: &[(&str, &str)]) -> Handle {
    Node::new(NodeData::Element {
        name: QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(name)),
        attrs: RefCell::new(attrs.iter().map(|(k, v)| attribute(k, v)).collect()),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

fn attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
        value: StrTendril::from(value),
    }
}

pub fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Replace `node` in its parent with `replacements`, in order.
pub fn replace_node(node: &Handle, replacements: Vec<Handle>) {
    let Some(parent) = node.parent.take().and_then(|weak| weak.upgrade()) else {
        return;
    };
    let mut children = parent.children.borrow_mut();
    let Some(index) = children.iter().position(|child| Rc::ptr_eq(child, node)) else {
        return;
    };
    for replacement in &replacements {
        replacement.parent.set(Some(Rc::downgrade(&parent)));
    }
    let _replaced: Vec<Handle> = children.splice(index..=index, replacements).collect();
}

/// Children snapshot, safe to iterate while the tree is being edited.
pub fn children_of(node: &Handle) -> Vec<Handle> {
    node.children.borrow().clone()
}
