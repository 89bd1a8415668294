use crate::dom::{Document, NodeData, NodeId};
use yew::{
    virtual_dom::{VNode, VTag, VText},
    Html,
};

/// Serializes a node and its subtree, inline styles included.
pub fn node_html(document: &Document, node: NodeId) -> Html {
    match document.data(node) {
        Some(NodeData::Text(text)) => VNode::from(VText::new(text.clone())),
        Some(NodeData::Element(element)) => {
            let mut tag = VTag::new(element.tag);
            for (name, value) in &element.attributes {
                tag.add_attribute(*name, value.clone());
            }
            if !element.style.is_empty() {
                tag.add_attribute("style", element.style.to_string());
            }
            for child in document.children(node) {
                tag.add_child(node_html(document, *child));
            }
            VNode::from(tag)
        }
        None => Html::default(),
    }
}

/// Just the children, e.g. to place the root's content inside `<body>`.
pub fn children_html(document: &Document, node: NodeId) -> Html {
    document
        .children(node)
        .iter()
        .map(|child| node_html(document, *child))
        .collect::<Html>()
}
