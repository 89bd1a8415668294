//! In-memory document tree the page engine mutates.
//!
//! Mirrors the handful of DOM operations the engine needs. Nodes removed
//! from the tree are freed together with their listeners, and their ids
//! stop resolving (slots are generation-checked before reuse).

mod layout;
mod style;

pub use layout::*;
pub use style::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

/// What activating a node does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handler {
    /// Navbar control at this position.
    Navigate(usize),
    Unfurl,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeData {
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub style: Style,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            style: Style::default(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        if let Some((_, existing)) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            *existing = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> + '_ {
        self.attribute("class").unwrap_or("").split_whitespace()
    }
}

#[derive(Clone, Debug)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Vec<Handler>,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Clone, Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document whose root is a `body` element.
    pub fn new() -> Self {
        let mut document = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        };
        document.root = document.allocate(NodeData::Element(Element::new("body")));
        document
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn allocate(&mut self, data: NodeData) -> NodeId {
        let node = Node {
            data,
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.generation += 1;
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index: self.slots.len() - 1,
                generation: 0,
            }
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of allocated nodes, attached or not.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn create_element(&mut self, tag: &'static str) -> NodeId {
        self.allocate(NodeData::Element(Element::new(tag)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.allocate(NodeData::Text(text.into()))
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.node(id).map(|node| &node.data)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.data(id)? {
            NodeData::Element(element) => Some(element),
            NodeData::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(element) => Some(element),
            NodeData::Text(_) => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&'static str> {
        self.element(id).map(|element| element.tag)
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attribute(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &'static str, value: impl Into<String>) {
        if let Some(element) = self.element_mut(id) {
            element.set_attribute(name, value);
        }
    }

    pub fn style(&self, id: NodeId) -> Option<&Style> {
        self.element(id).map(|element| &element.style)
    }

    pub fn set_style(&mut self, id: NodeId, property: &'static str, value: impl Into<String>) {
        if let Some(element) = self.element_mut(id) {
            element.style.set(property, value);
        }
    }

    pub fn remove_style(&mut self, id: NodeId, property: &str) {
        if let Some(element) = self.element_mut(id) {
            element.style.remove(property);
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// Moves `child` (and its subtree) to the end of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) || self.is_inclusive_ancestor(child, parent)
        {
            return;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent(id) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    fn detach(&mut self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.node_mut(id)?.parent.take()?;
        let siblings = &mut self.node_mut(parent)?.children;
        let position = siblings.iter().position(|c| *c == id)?;
        siblings.remove(position);
        Some((parent, position))
    }

    /// Detaches and frees `id` and its subtree, listeners included.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }
        self.detach(id);
        self.free_subtree(id);
    }

    fn free_subtree(&mut self, id: NodeId) {
        let Some(node) = self.slots.get_mut(id.index).and_then(|slot| {
            if slot.generation == id.generation {
                slot.node.take()
            } else {
                None
            }
        }) else {
            return;
        };
        self.free.push(id.index);
        for child in node.children {
            self.free_subtree(child);
        }
    }

    pub fn clear_children(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            if let Some(node) = self.node_mut(child) {
                node.parent = None;
            }
            self.free_subtree(child);
        }
    }

    /// Replaces `id` with a deep copy that carries no listeners.
    pub fn replace_with_clone(&mut self, id: NodeId) -> Option<NodeId> {
        if id == self.root {
            return None;
        }
        let copy = self.clone_subtree(id)?;
        if let Some((parent, position)) = self.detach(id) {
            if let Some(node) = self.node_mut(copy) {
                node.parent = Some(parent);
            }
            if let Some(node) = self.node_mut(parent) {
                node.children.insert(position, copy);
            }
        }
        self.free_subtree(id);
        Some(copy)
    }

    fn clone_subtree(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id)?;
        let data = node.data.clone();
        let children = node.children.clone();
        let copy = self.allocate(data);
        for child in children {
            if let Some(child_copy) = self.clone_subtree(child) {
                self.append_child(copy, child_copy);
            }
        }
        Some(copy)
    }

    /// Puts `id` inside a new `tag` element that takes its place.
    pub fn wrap(&mut self, id: NodeId, tag: &'static str) -> Option<NodeId> {
        if !self.contains(id) {
            return None;
        }
        let wrapper = self.create_element(tag);
        if let Some((parent, position)) = self.detach(id) {
            if let Some(node) = self.node_mut(wrapper) {
                node.parent = Some(parent);
            }
            if let Some(node) = self.node_mut(parent) {
                node.children.insert(position, wrapper);
            }
        }
        self.append_child(wrapper, id);
        Some(wrapper)
    }

    /// Inserts `id` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, id: NodeId) {
        self.append_child(parent, id);
        if let Some(node) = self.node_mut(parent) {
            if let Some(last) = node.children.pop() {
                node.children.insert(0, last);
            }
        }
    }

    /// `id` and its descendants in tree order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut ret = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.node(next) {
                ret.push(next);
                stack.extend(node.children.iter().rev());
            }
        }
        ret
    }

    fn attached_elements(&self) -> impl Iterator<Item = (NodeId, &Element)> + '_ {
        self.descendants(self.root)
            .into_iter()
            .filter_map(|id| self.element(id).map(|element| (id, element)))
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.attached_elements()
            .find(|(_, element)| element.id() == Some(id))
            .map(|(node, _)| node)
    }

    /// First attached element with `class`.
    pub fn query_class(&self, class: &str) -> Option<NodeId> {
        self.attached_elements()
            .find(|(_, element)| element.has_class(class))
            .map(|(node, _)| node)
    }

    pub fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.attached_elements()
            .filter(|(_, element)| element.has_class(class))
            .map(|(node, _)| node)
            .collect()
    }

    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|node| match self.data(node)? {
                NodeData::Text(text) => Some(text.as_str()),
                NodeData::Element(_) => None,
            })
            .collect()
    }

    /// Does nothing if `id` no longer resolves.
    pub fn add_click_listener(&mut self, id: NodeId, handler: Handler) {
        if let Some(node) = self.node_mut(id) {
            node.listeners.push(handler);
        }
    }

    pub fn clear_listeners(&mut self, id: NodeId) {
        if let Some(node) = self.node_mut(id) {
            node.listeners.clear();
        }
    }

    pub fn click_handlers(&self, id: NodeId) -> Vec<Handler> {
        self.node(id)
            .map(|node| node.listeners.clone())
            .unwrap_or_default()
    }
}
