use super::*;

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) disabled: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let disabled = attrs.contains_key("disabled");
        let element = Element {
            tag_name,
            attrs,
            value,
            disabled,
        };
        let id = self.create_node(Some(parent), NodeType::Element(element));
        if let Some(id_attr) = self
            .element(id)
            .and_then(|element| element.attrs.get("id").cloned())
        {
            // First element wins, matching getElementById.
            self.id_index.entry(id_attr).or_insert(id);
        }
        id
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes[node_id.0].node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node_id.0].node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn is_tag(&self, node_id: NodeId, tag: &str) -> bool {
        self.tag_name(node_id)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes[node_id.0].parent
    }

    pub(crate) fn parent_element(&self, node_id: NodeId) -> Option<NodeId> {
        self.parent(node_id)
            .filter(|parent| self.element(*parent).is_some())
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.id_index.get(id).copied()
    }

    pub(crate) fn by_id_all(&self, id: &str) -> Vec<NodeId> {
        self.all_element_nodes()
            .into_iter()
            .filter(|node| self.attr(*node, "id").as_deref() == Some(id))
            .collect()
    }

    pub(crate) fn find_ancestor_by_tag(&self, node_id: NodeId, tag: &str) -> Option<NodeId> {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if self.is_tag(current, tag) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|e| e.attrs.get(&name.to_ascii_lowercase()).cloned())
    }

    pub(crate) fn has_attr(&self, node_id: NodeId, name: &str) -> Result<bool> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Runtime("hasAttribute target is not an element".into()))?;
        Ok(element.attrs.contains_key(&name.to_ascii_lowercase()))
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("setAttribute target is not an element".into()))?;
        element.attrs.insert(lowered.clone(), value.to_string());
        if lowered == "disabled" {
            element.disabled = true;
        }
        if lowered == "id" {
            self.rebuild_id_index();
        }
        Ok(())
    }

    pub(crate) fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("removeAttribute target is not an element".into()))?;
        element.attrs.remove(&lowered);
        if lowered == "disabled" {
            element.disabled = false;
        }
        if lowered == "id" {
            self.rebuild_id_index();
        }
        Ok(())
    }

    fn rebuild_id_index(&mut self) {
        let mut next = HashMap::new();
        for node in self.all_element_nodes() {
            if let Some(id) = self.attr(node, "id") {
                next.entry(id).or_insert(node);
            }
        }
        self.id_index = next;
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|element| element.disabled)
    }

    pub(crate) fn class_contains(&self, node_id: NodeId, class_name: &str) -> Result<bool> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Runtime("classList target is not an element".into()))?;
        Ok(has_class(element, class_name))
    }

    pub(crate) fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("classList target is not an element".into()))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("classList target is not an element".into()))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        classes.retain(|name| name != class_name);
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn class_toggle(&mut self, node_id: NodeId, class_name: &str) -> Result<bool> {
        if self.class_contains(node_id, class_name)? {
            self.class_remove(node_id, class_name)?;
            Ok(false)
        } else {
            self.class_add(node_id, class_name)?;
            Ok(true)
        }
    }

    pub(crate) fn style_property(&self, node_id: NodeId, name: &str) -> Option<String> {
        let style = self.attr(node_id, "style");
        let name = name.to_ascii_lowercase();
        parse_style_declarations(style.as_deref())
            .into_iter()
            .find(|(decl, _)| *decl == name)
            .map(|(_, value)| value)
    }

    pub(crate) fn set_style_property(
        &mut self,
        node_id: NodeId,
        name: &str,
        value: &str,
    ) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let mut decls = parse_style_declarations(self.attr(node_id, "style").as_deref());
        if let Some(pos) = decls.iter().position(|(decl, _)| *decl == name) {
            decls[pos].1 = value.to_string();
        } else {
            decls.push((name, value.to_string()));
        }
        self.set_attr(node_id, "style", &serialize_style_declarations(&decls))
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document | NodeType::Element(_) => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
            NodeType::Text(text) => text.clone(),
        }
    }

    pub(crate) fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self.element(node_id).is_none() {
            return Err(Error::Runtime("textContent target is not an element".into()));
        }
        let old_children = std::mem::take(&mut self.nodes[node_id.0].children);
        let mut dropped_elements = false;
        for child in old_children {
            self.nodes[child.0].parent = None;
            dropped_elements |= self.element(child).is_some();
        }
        if dropped_elements {
            self.rebuild_id_index();
        }
        if !value.is_empty() {
            self.create_text(node_id, value.to_string());
        }
        Ok(())
    }

    pub(crate) fn has_element_or_text_children(&self, node_id: NodeId) -> bool {
        self.nodes[node_id.0]
            .children
            .iter()
            .any(|child| match &self.nodes[child.0].node_type {
                NodeType::Element(_) => true,
                NodeType::Text(text) => !text.is_empty(),
                NodeType::Document => false,
            })
    }

    pub(crate) fn value(&self, node_id: NodeId) -> Result<String> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Runtime("value target is not an element".into()))?;
        Ok(element.value.clone())
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("value target is not an element".into()))?;
        element.value = value.to_string();
        Ok(())
    }

    /// Value a control returns to on form reset.
    pub(crate) fn default_value(&self, node_id: NodeId) -> String {
        if self.is_tag(node_id, "textarea") {
            return self.text_content(node_id);
        }
        if self.is_tag(node_id, "select") {
            let options = self.select_options(node_id);
            let chosen = options
                .iter()
                .copied()
                .find(|option| self.attr(*option, "selected").is_some())
                .or_else(|| options.first().copied());
            return chosen
                .map(|option| self.option_value(option))
                .unwrap_or_default();
        }
        self.attr(node_id, "value").unwrap_or_default()
    }

    fn select_options(&self, select: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_descendants_dfs(select, &mut out);
        out.retain(|node| self.is_tag(*node, "option"));
        out
    }

    fn option_value(&self, option: NodeId) -> String {
        self.attr(option, "value")
            .unwrap_or_else(|| self.text_content(option).trim().to_string())
    }

    pub(crate) fn initialize_form_control_values(&mut self) -> Result<()> {
        for node in self.all_element_nodes() {
            if self.is_tag(node, "textarea") || self.is_tag(node, "select") {
                let initial = self.default_value(node);
                self.set_value(node, &initial)?;
            }
        }
        Ok(())
    }

    pub(crate) fn previous_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let children = &self.nodes[parent.0].children;
        let pos = children.iter().position(|id| *id == node_id)?;
        children[..pos]
            .iter()
            .rev()
            .copied()
            .find(|sibling| self.element(*sibling).is_some())
    }

    pub(crate) fn is_first_element_child(&self, node_id: NodeId) -> bool {
        self.previous_element_sibling(node_id).is_none() && self.parent(node_id).is_some()
    }

    pub(crate) fn is_last_element_child(&self, node_id: NodeId) -> bool {
        let Some(parent) = self.parent(node_id) else {
            return false;
        };
        self.nodes[parent.0]
            .children
            .iter()
            .rev()
            .copied()
            .find(|child| self.element(*child).is_some())
            == Some(node_id)
    }

    pub(crate) fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        if matches!(self.nodes[node_id.0].node_type, NodeType::Element(_)) {
            out.push(node_id);
        }
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    pub(crate) fn collect_elements_descendants_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    pub(crate) fn all_element_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_dfs(self.root, &mut out);
        out
    }

    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out
            }
            NodeType::Text(text) => text.clone(),
            NodeType::Element(element) => {
                let mut attrs = element.attrs.iter().collect::<Vec<_>>();
                attrs.sort();
                let mut out = String::new();
                out.push('<');
                out.push_str(&element.tag_name);
                for (k, v) in attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(v);
                    out.push('"');
                }
                out.push('>');
                if is_void_tag(&element.tag_name) {
                    return out;
                }
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
                out
            }
        }
    }
}

pub(crate) fn is_form_control(dom: &Dom, node_id: NodeId) -> bool {
    ["input", "textarea", "select", "button"]
        .iter()
        .any(|tag| dom.is_tag(node_id, tag))
}

pub(crate) fn is_submit_control(dom: &Dom, node_id: NodeId) -> bool {
    let kind = dom
        .attr(node_id, "type")
        .map(|kind| kind.to_ascii_lowercase());
    if dom.is_tag(node_id, "button") {
        return kind.as_deref().is_none_or(|kind| kind == "submit");
    }
    dom.is_tag(node_id, "input") && kind.as_deref() == Some("submit")
}
