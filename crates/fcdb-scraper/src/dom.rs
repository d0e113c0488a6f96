//! A parsed, navigable snapshot of a rendered page.
//!
//! The extraction engine never sees raw HTML or a live browser: the
//! navigator hands it a [`Page`] holding an arena-backed [`Dom`] built once
//! from the response body. Extraction functions operate purely on this
//! in-memory structure, which makes them deterministic and unit-testable
//! against string fixtures.
//!
//! Nodes are stored in document (pre-order) order, so iterating [`Dom::ids`]
//! or [`Dom::descendants`] always matches source order — a requirement for
//! deterministic extraction. Text runs are stored as `#text` nodes so that
//! mixed element/text content keeps its relative order.

use scraper::{ElementRef, Html};

/// Handle into a [`Dom`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Debug)]
struct NodeData {
    /// Lowercased element name, or `"#text"` for a text run.
    tag: String,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    /// Trimmed text for `#text` nodes; empty for elements.
    text: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Arena-backed document tree.
#[derive(Debug)]
pub struct Dom {
    nodes: Vec<NodeData>,
}

/// A navigated page: its URL plus the parsed document.
#[derive(Debug)]
pub struct Page {
    pub url: String,
    pub dom: Dom,
}

impl Page {
    #[must_use]
    pub fn parse(url: &str, html: &str) -> Self {
        Self {
            url: url.to_string(),
            dom: Dom::parse(html),
        }
    }

    /// Path portion of the page URL (`https://host/a/b?q` → `/a/b?q`).
    #[must_use]
    pub fn path(&self) -> &str {
        match self.url.find("://") {
            Some(i) => {
                let rest = &self.url[i + 3..];
                rest.find('/').map_or("/", |j| &rest[j..])
            }
            None => self.url.as_str(),
        }
    }
}

impl Dom {
    /// Parses an HTML document into the arena. Whitespace-only text runs,
    /// comments, and doctypes are dropped.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);
        let mut dom = Self { nodes: Vec::new() };
        dom.add_element(doc.root_element(), None);
        dom
    }

    fn add_element(&mut self, el: ElementRef<'_>, parent: Option<usize>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(NodeData {
            tag: el.value().name().to_ascii_lowercase(),
            classes: el.value().classes().map(str::to_string).collect(),
            attrs: el
                .value()
                .attrs()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                .collect(),
            text: String::new(),
            parent,
            children: Vec::new(),
        });

        for child in el.children() {
            match child.value() {
                scraper::Node::Text(t) => {
                    let trimmed = t.trim();
                    if !trimmed.is_empty() {
                        let tid = self.nodes.len();
                        self.nodes.push(NodeData {
                            tag: "#text".to_string(),
                            classes: Vec::new(),
                            attrs: Vec::new(),
                            text: trimmed.to_string(),
                            parent: Some(idx),
                            children: Vec::new(),
                        });
                        self.nodes[idx].children.push(tid);
                    }
                }
                scraper::Node::Element(_) => {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        let cid = self.add_element(child_el, Some(idx));
                        self.nodes[idx].children.push(cid);
                    }
                }
                _ => {}
            }
        }

        idx
    }

    /// All nodes (elements and text runs) in document order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Element name, or `"#text"` for text runs.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id.0].tag
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent.map(NodeId)
    }

    /// Attribute value by (lowercase) name.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.0]
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// True when any class of the node contains `needle` (case-insensitive;
    /// `needle` must be lowercase).
    #[must_use]
    pub fn class_contains(&self, id: NodeId, needle: &str) -> bool {
        self.nodes[id.0]
            .classes
            .iter()
            .any(|c| c.to_ascii_lowercase().contains(needle))
    }

    /// Subtree of `id`, excluding `id` itself, in document order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[id.0].children.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            out.push(NodeId(i));
            stack.extend(self.nodes[i].children.iter().rev());
        }
        out
    }

    /// Concatenated text of the node's subtree, document order, fragments
    /// joined with single spaces.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.nodes[id.0].tag == "#text" {
            parts.push(&self.nodes[id.0].text);
        }
        for d in self.descendants(id) {
            let node = &self.nodes[d.0];
            if node.tag == "#text" {
                parts.push(&node.text);
            }
        }
        parts.join(" ")
    }

    /// First element with the given (lowercase) tag name, document order.
    #[must_use]
    pub fn first_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.ids().find(|&id| self.nodes[id.0].tag == tag)
    }

    /// Visible-text projection of the `body` element: one line per text run,
    /// skipping `script`/`style`/`noscript` subtrees. Head content (title,
    /// meta) is never part of it. This is what the attribute pattern pass
    /// searches.
    #[must_use]
    pub fn body_text(&self) -> String {
        let mut lines: Vec<&str> = Vec::new();
        if let Some(body) = self.first_by_tag("body") {
            self.collect_text_lines(body.0, &mut lines);
        }
        lines.join("\n")
    }

    fn collect_text_lines<'a>(&'a self, idx: usize, out: &mut Vec<&'a str>) {
        let node = &self.nodes[idx];
        if matches!(node.tag.as_str(), "script" | "style" | "noscript") {
            return;
        }
        if node.tag == "#text" {
            out.push(&node.text);
            return;
        }
        for &c in &node.children {
            self.collect_text_lines(c, out);
        }
    }
}
