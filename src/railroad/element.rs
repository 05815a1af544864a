use std::fmt;

use crate::error::{Error, Result};

use super::attributes::Attributes;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Replaces characters that markdown or markup processors would otherwise
/// pick up with numeric character references.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '*' | '_' | '`' | '[' | ']' | '<' | '>' | '&' => {
                out.push_str("&#");
                out.push_str(&(ch as u32).to_string());
                out.push(';');
            }
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub enum Children {
    Text(String),
    Elements(Vec<Element>),
}

/// Serializable markup node: a tag, its attributes, and either text or
/// child elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attributes: Attributes,
    children: Children,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self::with_attributes(tag, Attributes::new())
    }

    pub fn with_attributes(tag: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            tag: tag.into(),
            attributes,
            children: Children::Text(String::new()),
        }
    }

    pub fn with_text(tag: impl Into<String>, attributes: Attributes, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes,
            children: Children::Text(text.into()),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    pub fn text(&self) -> Option<&str> {
        match &self.children {
            Children::Text(text) => Some(text),
            Children::Elements(_) => None,
        }
    }

    /// Child elements; empty while the node holds text.
    pub fn elements(&self) -> &[Element] {
        match &self.children {
            Children::Text(_) => &[],
            Children::Elements(elements) => elements,
        }
    }

    /// Appends a child. Any text content is discarded.
    pub fn append_child(&mut self, child: Element) {
        match &mut self.children {
            Children::Elements(elements) => elements.push(child),
            Children::Text(_) => self.children = Children::Elements(vec![child]),
        }
    }

    pub fn add_to(self, parent: &mut Element) {
        parent.append_child(self);
    }

    /// Builds live DOM nodes for this element and its subtree.
    pub fn to_dom<D: Document>(&self, document: Option<&D>) -> Result<D::Element> {
        let document = document.ok_or(Error::MissingDocument)?;
        self.build_dom(document)
    }

    fn build_dom<D: Document>(&self, document: &D) -> Result<D::Element> {
        let node = document.create_element_ns(SVG_NS, &self.tag)?;
        for (name, value) in self.attributes.iter() {
            if name == "xlink:href" {
                document.set_attribute_ns(&node, XLINK_NS, "href", value)?;
            } else {
                document.set_attribute(&node, name, value)?;
            }
        }
        match &self.children {
            Children::Text(text) => document.set_text_content(&node, text),
            Children::Elements(elements) => {
                for child in elements {
                    let child = child.build_dom(document)?;
                    document.append_child(&node, &child)?;
                }
            }
        }
        Ok(node)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attributes.is_empty() {
            write!(f, "<{}>", self.tag)?;
        } else {
            write!(f, "<{} {}>", self.tag, self.attributes)?;
        }
        if self.tag == "g" || self.tag == "svg" {
            f.write_str("\n")?;
        }
        match &self.children {
            Children::Text(text) => f.write_str(&escape_text(text))?,
            Children::Elements(elements) => {
                for child in elements {
                    write!(f, "{child}")?;
                }
            }
        }
        writeln!(f, "</{}>", self.tag)
    }
}

/// Minimal document interface needed to materialize elements, e.g. a
/// browser `Document`.
pub trait Document {
    type Element;

    fn create_element_ns(&self, namespace: &str, tag: &str) -> Result<Self::Element>;
    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str) -> Result<()>;
    fn set_attribute_ns(
        &self,
        element: &Self::Element,
        namespace: &str,
        name: &str,
        value: &str,
    ) -> Result<()>;
    fn set_text_content(&self, element: &Self::Element, text: &str);
    fn append_child(&self, parent: &Self::Element, child: &Self::Element) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Default, Clone, PartialEq)]
    pub(crate) struct MockNode {
        pub namespace: String,
        pub tag: String,
        pub attributes: Vec<(Option<String>, String, String)>,
        pub text: String,
        pub children: Vec<usize>,
    }

    /// Arena-backed document; elements are indices into `nodes`.
    #[derive(Debug, Default)]
    pub(crate) struct MockDocument {
        pub nodes: RefCell<Vec<MockNode>>,
    }

    impl Document for MockDocument {
        type Element = usize;

        fn create_element_ns(&self, namespace: &str, tag: &str) -> Result<usize> {
            let mut nodes = self.nodes.borrow_mut();
            nodes.push(MockNode {
                namespace: namespace.to_string(),
                tag: tag.to_string(),
                ..Default::default()
            });
            Ok(nodes.len() - 1)
        }

        fn set_attribute(&self, element: &usize, name: &str, value: &str) -> Result<()> {
            self.nodes.borrow_mut()[*element]
                .attributes
                .push((None, name.to_string(), value.to_string()));
            Ok(())
        }

        fn set_attribute_ns(
            &self,
            element: &usize,
            namespace: &str,
            name: &str,
            value: &str,
        ) -> Result<()> {
            self.nodes.borrow_mut()[*element].attributes.push((
                Some(namespace.to_string()),
                name.to_string(),
                value.to_string(),
            ));
            Ok(())
        }

        fn set_text_content(&self, element: &usize, text: &str) {
            self.nodes.borrow_mut()[*element].text = text.to_string();
        }

        fn append_child(&self, parent: &usize, child: &usize) -> Result<()> {
            self.nodes.borrow_mut()[*parent].children.push(*child);
            Ok(())
        }
    }

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        Attributes::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn escapes_markup_characters_in_text() {
        assert_eq!(escape_text("a<b>&_c*"), "a&#60;b&#62;&#38;&#95;c&#42;");
        assert_eq!(escape_text("[`x`]"), "&#91;&#96;x&#96;&#93;");
        assert_eq!(escape_text("plain \"quoted\""), "plain \"quoted\"");
    }

    #[test]
    fn serializes_text_element() {
        let el = Element::with_text("text", attrs(&[("x", "5"), ("y", "4")]), "a<b");
        assert_eq!(el.to_string(), "<text x=\"5\" y=\"4\">a&#60;b</text>\n");
    }

    #[test]
    fn groups_break_after_opening_tag() {
        let mut g = Element::new("g");
        Element::new("rect").add_to(&mut g);
        assert_eq!(g.to_string(), "<g>\n<rect></rect>\n</g>\n");
    }

    #[test]
    fn appending_discards_text() {
        let mut el = Element::with_text("a", Attributes::new(), "dropped");
        el.append_child(Element::new("text"));
        assert_eq!(el.text(), None);
        assert_eq!(el.elements().len(), 1);
        assert!(!el.to_string().contains("dropped"));
    }

    #[test]
    fn to_dom_requires_document() {
        let el = Element::new("svg");
        let err = el.to_dom::<MockDocument>(None).unwrap_err();
        assert_eq!(err, Error::MissingDocument);
    }

    #[test]
    fn to_dom_routes_xlink_href_through_namespace() {
        let mut a = Element::with_attributes("a", attrs(&[("xlink:href", "#rule")]));
        Element::with_text("text", attrs(&[("class", "comment")]), "see").add_to(&mut a);

        let doc = MockDocument::default();
        let root = a.to_dom(Some(&doc)).unwrap();
        let nodes = doc.nodes.borrow();
        let anchor = &nodes[root];
        assert_eq!(anchor.namespace, SVG_NS);
        assert_eq!(
            anchor.attributes,
            vec![(Some(XLINK_NS.to_string()), "href".to_string(), "#rule".to_string())]
        );
        let text = &nodes[anchor.children[0]];
        assert_eq!(text.tag, "text");
        assert_eq!(text.text, "see");
        assert_eq!(text.attributes[0], (None, "class".to_string(), "comment".to_string()));
    }
}
