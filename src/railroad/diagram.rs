use std::fmt;

use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::attributes::Attributes;
use super::element::{Document, Element, SVG_NS, XLINK_NS};
use super::options::Options;
use super::path::Path;
use super::start::{End, Start, TerminusStyle};
use super::style::DEFAULT_STYLE;
use super::{Item, Metrics, Node, Terminus, Walk, fmt_num, wrap_items};

/// Space around a diagram. Unset sides fall back to `top`, which defaults
/// to 20.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Resolved {
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: Some(value),
            ..Self::default()
        }
    }

    fn resolve(&self) -> Resolved {
        let top = self.top.unwrap_or(20.0);
        Resolved {
            top,
            right: self.right.unwrap_or(top),
            bottom: self.bottom.unwrap_or(top),
            left: self.left.unwrap_or(top),
        }
    }
}

/// Root of a railroad diagram: a row of items between a start and an end
/// marker, drawn into an `<svg>` element.
#[derive(Debug)]
pub struct Diagram {
    items: Vec<Node>,
    attributes: Attributes,
    options: Options,
    metrics: Metrics,
    drawn: OnceCell<Element>,
}

impl Diagram {
    /// Adds simple start and end markers unless the items already begin
    /// and finish with one.
    pub fn new<I>(items: I, options: &Options) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        let mut items = wrap_items(items, options);
        if !matches!(first_terminus(&items), Some(Terminus::Start(_))) {
            items.insert(0, Box::new(Start::new(TerminusStyle::Simple, None, options)));
        }
        if !matches!(last_terminus(&items), Some(Terminus::End(_))) {
            items.push(Box::new(End::new(TerminusStyle::Simple, options)));
        }
        Self::build(items, options)
    }

    /// Like `new`, but with the single-tick markers used for fragments.
    /// Simple markers already present are swapped for complex ones.
    pub fn complex<I>(items: I, options: &Options) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        let mut items = wrap_items(items, options);
        let start: Node = Box::new(Start::new(TerminusStyle::Complex, None, options));
        match first_terminus(&items) {
            Some(Terminus::Start(TerminusStyle::Complex)) => {}
            Some(Terminus::Start(_)) => items[0] = start,
            _ => items.insert(0, start),
        }
        let end: Node = Box::new(End::new(TerminusStyle::Complex, options));
        match last_terminus(&items) {
            Some(Terminus::End(TerminusStyle::Complex)) => {}
            Some(Terminus::End(_)) => {
                let last = items.len() - 1;
                items[last] = end;
            }
            _ => items.push(end),
        }
        Self::build(items, options)
    }

    fn build(items: Vec<Node>, options: &Options) -> Self {
        let mut m = Metrics::default();
        for item in &items {
            let im = item.metrics();
            m.width += im.width + if im.needs_space { 20.0 } else { 0.0 };
            m.height += im.height;
            m.up = m.up.max(im.up - m.height);
            m.down = (m.down - m.height).max(im.down);
        }
        let mut attributes = Attributes::new();
        attributes.set("class", options.diagram_class.clone());
        Self {
            items,
            attributes,
            options: options.clone(),
            metrics: m,
            drawn: OnceCell::new(),
        }
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn items(&self) -> &[Node] {
        &self.items
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Every node of the diagram, pre-order.
    pub fn walk(&self) -> Walk<'_> {
        Walk::over(&self.items)
    }

    /// Lays the diagram out once. Later calls return the first drawing
    /// unchanged, whatever padding they pass.
    pub fn format(&self, x: f64, y: f64, width: f64, padding: Padding) -> Result<&Element> {
        if width != 0.0 {
            return Err(Error::DiagramWidth(width));
        }
        Ok(self.drawn.get_or_init(|| self.draw(x, y, padding)))
    }

    fn drawing(&self) -> &Element {
        self.drawn
            .get_or_init(|| self.draw(0.0, 0.0, Padding::default()))
    }

    fn draw(&self, x: f64, y: f64, padding: Padding) -> Element {
        let o = &self.options;
        let m = &self.metrics;
        let padding = padding.resolve();
        let mut x = x + padding.left;
        let mut y = y + padding.top + m.up;

        let mut transform = Attributes::new();
        if o.stroke_odd_pixel_length {
            transform.set("transform", "translate(.5 .5)");
        }
        let mut g = Element::with_attributes("g", transform);

        for item in &self.items {
            let im = item.metrics();
            if im.needs_space {
                Path::new(x, y, o).h(10.0).add_to(&mut g);
                x += 10.0;
            }
            item.format(x, y, im.width).add_to(&mut g);
            x += im.width;
            y += im.height;
            if im.needs_space {
                Path::new(x, y, o).h(10.0).add_to(&mut g);
                x += 10.0;
            }
        }

        let width = fmt_num(m.width + padding.left + padding.right);
        let height = fmt_num(m.up + m.height + m.down + padding.top + padding.bottom);
        debug!(width = %width, height = %height, items = self.items.len(), "formatted diagram");

        let view_box = format!("0 0 {width} {height}");
        let mut attributes = self.attributes.clone();
        attributes.set("width", width);
        attributes.set("height", height);
        attributes.set("viewBox", view_box);

        let mut svg = Element::with_attributes("svg", attributes);
        g.add_to(&mut svg);
        svg
    }

    /// Markup with the namespace declarations and an embedded stylesheet,
    /// usable as a file on its own. The diagram itself is left untouched.
    pub fn to_standalone(&self, style: Option<&str>) -> String {
        let mut svg = self.drawing().clone();
        let css = style.filter(|css| !css.is_empty()).unwrap_or(DEFAULT_STYLE);
        Element::with_text("style", Attributes::new(), css).add_to(&mut svg);
        svg.attributes_mut().set("xmlns", SVG_NS);
        svg.attributes_mut().set("xmlns:xlink", XLINK_NS);
        svg.to_string()
    }

    pub fn to_dom<D: Document>(&self, document: Option<&D>) -> Result<D::Element> {
        self.drawing().to_dom(document)
    }

    pub fn to_element(&self) -> &Element {
        self.drawing()
    }
}

fn first_terminus(items: &[Node]) -> Option<Terminus> {
    items.first().and_then(|item| item.terminus())
}

fn last_terminus(items: &[Node]) -> Option<Terminus> {
    items.last().and_then(|item| item.terminus())
}

impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.drawing().fmt(f)
    }
}
