use crate::error::{Error, Result};

use super::attributes::Attributes;
use super::element::Element;
use super::options::Options;
use super::path::{Cardinal, Path};
use super::{Component, Item, Metrics, Node, container, debug_attributes, determine_gaps, wrap_items};

/// Items placed top to bottom, each line wrapping back to the left edge.
#[derive(Debug)]
pub struct Stack {
    items: Vec<Node>,
    attributes: Attributes,
    options: Options,
    metrics: Metrics,
}

impl Stack {
    pub fn new<I>(items: I, options: &Options) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        let items = wrap_items(items, options);
        let (Some(first), Some(last)) = (items.first(), items.last()) else {
            return Err(Error::item_count("Stack", "at least 1", 0));
        };

        let r = options.arc_radius;
        let vs = options.vertical_separation;
        let mut m = Metrics {
            needs_space: true,
            up: first.metrics().up,
            down: last.metrics().down,
            ..Metrics::default()
        };
        for item in &items {
            let im = item.metrics();
            m.width = m.width.max(im.width + if im.needs_space { 20.0 } else { 0.0 });
        }
        if items.len() > 1 {
            m.width += 2.0 * r;
        }
        let last_idx = items.len() - 1;
        for (i, item) in items.iter().enumerate() {
            let im = item.metrics();
            m.height += im.height;
            if i > 0 {
                m.height += (2.0 * r).max(im.up + vs);
            }
            if i < last_idx {
                m.height += (2.0 * r).max(im.down + vs);
            }
        }

        let mut attributes = Attributes::new();
        debug_attributes(&mut attributes, options, &[m.up, m.down], "stack");
        Ok(Self {
            items,
            attributes,
            options: options.clone(),
            metrics: m,
        })
    }

    pub fn items(&self) -> &[Node] {
        &self.items
    }
}

impl Component for Stack {
    fn kind(&self) -> &'static str {
        "stack"
    }

    fn metrics(&self) -> Metrics {
        self.metrics
    }

    fn format(&self, x: f64, y: f64, width: f64) -> Element {
        let o = &self.options;
        let r = o.arc_radius;
        let vs = o.vertical_separation;
        let multiple = self.items.len() > 1;
        let gaps = determine_gaps(width, self.metrics.width, o);
        let mut g = container("g", &self.attributes);

        Path::new(x, y, o).h(gaps.left).add_to(&mut g);

        let mut x = x + gaps.left;
        let mut y = y;
        let start = x;
        if multiple {
            Path::new(x, y, o).h(r).add_to(&mut g);
            x += r;
        }

        let inner_width = self.metrics.width - if multiple { 2.0 * r } else { 0.0 };
        let last = self.items.len() - 1;
        for (i, item) in self.items.iter().enumerate() {
            let im = item.metrics();
            item.format(x, y, inner_width).add_to(&mut g);
            x += inner_width;
            y += im.height;

            if i != last {
                let next = self.items[i + 1].metrics();
                Path::new(x, y, o)
                    .arc(Cardinal::North, Cardinal::East)
                    .v_down((im.down + vs - 2.0 * r).max(0.0))
                    .arc(Cardinal::East, Cardinal::South)
                    .left(inner_width)
                    .arc(Cardinal::North, Cardinal::West)
                    .v_down((next.up + vs - 2.0 * r).max(0.0))
                    .arc(Cardinal::West, Cardinal::South)
                    .add_to(&mut g);
                y += (im.down + vs).max(2.0 * r) + (next.up + vs).max(2.0 * r);
                x = start + r;
            }
        }

        if multiple {
            Path::new(x, y, o).h(r).add_to(&mut g);
            x += r;
        }
        Path::new(x, y, o).h(gaps.right).add_to(&mut g);
        g
    }

    fn children(&self) -> Vec<&dyn Component> {
        self.items.iter().map(|item| item.as_ref()).collect()
    }
}
