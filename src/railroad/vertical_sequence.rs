use crate::error::{Error, Result};

use super::attributes::Attributes;
use super::element::Element;
use super::options::Options;
use super::path::Path;
use super::{Component, Item, Metrics, Node, container, debug_attributes, determine_gaps, wrap_items};

/// Items listed top to bottom, each joined to the next by a short drop.
#[derive(Debug)]
pub struct VerticalSequence {
    items: Vec<Node>,
    attributes: Attributes,
    options: Options,
    metrics: Metrics,
}

impl VerticalSequence {
    pub fn new<I>(items: I, options: &Options) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        let items = wrap_items(items, options);
        if items.is_empty() {
            return Err(Error::item_count("VerticalSequence", "at least 1", 0));
        }

        let vs = options.vertical_separation;
        let sizes: Vec<Metrics> = items.iter().map(|item| item.metrics()).collect();
        let mut width = sizes
            .iter()
            .map(|m| m.width + if m.needs_space { 20.0 } else { 0.0 })
            .fold(f64::NEG_INFINITY, f64::max);
        if sizes.len() > 1 {
            width += 2.0 * options.arc_radius;
        }
        let height = sizes
            .windows(2)
            .map(|pair| pair[0].height + pair[0].down + pair[1].up + 2.0 * vs)
            .sum();

        let m = Metrics {
            width,
            height,
            up: sizes[0].up,
            down: sizes[sizes.len() - 1].down,
            needs_space: true,
        };
        let mut attributes = Attributes::new();
        debug_attributes(&mut attributes, options, &[m.up, m.down], "vertical-sequence");
        Ok(Self {
            items,
            attributes,
            options: options.clone(),
            metrics: m,
        })
    }
}

impl Component for VerticalSequence {
    fn kind(&self) -> &'static str {
        "vertical-sequence"
    }

    fn metrics(&self) -> Metrics {
        self.metrics
    }

    fn format(&self, x: f64, y: f64, width: f64) -> Element {
        let o = &self.options;
        let vs = o.vertical_separation;
        let gaps = determine_gaps(width, self.metrics.width, o);
        let mut g = container("g", &self.attributes);

        Path::new(x, y, o).h(gaps.left).add_to(&mut g);

        let start = x;
        let (mut x, mut y) = (x, y);
        // connectors drop from the middle of the narrowest item
        let min_width = self
            .items
            .iter()
            .map(|item| item.metrics().width)
            .fold(1000.0, f64::min);
        let last = self.items.len() - 1;

        for (i, item) in self.items.iter().enumerate() {
            let im = item.metrics();
            item.format(x, y, im.width).add_to(&mut g);
            y += im.height;
            if i == last {
                x += im.width;
                y += im.height;
            } else {
                x += min_width / 2.0;
                y += im.down;
                Path::new(x, y, o).v(2.0 * vs).add_to(&mut g);
                y += self.items[i + 1].metrics().up + 2.0 * vs;
                x = start;
            }
        }

        if self.items.len() > 1 {
            let last_width = self.items[last].metrics().width;
            Path::new(x, y, o)
                .h(self.metrics.width - last_width)
                .add_to(&mut g);
            x += o.arc_radius;
        }
        Path::new(x, y, o).h(gaps.right).add_to(&mut g);
        g
    }

    fn children(&self) -> Vec<&dyn Component> {
        self.items.iter().map(|item| item.as_ref()).collect()
    }
}
