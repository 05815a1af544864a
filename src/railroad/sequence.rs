use super::attributes::Attributes;
use super::element::Element;
use super::options::Options;
use super::path::Path;
use super::{Component, Item, Metrics, Node, container, debug_attributes, determine_gaps, wrap_items};

/// Items one after another along a single line.
#[derive(Debug)]
pub struct Sequence {
    items: Vec<Node>,
    attributes: Attributes,
    options: Options,
    metrics: Metrics,
}

impl Sequence {
    pub fn new<I>(items: I, options: &Options) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        let items = wrap_items(items, options);
        let mut m = Metrics {
            needs_space: true,
            ..Metrics::default()
        };
        for item in &items {
            let im = item.metrics();
            m.width += im.width + if im.needs_space { 20.0 } else { 0.0 };
            m.height += im.height;
            m.up = m.up.max(im.up - m.height);
            m.down = (m.down - m.height).max(im.down);
        }
        if items.first().is_some_and(|item| item.metrics().needs_space) {
            m.width -= 10.0;
        }
        if items.last().is_some_and(|item| item.metrics().needs_space) {
            m.width -= 10.0;
        }

        let mut attributes = Attributes::new();
        debug_attributes(&mut attributes, options, &[m.up, m.down], "sequence");
        Self {
            items,
            attributes,
            options: options.clone(),
            metrics: m,
        }
    }

    pub fn items(&self) -> &[Node] {
        &self.items
    }
}

impl Component for Sequence {
    fn kind(&self) -> &'static str {
        "sequence"
    }

    fn metrics(&self) -> Metrics {
        self.metrics
    }

    fn format(&self, x: f64, y: f64, width: f64) -> Element {
        let o = &self.options;
        let gaps = determine_gaps(width, self.metrics.width, o);
        let mut g = container("g", &self.attributes);

        Path::new(x, y, o).h(gaps.left).add_to(&mut g);
        Path::new(x + gaps.left + self.metrics.width, y + self.metrics.height, o)
            .h(gaps.right)
            .add_to(&mut g);

        let mut x = x + gaps.left;
        let mut y = y;
        let last = self.items.len().saturating_sub(1);
        for (i, item) in self.items.iter().enumerate() {
            let im = item.metrics();
            if im.needs_space && i > 0 {
                Path::new(x, y, o).h(10.0).add_to(&mut g);
                x += 10.0;
            }
            item.format(x, y, im.width).add_to(&mut g);
            x += im.width;
            y += im.height;
            if im.needs_space && i < last {
                Path::new(x, y, o).h(10.0).add_to(&mut g);
                x += 10.0;
            }
        }
        g
    }

    fn children(&self) -> Vec<&dyn Component> {
        self.items.iter().map(|item| item.as_ref()).collect()
    }
}
