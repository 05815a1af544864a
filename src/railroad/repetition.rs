use super::attributes::Attributes;
use super::choice::Optional;
use super::element::Element;
use super::options::Options;
use super::path::{Cardinal, Path};
use super::skip::Skip;
use super::{Component, Item, Metrics, Node, container, debug_attributes, determine_gaps};

/// An item with a loop back underneath it, optionally through a separator.
#[derive(Debug)]
pub struct OneOrMore {
    item: Node,
    separator: Node,
    attributes: Attributes,
    options: Options,
    metrics: Metrics,
}

impl OneOrMore {
    pub fn new(item: impl Into<Item>, separator: Option<Item>, options: &Options) -> Self {
        let item = item.into().into_node(options);
        let separator = match separator {
            Some(separator) => separator.into_node(options),
            None => Box::new(Skip::new(options)),
        };
        let r = options.arc_radius;
        let im = item.metrics();
        let sm = separator.metrics();
        let m = Metrics {
            width: im.width.max(sm.width) + 2.0 * r,
            height: im.height,
            up: im.up,
            down: (2.0 * r)
                .max(im.down + options.vertical_separation + sm.up + sm.height + sm.down),
            needs_space: true,
        };
        let mut attributes = Attributes::new();
        debug_attributes(&mut attributes, options, &[m.up, m.height, m.down], "one-or-more");
        Self {
            item,
            separator,
            attributes,
            options: options.clone(),
            metrics: m,
        }
    }
}

impl Component for OneOrMore {
    fn kind(&self) -> &'static str {
        "one-or-more"
    }

    fn metrics(&self) -> Metrics {
        self.metrics
    }

    fn format(&self, x: f64, y: f64, width: f64) -> Element {
        let o = &self.options;
        let r = o.arc_radius;
        let m = &self.metrics;
        let im = self.item.metrics();
        let sm = self.separator.metrics();
        let gaps = determine_gaps(width, m.width, o);
        let mut g = container("g", &self.attributes);

        Path::new(x, y, o).h(gaps.left).add_to(&mut g);
        Path::new(x + gaps.left + m.width, y + m.height, o)
            .h(gaps.right)
            .add_to(&mut g);

        let x = x + gaps.left;

        Path::new(x, y, o).right(r).add_to(&mut g);
        self.item.format(x + r, y, m.width - 2.0 * r).add_to(&mut g);
        Path::new(x + m.width - r, y + m.height, o)
            .right(r)
            .add_to(&mut g);

        let distance = (2.0 * r).max(im.height + im.down + o.vertical_separation + sm.up);
        Path::new(x + r, y, o)
            .arc(Cardinal::North, Cardinal::West)
            .v_down(distance - 2.0 * r)
            .arc(Cardinal::West, Cardinal::South)
            .add_to(&mut g);
        self.separator
            .format(x + r, y + distance, m.width - 2.0 * r)
            .add_to(&mut g);
        Path::new(x + m.width - r, y + distance + sm.height, o)
            .arc(Cardinal::South, Cardinal::East)
            .v_up(distance - 2.0 * r + sm.height - im.height)
            .arc(Cardinal::East, Cardinal::North)
            .add_to(&mut g);
        g
    }

    fn children(&self) -> Vec<&dyn Component> {
        vec![self.item.as_ref(), self.separator.as_ref()]
    }
}

/// `OneOrMore` that can also be bypassed entirely.
#[derive(Debug)]
pub struct ZeroOrMore {
    optional: Optional,
}

impl ZeroOrMore {
    pub fn new(item: impl Into<Item>, separator: Option<Item>, options: &Options) -> Self {
        let repeat = OneOrMore::new(item, separator, options);
        let height = repeat.metrics().height;
        let mut optional = Optional::new(repeat, true, options);
        optional.override_height(height, "zero-or-more");
        Self { optional }
    }
}

impl Component for ZeroOrMore {
    fn kind(&self) -> &'static str {
        "zero-or-more"
    }

    fn metrics(&self) -> Metrics {
        self.optional.metrics()
    }

    fn format(&self, x: f64, y: f64, width: f64) -> Element {
        self.optional.format(x, y, width)
    }

    fn children(&self) -> Vec<&dyn Component> {
        self.optional.children()
    }
}
