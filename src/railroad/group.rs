use super::attributes::Attributes;
use super::comment::Comment;
use super::element::Element;
use super::options::Options;
use super::path::Path;
use super::{
    Component, Item, Metrics, Node, container, debug_attributes, determine_gaps,
    numeric_attributes,
};

/// An item inside a dashed rounded box, with an optional caption above it.
#[derive(Debug)]
pub struct Group {
    item: Node,
    label: Option<Comment>,
    box_up: f64,
    attributes: Attributes,
    options: Options,
    metrics: Metrics,
}

impl Group {
    /// An empty label is treated as no label.
    pub fn new(item: impl Into<Item>, label: Option<&str>, options: &Options) -> Self {
        let item = item.into().into_node(options);
        let label = label
            .filter(|text| !text.is_empty())
            .map(|text| Comment::new(text, options));
        let r = options.arc_radius;
        let vs = options.vertical_separation;
        let im = item.metrics();

        let box_up = (im.up + vs).max(r);
        let label_metrics = label.as_ref().map(|l| l.metrics());
        let mut m = Metrics {
            width: (im.width + if im.needs_space { 20.0 } else { 0.0 })
                .max(label_metrics.map_or(0.0, |lm| lm.width))
                .max(2.0 * r),
            height: im.height,
            up: box_up,
            down: (im.down + vs).max(r),
            needs_space: true,
        };
        if let Some(lm) = label_metrics {
            m.up += lm.up + lm.height + lm.down;
        }

        let mut attributes = Attributes::new();
        debug_attributes(&mut attributes, options, &[m.up, m.down], "group");
        Self {
            item,
            label,
            box_up,
            attributes,
            options: options.clone(),
            metrics: m,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_ref().map(Comment::text)
    }
}

impl Component for Group {
    fn kind(&self) -> &'static str {
        "group"
    }

    fn metrics(&self) -> Metrics {
        self.metrics
    }

    fn format(&self, x: f64, y: f64, width: f64) -> Element {
        let o = &self.options;
        let r = o.arc_radius;
        let m = &self.metrics;
        let gaps = determine_gaps(width, m.width, o);
        let mut g = container("g", &self.attributes);

        Path::new(x, y, o).h(gaps.left).add_to(&mut g);
        Path::new(x + gaps.left + m.width, y + m.height, o)
            .h(gaps.right)
            .add_to(&mut g);

        let x = x + gaps.left;
        self.item.format(x, y, m.width).add_to(&mut g);

        let mut frame = numeric_attributes(&[
            ("x", x),
            ("y", y - self.box_up),
            ("width", m.width),
            ("height", self.box_up + m.height + m.down),
            ("rx", r),
            ("ry", r),
        ]);
        frame.set("class", "group-box");
        Element::with_attributes("rect", frame).add_to(&mut g);

        if let Some(label) = &self.label {
            let lm = label.metrics();
            label
                .format(x, y - self.box_up - lm.down - lm.height, lm.width)
                .add_to(&mut g);
        }
        g
    }

    fn children(&self) -> Vec<&dyn Component> {
        let mut children: Vec<&dyn Component> = vec![self.item.as_ref()];
        if let Some(label) = &self.label {
            children.push(label);
        }
        children
    }
}
