use crate::error::{Error, Result};

use super::attributes::Attributes;
use super::element::Element;
use super::options::Options;
use super::path::{Cardinal, Path};
use super::{Component, Item, Metrics, Node, container, debug_attributes, determine_gaps, wrap_items};

/// A sequence in which any item may be skipped, as long as one is taken.
#[derive(Debug)]
pub struct OptionalSequence {
    items: Vec<Node>,
    attributes: Attributes,
    options: Options,
    metrics: Metrics,
}

impl OptionalSequence {
    pub fn new<I>(items: I, options: &Options) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        let items = wrap_items(items, options);
        if items.len() < 2 {
            return Err(Error::item_count("OptionalSequence", "at least 2", items.len()));
        }

        let r = options.arc_radius;
        let vs = options.vertical_separation;
        let mut m = Metrics {
            height: items.iter().map(|item| item.metrics().height).sum(),
            down: items[0].metrics().down,
            ..Metrics::default()
        };

        let mut height_so_far = 0.0;
        for (i, item) in items.iter().enumerate() {
            let im = item.metrics();
            height_so_far += im.height;
            m.up = m.up.max(2.0 * r - height_so_far).max(im.up + vs - height_so_far);
            if i > 0 {
                m.down = (m.height + m.down)
                    .max(2.0 * r - m.height)
                    .max(im.down + vs - m.height);
            }
            let item_width = im.width + if im.needs_space { 10.0 } else { 0.0 };
            m.width += item_width.max(r);
            m.width += if i == 0 { r } else { 3.0 * r };
        }

        let mut attributes = Attributes::new();
        attributes.set("class", "optional-sequence");
        debug_attributes(&mut attributes, options, &[m.up, m.down], "optional-sequence");
        Ok(Self {
            items,
            attributes,
            options: options.clone(),
            metrics: m,
        })
    }
}

impl Component for OptionalSequence {
    fn kind(&self) -> &'static str {
        "optional-sequence"
    }

    fn metrics(&self) -> Metrics {
        self.metrics
    }

    fn format(&self, x: f64, y: f64, width: f64) -> Element {
        let o = &self.options;
        let r = o.arc_radius;
        let vs = o.vertical_separation;
        let gaps = determine_gaps(width, self.metrics.width, o);
        let mut g = container("g", &self.attributes);

        Path::new(x, y, o).right(gaps.left).add_to(&mut g);
        Path::new(x + gaps.left + self.metrics.width, y + self.metrics.height, o)
            .right(gaps.right)
            .add_to(&mut g);

        let mut x = x + gaps.left;
        let mut y = y;
        let top = y - self.metrics.up;
        let last = self.items.len() - 1;

        for (i, item) in self.items.iter().enumerate() {
            let im = item.metrics();
            let space = if im.needs_space { 10.0 } else { 0.0 };
            let width = im.width + space;

            if i == 0 {
                Path::new(x, y, o)
                    .arc(Cardinal::South, Cardinal::East)
                    .v_up(y - top - 2.0 * r)
                    .arc(Cardinal::West, Cardinal::North)
                    .right(width - r)
                    .arc(Cardinal::North, Cardinal::East)
                    .v_down(y + im.height - top - 2.0 * r)
                    .arc(Cardinal::West, Cardinal::South)
                    .add_to(&mut g);
                Path::new(x, y, o).right(space + r).add_to(&mut g);
                item.format(x + space + r, y, im.width).add_to(&mut g);
                x += width + r;
                y += im.height;
                continue;
            }

            if i < last {
                Path::new(x, top, o)
                    .right(3.0 * r + width.max(r))
                    .arc(Cardinal::North, Cardinal::East)
                    .v_down(y - top + im.height - 2.0 * r)
                    .arc(Cardinal::West, Cardinal::South)
                    .add_to(&mut g);
            }

            Path::new(x, y, o).right(2.0 * r).add_to(&mut g);
            item.format(x + 2.0 * r, y, im.width).add_to(&mut g);
            Path::new(x + 2.0 * r + im.width, y + im.height, o)
                .right(space + r)
                .add_to(&mut g);
            Path::new(x, y, o)
                .arc(Cardinal::North, Cardinal::East)
                .v_down(im.height + (im.down + vs).max(2.0 * r) - 2.0 * r)
                .arc(Cardinal::West, Cardinal::South)
                .right(width - r)
                .arc(Cardinal::South, Cardinal::East)
                .v_up(im.down + vs - 2.0 * r)
                .arc(Cardinal::West, Cardinal::North)
                .add_to(&mut g);

            x += 3.0 * r + width.max(r);
            y += im.height;
        }
        g
    }

    fn children(&self) -> Vec<&dyn Component> {
        self.items.iter().map(|item| item.as_ref()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::railroad::testing::path_data;

    #[test]
    fn needs_two_items() {
        let err = OptionalSequence::new(["a"], &Options::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn two_terminals() {
        let seq = OptionalSequence::new(["a", "b"], &Options::default()).unwrap();
        let m = seq.metrics();
        assert_eq!(m.width, 117.0);
        assert_eq!((m.up, m.height, m.down), (20.0, 0.0, 20.0));

        let g = seq.format(0.0, 0.0, 117.0);
        assert_eq!(g.attributes().get("class"), Some("optional-sequence"));
        assert_eq!(
            path_data(&g),
            [
                "M 0 0 h 0",
                "M 117 0 h 0",
                "M 0 0 a 10 10 0 0 0 10 -10 v 0 a 10 10 0 0 1 10 -10 h 28.5 a 10 10 0 0 1 10 10 v 0 a 10 10 0 0 0 10 10",
                "M 0 0 h 20",
                "M 48.5 0 h 20",
                "M 97 0 h 20",
                "M 48.5 0 a 10 10 0 0 1 10 10 v 0 a 10 10 0 0 0 10 10 h 28.5 a 10 10 0 0 0 10 -10 v 0 a 10 10 0 0 1 10 -10",
            ]
        );
    }

    #[test]
    fn middle_items_get_a_top_rail() {
        let seq = OptionalSequence::new(["a", "b", "c"], &Options::default()).unwrap();
        let g = seq.format(0.0, 0.0, seq.metrics().width);
        let rails: Vec<String> = path_data(&g)
            .into_iter()
            .filter(|d| d.starts_with("M 48.5 -20"))
            .collect();
        assert_eq!(rails, ["M 48.5 -20 h 68.5 a 10 10 0 0 1 10 10 v 0 a 10 10 0 0 0 10 10"]);
    }
}
