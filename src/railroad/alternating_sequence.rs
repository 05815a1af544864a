use std::f64::consts::SQRT_2;

use crate::error::{Error, Result};

use super::attributes::Attributes;
use super::element::Element;
use super::options::Options;
use super::path::{Cardinal, Compass, Path, Spin};
use super::{Component, Item, Metrics, Node, container, debug_attributes, determine_gaps, wrap_items};

/// Two items that may repeat alternately, drawn as a braided crossing.
#[derive(Debug)]
pub struct AlternatingSequence {
    first: Node,
    second: Node,
    attributes: Attributes,
    options: Options,
    metrics: Metrics,
}

/// Horizontal and vertical reach of the crossing between the two loops.
struct Crossing {
    arc_x: f64,
    arc_y: f64,
    cross_x: f64,
    cross_y: f64,
}

impl Crossing {
    fn new(options: &Options) -> Self {
        let r = options.arc_radius;
        let arc_x = 2.0 * r / SQRT_2;
        let arc_y = 2.0 * r * (1.0 - 1.0 / SQRT_2);
        let cross_y = r.max(options.vertical_separation);
        Self {
            arc_x,
            arc_y,
            cross_x: (cross_y - arc_y) + arc_x,
            cross_y,
        }
    }
}

impl AlternatingSequence {
    pub fn new<I>(items: I, options: &Options) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        let [first, second]: [Node; 2] = wrap_items(items, options)
            .try_into()
            .map_err(|items: Vec<Node>| {
                Error::item_count("AlternatingSequence", "exactly 2", items.len())
            })?;

        let r = options.arc_radius;
        let vs = options.vertical_separation;
        let fm = first.metrics();
        let sm = second.metrics();
        let crossing = Crossing::new(options);

        let first_out = (2.0 * r + crossing.cross_y / 2.0).max(vs + fm.down + crossing.cross_y / 2.0);
        let second_in = (2.0 * r + crossing.cross_y / 2.0).max(vs + sm.up + crossing.cross_y / 2.0);
        let spaced = |m: &Metrics| m.width + if m.needs_space { 20.0 } else { 0.0 };

        let m = Metrics {
            width: 4.0 * r + (spaced(&fm) + crossing.cross_x).max(spaced(&sm)),
            height: 0.0,
            up: first_out + fm.height + fm.up,
            down: second_in + sm.height + sm.down,
            needs_space: false,
        };
        let mut attributes = Attributes::new();
        debug_attributes(&mut attributes, options, &[m.up, m.down], "alternating-sequence");
        Ok(Self {
            first,
            second,
            attributes,
            options: options.clone(),
            metrics: m,
        })
    }
}

impl Component for AlternatingSequence {
    fn kind(&self) -> &'static str {
        "alternating-sequence"
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

        Path::new(x, y, o).right(gaps.left).add_to(&mut g);
        let x = x + gaps.left;
        Path::new(x + m.width, y, o).right(gaps.right).add_to(&mut g);

        let fm = self.first.metrics();
        let sm = self.second.metrics();
        let inner = m.width - 4.0 * r;

        let first_in = m.up - fm.up;
        let first_out = m.up - fm.up - fm.height;
        Path::new(x, y, o)
            .arc(Cardinal::South, Cardinal::East)
            .v_up(first_in - 2.0 * r)
            .arc(Cardinal::West, Cardinal::North)
            .add_to(&mut g);
        self.first.format(x + 2.0 * r, y - first_in, inner).add_to(&mut g);
        Path::new(x + m.width - 2.0 * r, y - first_out, o)
            .arc(Cardinal::North, Cardinal::East)
            .v_down(first_out - 2.0 * r)
            .arc(Cardinal::West, Cardinal::South)
            .add_to(&mut g);

        let second_in = m.down - sm.down - sm.height;
        let second_out = m.down - sm.down;
        Path::new(x, y, o)
            .arc(Cardinal::North, Cardinal::East)
            .v_down(second_in - 2.0 * r)
            .arc(Cardinal::West, Cardinal::South)
            .add_to(&mut g);
        self.second.format(x + 2.0 * r, y + second_in, inner).add_to(&mut g);
        Path::new(x + m.width - 2.0 * r, y + second_out, o)
            .arc(Cardinal::South, Cardinal::East)
            .v_up(second_out - 2.0 * r)
            .arc(Cardinal::West, Cardinal::North)
            .add_to(&mut g);

        let Crossing {
            arc_x,
            arc_y,
            cross_x,
            cross_y,
        } = Crossing::new(o);
        let cross_bar = (m.width - 4.0 * r - cross_x) / 2.0;

        Path::new(x + r, y - r - cross_y / 2.0, o)
            .arc(Cardinal::West, Cardinal::South)
            .right(cross_bar)
            .semi_arc(Compass::North, Spin::Clockwise)
            .l(cross_x - arc_x, cross_y - arc_y)
            .semi_arc(Compass::SouthWest, Spin::CounterClockwise)
            .right(cross_bar)
            .arc(Cardinal::North, Cardinal::East)
            .add_to(&mut g);
        Path::new(x + r, y + r + cross_y / 2.0, o)
            .arc(Cardinal::West, Cardinal::North)
            .right(cross_bar)
            .semi_arc(Compass::South, Spin::CounterClockwise)
            .l(cross_x - arc_x, arc_y - cross_y)
            .semi_arc(Compass::NorthWest, Spin::Clockwise)
            .right(cross_bar)
            .arc(Cardinal::South, Cardinal::East)
            .add_to(&mut g);
        g
    }

    fn children(&self) -> Vec<&dyn Component> {
        vec![self.first.as_ref(), self.second.as_ref()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::railroad::testing::{Block, path_data, placements};

    #[test]
    fn needs_exactly_two_items() {
        let options = Options::default();
        for items in [vec!["a"], vec!["a", "b", "c"]] {
            let err = AlternatingSequence::new(items, &options).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Range);
        }
    }

    #[test]
    fn sizing() {
        let seq = AlternatingSequence::new(["a", "b"], &Options::default()).unwrap();
        let m = seq.metrics();
        assert_eq!((m.up, m.height, m.down), (36.0, 0.0, 36.0));
        assert!(!m.needs_space);
        // 4r + spaced terminal + crossing
        assert!((m.width - (40.0 + 48.5 + 18.284271247461902)).abs() < 1e-9);
    }

    #[test]
    fn first_item_above_second_below() {
        let items = vec![Block::item(30.0, 0.0, 5.0, 5.0), Block::item(30.0, 0.0, 5.0, 5.0)];
        let seq = AlternatingSequence::new(items, &Options::default()).unwrap();
        assert_eq!((seq.metrics().up, seq.metrics().down), (30.0, 30.0));

        let g = seq.format(0.0, 0.0, seq.metrics().width);
        let placed = placements(&g);
        assert_eq!(placed.len(), 2);
        assert_eq!((placed[0].0.as_str(), placed[0].1.as_str()), ("20", "-25"));
        assert_eq!((placed[1].0.as_str(), placed[1].1.as_str()), ("20", "25"));

        let paths = path_data(&g);
        assert_eq!(paths.len(), 8);
        assert_eq!(paths[2], "M 0 0 a 10 10 0 0 0 10 -10 v -5 a 10 10 0 0 1 10 -10");
        assert_eq!(paths[4], "M 0 0 a 10 10 0 0 1 10 10 v 5 a 10 10 0 0 0 10 10");
        assert!(paths[6].starts_with("M 10 -15 a 10 10 0 0 0 10 10"));
        assert!(paths[7].starts_with("M 10 15 a 10 10 0 0 1 10 -10"));
    }
}
