use crate::error::{Error, Result};

use super::attributes::Attributes;
use super::element::Element;
use super::options::Options;
use super::path::{Cardinal, Path};
use super::skip::Skip;
use super::{Component, Item, Metrics, Node, container, debug_attributes, determine_gaps, wrap_items};

/// Checks a branch index given as a plain number, e.g. from JSON.
pub fn validate_normal(normal: f64, len: usize) -> Result<usize> {
    if normal.fract() != 0.0 || !normal.is_finite() {
        return Err(Error::NonIntegerNormal(normal));
    }
    if normal < 0.0 || normal >= len as f64 {
        return Err(Error::NormalOutOfRange {
            normal: normal as i64,
            len,
        });
    }
    Ok(normal as usize)
}

/// Alternatives stacked vertically. The `normal` branch runs straight
/// through, the others bow above or below it.
#[derive(Debug)]
pub struct Choice {
    normal: usize,
    items: Vec<Node>,
    attributes: Attributes,
    options: Options,
    metrics: Metrics,
}

impl Choice {
    pub fn new<I>(normal: usize, items: I, options: &Options) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        let items = wrap_items(items, options);
        if normal >= items.len() {
            return Err(Error::NormalOutOfRange {
                normal: normal as i64,
                len: items.len(),
            });
        }
        Ok(Self::build(normal, items, options))
    }

    /// Sizes a choice whose `normal` is already known to index `items`.
    fn build(normal: usize, items: Vec<Node>, options: &Options) -> Self {
        let r = options.arc_radius;
        let vs = options.vertical_separation;
        let sizes: Vec<Metrics> = items.iter().map(|item| item.metrics()).collect();
        let last = sizes.len() - 1;

        let widest = sizes.iter().map(|m| m.width).fold(f64::NEG_INFINITY, f64::max);
        let mut m = Metrics {
            width: widest + 4.0 * r,
            height: sizes[normal].height,
            ..Metrics::default()
        };

        m.up = sizes[0].up;
        for i in 0..normal {
            let arcs = if i == normal - 1 { 2.0 * r } else { r };
            m.up += arcs.max(sizes[i].height + sizes[i].down + vs + sizes[i + 1].up);
        }

        m.down = sizes[last].down;
        for i in normal + 1..=last {
            let arcs = if i == normal + 1 { 2.0 * r } else { r };
            m.down += arcs.max(sizes[i - 1].height + sizes[i - 1].down + vs + sizes[i].up);
        }
        m.down -= sizes[normal].height;

        let mut attributes = Attributes::new();
        debug_attributes(&mut attributes, options, &[m.up, m.height, m.down], "choice");
        Self {
            normal,
            items,
            attributes,
            options: options.clone(),
            metrics: m,
        }
    }

    pub fn normal(&self) -> usize {
        self.normal
    }

    pub fn items(&self) -> &[Node] {
        &self.items
    }
}

impl Component for Choice {
    fn kind(&self) -> &'static str {
        "choice"
    }

    fn metrics(&self) -> Metrics {
        self.metrics
    }

    fn format(&self, x: f64, y: f64, width: f64) -> Element {
        let o = &self.options;
        let r = o.arc_radius;
        let vs = o.vertical_separation;
        let height = self.metrics.height;
        let gaps = determine_gaps(width, self.metrics.width, o);
        let mut g = container("g", &self.attributes);

        Path::new(x, y, o).h(gaps.left).add_to(&mut g);
        Path::new(x + gaps.left + self.metrics.width, y + height, o)
            .h(gaps.right)
            .add_to(&mut g);

        let x = x + gaps.left;
        let last = self.items.len() - 1;
        let inner_width = self.metrics.width - 4.0 * r;
        let normal = self.items[self.normal].metrics();

        let mut distance = 0.0;
        for i in (0..self.normal).rev() {
            let item = &self.items[i];
            let im = item.metrics();
            if i == self.normal - 1 {
                distance = (2.0 * r).max(normal.up + vs + im.down + im.height);
            }
            Path::new(x, y, o)
                .arc(Cardinal::South, Cardinal::East)
                .v_up(distance - 2.0 * r)
                .arc(Cardinal::West, Cardinal::North)
                .add_to(&mut g);
            item.format(x + 2.0 * r, y - distance, inner_width)
                .add_to(&mut g);
            Path::new(x + 2.0 * r + inner_width, y - distance + im.height, o)
                .arc(Cardinal::North, Cardinal::East)
                .v_down(distance - im.height + height - 2.0 * r)
                .arc(Cardinal::West, Cardinal::South)
                .add_to(&mut g);
            let above = if i == 0 {
                0.0
            } else {
                let prev = self.items[i - 1].metrics();
                prev.down + prev.height
            };
            distance += r.max(im.up + vs + above);
        }

        Path::new(x, y, o).right(2.0 * r).add_to(&mut g);
        self.items[self.normal]
            .format(x + 2.0 * r, y, inner_width)
            .add_to(&mut g);
        Path::new(x + 2.0 * r + inner_width, y + height, o)
            .right(2.0 * r)
            .add_to(&mut g);

        for i in self.normal + 1..=last {
            let item = &self.items[i];
            let im = item.metrics();
            if i == self.normal + 1 {
                distance = (2.0 * r).max(height + normal.down + vs + im.up);
            }
            Path::new(x, y, o)
                .arc(Cardinal::North, Cardinal::East)
                .v_down(distance - 2.0 * r)
                .arc(Cardinal::West, Cardinal::South)
                .add_to(&mut g);
            item.format(x + 2.0 * r, y + distance, inner_width)
                .add_to(&mut g);
            Path::new(x + 2.0 * r + inner_width, y + distance + im.height, o)
                .arc(Cardinal::South, Cardinal::East)
                .v_up(distance - 2.0 * r + im.height - height)
                .arc(Cardinal::West, Cardinal::North)
                .add_to(&mut g);
            let below = if i == last {
                0.0
            } else {
                self.items[i + 1].metrics().up
            };
            distance += r.max(im.height + im.down + vs + below);
        }
        g
    }

    fn children(&self) -> Vec<&dyn Component> {
        self.items.iter().map(|item| item.as_ref()).collect()
    }
}

/// A two-way choice between an item and a bare line.
#[derive(Debug)]
pub struct Optional {
    choice: Choice,
    kind: &'static str,
}

impl Optional {
    /// With `skip` the bare line runs straight through and the item bows below.
    pub fn new(item: impl Into<Item>, skip: bool, options: &Options) -> Self {
        let normal = if skip { 0 } else { 1 };
        let items = wrap_items([Item::from(Skip::new(options)), item.into()], options);
        let mut choice = Choice::build(normal, items, options);
        choice.attributes.set("class", "optional");
        let m = choice.metrics;
        debug_attributes(&mut choice.attributes, options, &[m.up, m.height, m.down], "optional");
        Self {
            choice,
            kind: "optional",
        }
    }

    pub fn skip(&self) -> bool {
        self.choice.normal == 0
    }

    /// Replaces the drawn height, keeping every other measurement.
    pub(crate) fn override_height(&mut self, height: f64, kind: &'static str) {
        self.choice.metrics.height = height;
        self.kind = kind;
        let m = self.choice.metrics;
        debug_attributes(
            &mut self.choice.attributes,
            &self.choice.options,
            &[m.up, m.height, m.down],
            kind,
        );
    }
}

impl Component for Optional {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn metrics(&self) -> Metrics {
        self.choice.metrics()
    }

    fn format(&self, x: f64, y: f64, width: f64) -> Element {
        self.choice.format(x, y, width)
    }

    fn children(&self) -> Vec<&dyn Component> {
        self.choice.children()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::railroad::testing::{Block, path_data, placements};
    use crate::railroad::walk;

    fn blocks() -> Vec<Item> {
        vec![
            Block::item(50.0, 0.0, 10.0, 10.0),
            Block::item(30.0, 0.0, 10.0, 10.0),
            Block::item(40.0, 0.0, 10.0, 10.0),
        ]
    }

    #[test]
    fn validates_normal() {
        assert_eq!(validate_normal(1.5, 3).unwrap_err().kind(), ErrorKind::Type);
        for bad in [0.1, 2.9999] {
            assert!(matches!(validate_normal(bad, 3), Err(Error::NonIntegerNormal(_))));
        }
        assert_eq!(validate_normal(-1.0, 3).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(validate_normal(3.0, 3).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(validate_normal(2.0, 3).unwrap(), 2);

        let err = Choice::new(3, blocks(), &Options::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        for normal in 0..3 {
            assert_eq!(Choice::new(normal, blocks(), &Options::default()).unwrap().normal(), normal);
        }
    }

    #[test]
    fn width_adds_four_arc_radii() {
        let choice = Choice::new(1, blocks(), &Options::default()).unwrap();
        assert_eq!(choice.metrics().width, 50.0 + 40.0);
    }

    #[test]
    fn up_and_down_accumulate_branches() {
        let options = Options {
            vertical_separation: 20.0,
            ..Options::default()
        };
        let items = vec![
            Block::item(0.0, 20.0, 10.0, 5.0),
            Block::item(0.0, 50.0, 15.0, 10.0),
            Block::item(0.0, 30.0, 5.0, 15.0),
        ];
        let choice = Choice::new(1, items, &options).unwrap();
        let m = choice.metrics();
        assert_eq!(m.height, 50.0);
        assert_eq!(m.up, 70.0);
        assert_eq!(m.down, 50.0);
    }

    #[test]
    fn routes_branches_around_normal() {
        let choice = Choice::new(1, blocks(), &Options::default()).unwrap();
        let m = choice.metrics();
        assert_eq!((m.up, m.down), (38.0, 38.0));

        let g = choice.format(0.0, 0.0, 90.0);
        assert_eq!(
            path_data(&g),
            [
                "M 0 0 h 0",
                "M 90 0 h 0",
                "M 0 0 a 10 10 0 0 0 10 -10 v -8 a 10 10 0 0 1 10 -10",
                "M 70 -28 a 10 10 0 0 1 10 10 v 8 a 10 10 0 0 0 10 10",
                "M 0 0 h 20",
                "M 70 0 h 20",
                "M 0 0 a 10 10 0 0 1 10 10 v 8 a 10 10 0 0 0 10 10",
                "M 70 28 a 10 10 0 0 0 10 -10 v -8 a 10 10 0 0 1 10 -10",
            ]
        );
        let placed = placements(&g);
        let expected = [("20", "-28", "50"), ("20", "0", "50"), ("20", "28", "50")];
        for (got, want) in placed.iter().zip(expected) {
            assert_eq!((got.0.as_str(), got.1.as_str(), got.2.as_str()), want);
        }
    }

    #[test]
    fn optional_is_a_two_way_choice() {
        let options = Options::default();
        let opt = Optional::new("x", false, &options);
        assert!(!opt.skip());
        let m = opt.metrics();
        assert_eq!(m.width, 28.5 + 40.0);
        // skip on top: max(2r, 0 + 0 + 8 + 11)
        assert_eq!(m.up, 20.0);
        assert_eq!(m.down, 11.0);

        let kinds: Vec<&str> = walk(&opt).map(|n| n.kind()).collect();
        assert_eq!(kinds, ["optional", "skip", "terminal"]);
        assert!(opt.format(0.0, 0.0, 0.0).to_string().starts_with("<g class=\"optional\">"));
    }

    #[test]
    fn optional_debug_attributes() {
        let options = Options {
            debug: true,
            ..Options::default()
        };
        let opt = Optional::new("x", true, &options);
        let g = opt.format(0.0, 0.0, 0.0);
        assert_eq!(g.attributes().get("data-type"), Some("optional"));
        assert_eq!(g.attributes().get("class"), Some("optional"));
    }
}
