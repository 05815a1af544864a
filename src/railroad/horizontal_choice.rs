use crate::error::{Error, Result};

use super::attributes::Attributes;
use super::element::Element;
use super::options::Options;
use super::path::{Cardinal, Path};
use super::{Component, Item, Metrics, Node, container, debug_attributes, determine_gaps, wrap_items};

/// Alternatives laid side by side, joined by a rail above and one below.
#[derive(Debug)]
pub struct HorizontalChoice {
    items: Vec<Node>,
    upper_track: f64,
    lower_track: f64,
    attributes: Attributes,
    options: Options,
    metrics: Metrics,
}

fn spaced_width(m: &Metrics) -> f64 {
    m.width + if m.needs_space { 20.0 } else { 0.0 }
}

impl HorizontalChoice {
    pub fn new<I>(items: I, options: &Options) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        let items = wrap_items(items, options);
        if items.len() < 2 {
            return Err(Error::item_count("HorizontalChoice", "at least 2", items.len()));
        }

        let r = options.arc_radius;
        let vs = options.vertical_separation;
        let sizes: Vec<Metrics> = items.iter().map(|item| item.metrics()).collect();
        let first = sizes[0];
        let last = sizes[sizes.len() - 1];
        let all_but_last = &sizes[..sizes.len() - 1];
        let middles = &sizes[1..sizes.len() - 1];

        let width = r
            + 2.0 * r * (sizes.len() - 1) as f64
            + sizes.iter().map(spaced_width).sum::<f64>()
            + if last.height > 0.0 { r } else { 0.0 }
            + r;

        let highest = all_but_last.iter().map(|m| m.up).fold(f64::NEG_INFINITY, f64::max);
        let upper_track = (2.0 * r).max(vs).max(highest + vs);
        let up = upper_track.max(last.up);

        let deepest_middle = middles
            .iter()
            .map(|m| m.height + (m.down + vs).max(2.0 * r))
            .fold(f64::NEG_INFINITY, f64::max);
        let mut lower_track = vs.max(deepest_middle).max(last.height + last.down + vs);
        if first.height < lower_track {
            lower_track = lower_track.max(first.height + 2.0 * r);
        }
        let down = lower_track.max(first.height + first.down);

        let m = Metrics {
            width,
            height: 0.0,
            up,
            down,
            needs_space: false,
        };
        let mut attributes = Attributes::new();
        attributes.set("class", "horizontal-choice");
        debug_attributes(&mut attributes, options, &[m.up, m.height, m.down], "horizontal-choice");
        Ok(Self {
            items,
            upper_track,
            lower_track,
            attributes,
            options: options.clone(),
            metrics: m,
        })
    }
}

impl Component for HorizontalChoice {
    fn kind(&self) -> &'static str {
        "horizontal-choice"
    }

    fn metrics(&self) -> Metrics {
        self.metrics
    }

    fn format(&self, x: f64, y: f64, width: f64) -> Element {
        let o = &self.options;
        let r = o.arc_radius;
        let upper_track = self.upper_track;
        let lower_track = self.lower_track;
        let gaps = determine_gaps(width, self.metrics.width, o);
        let mut g = container("g", &self.attributes);

        Path::new(x, y, o).h(gaps.left).add_to(&mut g);
        Path::new(x + gaps.left + self.metrics.width, y + self.metrics.height, o)
            .h(gaps.right)
            .add_to(&mut g);

        let mut x = x + gaps.left;
        let sizes: Vec<Metrics> = self.items.iter().map(|item| item.metrics()).collect();
        let count = sizes.len();
        let first = sizes[0];
        let last = sizes[count - 1];
        let middle_arcs = (count - 2) as f64 * 2.0 * r;

        let upper_span = sizes[..count - 1].iter().map(spaced_width).sum::<f64>() + middle_arcs - r;
        Path::new(x, y, o)
            .arc(Cardinal::South, Cardinal::East)
            .v(2.0 * r - upper_track)
            .arc(Cardinal::West, Cardinal::North)
            .h(upper_span)
            .add_to(&mut g);

        let lower_span = sizes[1..].iter().map(spaced_width).sum::<f64>()
            + middle_arcs
            + if last.height > 0.0 { r } else { 0.0 }
            - r;
        let lower_start = x + r + spaced_width(&first) + 2.0 * r;
        Path::new(lower_start, y + lower_track, o)
            .h(lower_span)
            .arc(Cardinal::South, Cardinal::East)
            .v(2.0 * r - lower_track)
            .arc(Cardinal::West, Cardinal::North)
            .add_to(&mut g);

        for (i, item) in self.items.iter().enumerate() {
            let im = sizes[i];
            if i == 0 {
                Path::new(x, y, o).h(r).add_to(&mut g);
                x += r;
            } else {
                Path::new(x, y - upper_track, o)
                    .arc(Cardinal::North, Cardinal::East)
                    .v(upper_track - 2.0 * r)
                    .arc(Cardinal::West, Cardinal::South)
                    .add_to(&mut g);
                x += 2.0 * r;
            }

            let item_width = spaced_width(&im);
            item.format(x, y, item_width).add_to(&mut g);
            x += item_width;

            if i == count - 1 {
                if im.height == 0.0 {
                    Path::new(x, y, o).h(r).add_to(&mut g);
                } else {
                    Path::new(x, y + im.height, o)
                        .arc(Cardinal::South, Cardinal::East)
                        .add_to(&mut g);
                }
            } else if i == 0 && im.height > lower_track {
                if im.height - lower_track >= 2.0 * r {
                    Path::new(x, y + im.height, o)
                        .arc(Cardinal::South, Cardinal::East)
                        .v(lower_track - im.height + 2.0 * r)
                        .arc(Cardinal::West, Cardinal::North)
                        .add_to(&mut g);
                } else {
                    Path::new(x, y + im.height, o)
                        .l(2.0 * r, lower_track - im.height)
                        .add_to(&mut g);
                }
            } else {
                Path::new(x, y + im.height, o)
                    .arc(Cardinal::North, Cardinal::East)
                    .v(lower_track - im.height - 2.0 * r)
                    .arc(Cardinal::West, Cardinal::South)
                    .add_to(&mut g);
            }
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
    use crate::railroad::testing::{Block, path_data};

    #[test]
    fn needs_two_items() {
        let err = HorizontalChoice::new(["only"], &Options::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn two_terminals() {
        let hc = HorizontalChoice::new(["a", "b"], &Options::default()).unwrap();
        let m = hc.metrics();
        assert_eq!(m.width, 137.0);
        assert_eq!((m.up, m.height, m.down), (20.0, 0.0, 20.0));
        assert!(!m.needs_space);

        let g = hc.format(0.0, 0.0, 137.0);
        assert_eq!(g.attributes().get("class"), Some("horizontal-choice"));
        assert_eq!(
            path_data(&g),
            [
                "M 0 0 h 0",
                "M 137 0 h 0",
                "M 0 0 a 10 10 0 0 0 10 -10 v 0 a 10 10 0 0 1 10 -10 h 38.5",
                "M 78.5 20 h 38.5 a 10 10 0 0 0 10 -10 v 0 a 10 10 0 0 1 10 -10",
                "M 0 0 h 10",
                "M 58.5 0 a 10 10 0 0 1 10 10 v 0 a 10 10 0 0 0 10 10",
                "M 58.5 -20 a 10 10 0 0 1 10 10 v 0 a 10 10 0 0 0 10 10",
                "M 127 0 h 10",
            ]
        );
    }

    #[test]
    fn tall_first_item_slides_down_to_lower_rail() {
        let options = Options::default();
        let items = vec![Block::item(30.0, 25.0, 5.0, 5.0), Block::item(30.0, 0.0, 5.0, 5.0)];
        let hc = HorizontalChoice::new(items, &options).unwrap();
        // lower track is max(8, 0 + 5 + 8) = 13, exceeded by less than 2r
        assert_eq!(hc.lower_track, 13.0);
        let g = hc.format(0.0, 0.0, hc.metrics().width);
        assert!(path_data(&g).contains(&"M 40 25 l 20 -12".to_string()));
    }
}
