use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

use super::attributes::Attributes;
use super::element::Element;
use super::options::Options;
use super::path::{Cardinal, Path};
use super::{
    Component, Item, Metrics, Node, container, debug_attributes, determine_gaps,
    numeric_attributes, wrap_items,
};

/// Whether a multiple choice takes some or all of its branches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChoiceType {
    #[default]
    Any,
    All,
}

impl FromStr for ChoiceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "any" => Ok(ChoiceType::Any),
            "all" => Ok(ChoiceType::All),
            other => Err(Error::InvalidChoiceType(other.to_string())),
        }
    }
}

impl fmt::Display for ChoiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChoiceType::Any => "any",
            ChoiceType::All => "all",
        })
    }
}

/// Branches taken once each in any order, marked with a `1+` or `all` badge.
#[derive(Debug)]
pub struct MultipleChoice {
    normal: usize,
    choice_type: ChoiceType,
    inner_width: f64,
    items: Vec<Node>,
    attributes: Attributes,
    options: Options,
    metrics: Metrics,
}

impl MultipleChoice {
    pub fn new<I>(normal: usize, choice_type: ChoiceType, items: I, options: &Options) -> Result<Self>
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

        let r = options.arc_radius;
        let vs = options.vertical_separation;
        let sizes: Vec<Metrics> = items.iter().map(|item| item.metrics()).collect();
        let inner_width = sizes.iter().map(|m| m.width).fold(f64::NEG_INFINITY, f64::max);

        let mut m = Metrics {
            width: 50.0 + 2.0 * r + inner_width,
            height: sizes[normal].height,
            up: sizes[0].up,
            down: sizes[sizes.len() - 1].down,
            needs_space: true,
        };
        for (i, im) in sizes.iter().enumerate() {
            let adjacent = i + 1 == normal || i == normal + 1;
            let minimum = r + if adjacent { 10.0 } else { 0.0 };
            if i < normal {
                m.up += minimum.max(im.height + im.down + vs + sizes[i + 1].up);
            } else if i > normal {
                let prev = sizes[i - 1];
                m.down += minimum.max(im.up + vs + prev.down + prev.height);
            }
        }
        m.down -= sizes[normal].height;

        let mut attributes = Attributes::new();
        attributes.set("class", "multiple-choice");
        debug_attributes(&mut attributes, options, &[m.up, m.height, m.down], "multiple-choice");
        Ok(Self {
            normal,
            choice_type,
            inner_width,
            items,
            attributes,
            options: options.clone(),
            metrics: m,
        })
    }

    pub fn normal(&self) -> usize {
        self.normal
    }

    pub fn choice_type(&self) -> ChoiceType {
        self.choice_type
    }

    fn badge(&self, x: f64, y: f64) -> Element {
        let o = &self.options;
        let mut group = Element::with_attributes("g", class("diagram-text"));
        let tooltip = match self.choice_type {
            ChoiceType::Any => "take one or more branches, once each, in any order",
            ChoiceType::All => "take all branches, once each, in any order",
        };
        Element::with_text("title", Attributes::new(), tooltip).add_to(&mut group);

        Path::with_attributes(x + 30.0, y - 10.0, class("diagram-text"), o)
            .raw(" h -26 a 4 4 0 0 0 -4 4 v 12 a 4 4 0 0 0 4 4 h 26 z")
            .add_to(&mut group);

        let mut label = numeric_attributes(&[("x", x + 15.0), ("y", y + 4.0)]);
        label.set("class", "diagram-text");
        let badge = match self.choice_type {
            ChoiceType::Any => "1+",
            ChoiceType::All => "all",
        };
        Element::with_text("text", label, badge).add_to(&mut group);

        let width = self.metrics.width;
        Path::with_attributes(x + width - 20.0, y - 10.0, class("diagram-text"), o)
            .raw(" h 16 a 4 4 0 0 1 4 4 v 12 a 4 4 0 0 1 -4 4 h -16 z")
            .add_to(&mut group);

        let mut arrow = Attributes::new();
        arrow.set("style", "stroke-width: 1.75");
        Path::with_attributes(x + width - 13.0, y - 2.0, arrow, o)
            .raw(" a 4 4 0 1 0 6 -1 m 2.75 -1 h -4 v 4 m 0 -3 h 2")
            .add_to(&mut group);
        group
    }
}

fn class(name: &'static str) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.set("class", name);
    attributes
}

impl Component for MultipleChoice {
    fn kind(&self) -> &'static str {
        "multiple-choice"
    }

    fn metrics(&self) -> Metrics {
        self.metrics
    }

    fn format(&self, x: f64, y: f64, width: f64) -> Element {
        let o = &self.options;
        let r = o.arc_radius;
        let vs = o.vertical_separation;
        let iw = self.inner_width;
        let height = self.metrics.height;
        let gaps = determine_gaps(width, self.metrics.width, o);
        let mut g = container("g", &self.attributes);

        Path::new(x, y, o).h(gaps.left).add_to(&mut g);
        Path::new(x + gaps.left + self.metrics.width, y + height, o)
            .h(gaps.right)
            .add_to(&mut g);

        let x = x + gaps.left;
        let normal = self.items[self.normal].metrics();
        let mut distance = 0.0;

        for i in (0..self.normal).rev() {
            let item = &self.items[i];
            let im = item.metrics();
            if i == self.normal - 1 {
                distance = (10.0 + r).max(normal.up + vs + im.down + im.height);
            }
            Path::new(x + 30.0, y, o)
                .v_up(distance - r)
                .arc(Cardinal::West, Cardinal::North)
                .add_to(&mut g);
            item.format(x + 30.0 + r, y - distance, iw).add_to(&mut g);
            Path::new(x + 30.0 + r + iw, y - distance + im.height, o)
                .arc(Cardinal::North, Cardinal::East)
                .v_down(distance - im.height + height - r - 10.0)
                .add_to(&mut g);
            if i != 0 {
                let prev = self.items[i - 1].metrics();
                distance += r.max(im.up + vs + prev.down + prev.height);
            }
        }

        Path::new(x + 30.0, y, o).right(r).add_to(&mut g);
        self.items[self.normal]
            .format(x + 30.0 + r, y, iw)
            .add_to(&mut g);
        Path::new(x + 30.0 + r + iw, y + height, o)
            .right(r)
            .add_to(&mut g);

        let last = self.items.len() - 1;
        for i in self.normal + 1..=last {
            let item = &self.items[i];
            let im = item.metrics();
            if i == self.normal + 1 {
                distance = (10.0 + r).max(normal.height + normal.down + vs + im.up);
            }
            Path::new(x + 30.0, y, o)
                .v_down(distance - r)
                .arc(Cardinal::West, Cardinal::South)
                .add_to(&mut g);
            item.format(x + 30.0 + r, y + distance, iw).add_to(&mut g);
            Path::new(x + 30.0 + r + iw, y + distance + im.height, o)
                .arc(Cardinal::South, Cardinal::East)
                .v_up(distance - r + im.height - normal.height)
                .add_to(&mut g);
            if i != last {
                distance += r.max(im.height + im.down + vs + self.items[i + 1].metrics().up);
            }
        }

        self.badge(x, y).add_to(&mut g);
        g
    }

    fn children(&self) -> Vec<&dyn Component> {
        self.items.iter().map(|item| item.as_ref()).collect()
    }
}
