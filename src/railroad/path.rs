use std::fmt;
use std::str::FromStr;

use crate::error::Error;

use super::attributes::Attributes;
use super::element::Element;
use super::fmt_num;
use super::options::Options;

/// The four quarter-arc directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

/// The eight compass points a semi arc can start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compass {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Clockwise,
    CounterClockwise,
}

impl FromStr for Cardinal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "North" => Ok(Cardinal::North),
            "East" => Ok(Cardinal::East),
            "South" => Ok(Cardinal::South),
            "West" => Ok(Cardinal::West),
            _ => Err(Error::InvalidCardinal(s.to_string())),
        }
    }
}

impl FromStr for Compass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "North" => Ok(Compass::North),
            "North East" => Ok(Compass::NorthEast),
            "East" => Ok(Compass::East),
            "South East" => Ok(Compass::SouthEast),
            "South" => Ok(Compass::South),
            "South West" => Ok(Compass::SouthWest),
            "West" => Ok(Compass::West),
            "North West" => Ok(Compass::NorthWest),
            _ => Err(Error::InvalidCardinal(s.to_string())),
        }
    }
}

impl FromStr for Spin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Clockwise" => Ok(Spin::Clockwise),
            "Counter clockwise" => Ok(Spin::CounterClockwise),
            _ => Err(Error::InvalidSpin(s.to_string())),
        }
    }
}

/// Builder for a `<path>` element. Every command is relative to the point
/// reached by the previous one.
#[derive(Debug, Clone)]
pub struct Path {
    element: Element,
    arc_radius: f64,
}

impl Path {
    pub fn new(x: f64, y: f64, options: &Options) -> Self {
        Self::with_attributes(x, y, Attributes::new(), options)
    }

    /// Starts a path carrying extra attributes; `d` follows them.
    pub fn with_attributes(x: f64, y: f64, attributes: Attributes, options: &Options) -> Self {
        let mut element = Element::with_attributes("path", attributes);
        element
            .attributes_mut()
            .set("d", format!("M {} {}", fmt_num(x), fmt_num(y)));
        Self {
            element,
            arc_radius: options.arc_radius,
        }
    }

    pub fn is_clockwise(from: Cardinal, to: Cardinal) -> bool {
        matches!(
            (from, to),
            (Cardinal::North, Cardinal::East)
                | (Cardinal::East, Cardinal::South)
                | (Cardinal::South, Cardinal::West)
                | (Cardinal::West, Cardinal::North)
        )
    }

    pub fn d(&self) -> &str {
        self.element.attributes().get("d").unwrap_or_default()
    }

    fn push(mut self, command: &str) -> Self {
        self.element.attributes_mut().append("d", command);
        self
    }

    pub fn m(self, x: f64, y: f64) -> Self {
        self.push(&format!(" m {} {}", fmt_num(x), fmt_num(y)))
    }

    pub fn h(self, value: f64) -> Self {
        self.push(&format!(" h {}", fmt_num(value)))
    }

    pub fn v(self, value: f64) -> Self {
        self.push(&format!(" v {}", fmt_num(value)))
    }

    pub fn l(self, x: f64, y: f64) -> Self {
        self.push(&format!(" l {} {}", fmt_num(x), fmt_num(y)))
    }

    pub fn right(self, value: f64) -> Self {
        self.h(value.max(0.0))
    }

    pub fn left(self, value: f64) -> Self {
        self.h(-value.max(0.0))
    }

    pub fn v_down(self, value: f64) -> Self {
        self.v(value.max(0.0))
    }

    pub fn v_up(self, value: f64) -> Self {
        self.v(-value.max(0.0))
    }

    /// Half-pixel nudge closing a hairline gap at the end of a line.
    pub fn format(self) -> Self {
        self.push("h.5")
    }

    /// Appends raw path data.
    pub fn raw(self, data: &str) -> Self {
        self.push(data)
    }

    /// Quarter circle turning from one direction to another.
    pub fn arc(self, from: Cardinal, to: Cardinal) -> Self {
        let r = self.arc_radius;
        let mut x = r;
        let mut y = r;
        if from == Cardinal::East || to == Cardinal::West {
            x = -x;
        }
        if from == Cardinal::South || to == Cardinal::North {
            y = -y;
        }
        let sweep = u8::from(Self::is_clockwise(from, to));
        let command = format!(
            " a {r} {r} 0 0 {sweep} {} {}",
            fmt_num(x),
            fmt_num(y),
            r = fmt_num(r)
        );
        self.push(&command)
    }

    /// Eighth circle used where two lines cross over.
    pub fn semi_arc(self, from: Compass, spin: Spin) -> Self {
        let r = self.arc_radius;
        let section = fmt_num(r * std::f64::consts::FRAC_PI_4.sin());
        let inversed = fmt_num(r - r * std::f64::consts::FRAC_PI_4.sin());
        let (s, i) = (section.as_str(), inversed.as_str());
        let offsets = match (spin, from) {
            (Spin::Clockwise, Compass::North) => format!("{s} {i}"),
            (Spin::Clockwise, Compass::NorthEast) => format!("{i} {s}"),
            (Spin::Clockwise, Compass::East) => format!("-{i} {s}"),
            (Spin::Clockwise, Compass::SouthEast) => format!("-{s} {i}"),
            (Spin::Clockwise, Compass::South) => format!("-{s} -{i}"),
            (Spin::Clockwise, Compass::SouthWest) => format!("-{i} -{s}"),
            (Spin::Clockwise, Compass::West) => format!("{i} -{s}"),
            (Spin::Clockwise, Compass::NorthWest) => format!("{s} -{i}"),
            (Spin::CounterClockwise, Compass::North) => format!("-{s} {i}"),
            (Spin::CounterClockwise, Compass::NorthWest) => format!("-{i} {s}"),
            (Spin::CounterClockwise, Compass::West) => format!("{i} {s}"),
            (Spin::CounterClockwise, Compass::SouthWest) => format!("{s} {i}"),
            (Spin::CounterClockwise, Compass::South) => format!("{s} -{i}"),
            (Spin::CounterClockwise, Compass::SouthEast) => format!("{i} -{s}"),
            (Spin::CounterClockwise, Compass::East) => format!("-{i} -{s}"),
            (Spin::CounterClockwise, Compass::NorthEast) => format!("-{s} -{i}"),
        };
        let sweep = u8::from(spin == Spin::Clockwise);
        let radius = fmt_num(r);
        self.push(&format!(" a {radius} {radius} 0 0 {sweep} {offsets}"))
    }

    pub fn add_to(self, parent: &mut Element) {
        parent.append_child(self.element);
    }

    pub fn into_element(self) -> Element {
        self.element
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.element.fmt(f)
    }
}
