use std::str::FromStr;

use super::attributes::Attributes;
use super::element::Element;
use super::options::Options;
use super::path::Path;
use super::{Component, Metrics, Terminus, container, debug_attributes, fmt_num, numeric_attributes, text_length};

/// Glyph used at the ends of a diagram: a double tick for whole rules, a
/// single tick for fragments embedded elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TerminusStyle {
    #[default]
    Simple,
    Complex,
}

impl FromStr for TerminusStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(TerminusStyle::Simple),
            "complex" => Ok(TerminusStyle::Complex),
            other => Err(format!("unknown terminus style '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Start {
    style: TerminusStyle,
    label: String,
    attributes: Attributes,
    options: Options,
    metrics: Metrics,
}

impl Start {
    pub fn new(style: TerminusStyle, label: Option<&str>, options: &Options) -> Self {
        let label = label.unwrap_or_default().to_string();
        let metrics = Metrics {
            width: (text_length(&label) * options.default_char_width + 10.0).max(20.0),
            height: 0.0,
            up: 10.0,
            down: 10.0,
            needs_space: false,
        };
        let mut attributes = Attributes::new();
        debug_attributes(&mut attributes, options, &[metrics.up, metrics.down], "start");
        Self {
            style,
            label,
            attributes,
            options: options.clone(),
            metrics,
        }
    }

    pub fn style(&self) -> TerminusStyle {
        self.style
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Component for Start {
    fn kind(&self) -> &'static str {
        "start"
    }

    fn metrics(&self) -> Metrics {
        self.metrics
    }

    fn format(&self, x: f64, y: f64, _width: f64) -> Element {
        let mut g = container("g", &self.attributes);
        let path = Path::new(x, y - 10.0, &self.options);
        let path = match self.style {
            TerminusStyle::Simple => path
                .v_down(20.0)
                .m(10.0, -20.0)
                .v_down(20.0)
                .m(-10.0, -10.0),
            TerminusStyle::Complex => path.v_down(20.0).m(0.0, -10.0),
        };
        path.right(self.metrics.width).add_to(&mut g);

        if !self.label.is_empty() {
            let mut attributes = numeric_attributes(&[("x", x), ("y", y - 15.0)]);
            attributes.set("style", "text-anchor:start");
            Element::with_text("text", attributes, self.label.as_str()).add_to(&mut g);
        }
        g
    }

    fn terminus(&self) -> Option<Terminus> {
        Some(Terminus::Start(self.style))
    }
}

#[derive(Debug, Clone)]
pub struct End {
    style: TerminusStyle,
    attributes: Attributes,
}

impl End {
    pub fn new(style: TerminusStyle, options: &Options) -> Self {
        let mut attributes = Attributes::new();
        debug_attributes(&mut attributes, options, &[10.0, 10.0], "end");
        Self { style, attributes }
    }

    pub fn style(&self) -> TerminusStyle {
        self.style
    }
}

impl Component for End {
    fn kind(&self) -> &'static str {
        "end"
    }

    fn metrics(&self) -> Metrics {
        Metrics {
            width: 20.0,
            height: 0.0,
            up: 10.0,
            down: 10.0,
            needs_space: false,
        }
    }

    fn format(&self, x: f64, y: f64, _width: f64) -> Element {
        let mut path = container("path", &self.attributes);
        let glyph = match self.style {
            TerminusStyle::Simple => "h 20 m -10 -10 v 20 m 10 -20 v 20",
            TerminusStyle::Complex => "h 20 m 0 -10 v 20",
        };
        let d = format!(" M {} {} {glyph}", fmt_num(x), fmt_num(y));
        path.attributes_mut().append("d", &d);
        path
    }

    fn terminus(&self) -> Option<Terminus> {
        Some(Terminus::End(self.style))
    }
}
