use super::attributes::Attributes;
use super::element::Element;
use super::options::Options;
use super::path::Path;
use super::{Component, Metrics, container};

/// Zero-size pass-through: a bare line across its slot.
#[derive(Debug, Clone)]
pub struct Skip {
    attributes: Attributes,
    options: Options,
}

impl Skip {
    pub fn new(options: &Options) -> Self {
        let mut attributes = Attributes::new();
        if options.debug {
            attributes.set("data-type", "skip");
        }
        Self {
            attributes,
            options: options.clone(),
        }
    }
}

impl Component for Skip {
    fn kind(&self) -> &'static str {
        "skip"
    }

    fn metrics(&self) -> Metrics {
        Metrics::default()
    }

    fn format(&self, x: f64, y: f64, width: f64) -> Element {
        let mut g = container("g", &self.attributes);
        Path::new(x, y, &self.options).right(width).add_to(&mut g);
        g
    }
}
