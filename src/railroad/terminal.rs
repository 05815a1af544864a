use super::attributes::Attributes;
use super::element::Element;
use super::options::Options;
use super::path::Path;
use super::{
    Component, Metrics, container, debug_attributes, determine_gaps, numeric_attributes,
    text_length,
};

const UP: f64 = 11.0;
const DOWN: f64 = 11.0;

/// A literal token, drawn as a rounded box.
#[derive(Debug, Clone)]
pub struct Terminal {
    text: String,
    attributes: Attributes,
    options: Options,
    metrics: Metrics,
}

/// A reference to another rule, drawn as a square box.
#[derive(Debug, Clone)]
pub struct NonTerminal {
    text: String,
    attributes: Attributes,
    options: Options,
    metrics: Metrics,
}

fn box_metrics(text: &str, options: &Options) -> Metrics {
    Metrics {
        width: text_length(text) * options.default_char_width + 20.0,
        height: 0.0,
        up: UP,
        down: DOWN,
        needs_space: true,
    }
}

fn box_attributes(
    mut attributes: Attributes,
    class: &'static str,
    options: &Options,
) -> Attributes {
    attributes.set("class", class);
    debug_attributes(&mut attributes, options, &[UP, DOWN], class);
    attributes
}

#[allow(clippy::too_many_arguments)]
fn draw_box(
    text: &str,
    attributes: &Attributes,
    options: &Options,
    metrics: &Metrics,
    rounded: bool,
    x: f64,
    y: f64,
    width: f64,
) -> Element {
    let gaps = determine_gaps(width, metrics.width, options);
    let mut g = container("g", attributes);

    Path::new(x, y, options).h(gaps.left).add_to(&mut g);
    Path::new(x + gaps.left + metrics.width, y, options)
        .h(gaps.right)
        .add_to(&mut g);

    let x = x + gaps.left;

    let mut rect = numeric_attributes(&[
        ("x", x),
        ("y", y - UP),
        ("width", metrics.width),
        ("height", metrics.up + metrics.down),
    ]);
    if rounded {
        rect.set("rx", "10");
        rect.set("ry", "10");
    }
    Element::with_attributes("rect", rect).add_to(&mut g);

    let content = Element::with_text(
        "text",
        numeric_attributes(&[("x", x + metrics.width / 2.0), ("y", y + 4.0)]),
        text,
    );
    match attributes.get("href") {
        Some(href) if !href.is_empty() => {
            let mut link = Attributes::new();
            link.set("xlink:href", href);
            let mut a = Element::with_attributes("a", link);
            a.append_child(content);
            a.add_to(&mut g);
        }
        _ => content.add_to(&mut g),
    }

    if let Some(title) = attributes.get("title").filter(|t| !t.is_empty()) {
        Element::with_text("title", Attributes::new(), title).add_to(&mut g);
    }

    g
}

impl Terminal {
    pub fn new(text: impl Into<String>, options: &Options) -> Self {
        Self::with_attributes(text, Attributes::new(), options)
    }

    /// `href` and `title` attributes turn into a link and a tooltip.
    pub fn with_attributes(text: impl Into<String>, attributes: Attributes, options: &Options) -> Self {
        let text = text.into();
        Self {
            metrics: box_metrics(&text, options),
            attributes: box_attributes(attributes, "terminal", options),
            options: options.clone(),
            text,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Component for Terminal {
    fn kind(&self) -> &'static str {
        "terminal"
    }

    fn metrics(&self) -> Metrics {
        self.metrics
    }

    fn format(&self, x: f64, y: f64, width: f64) -> Element {
        draw_box(
            &self.text,
            &self.attributes,
            &self.options,
            &self.metrics,
            true,
            x,
            y,
            width,
        )
    }
}

impl NonTerminal {
    pub fn new(text: impl Into<String>, options: &Options) -> Self {
        Self::with_attributes(text, Attributes::new(), options)
    }

    pub fn with_attributes(text: impl Into<String>, attributes: Attributes, options: &Options) -> Self {
        let text = text.into();
        Self {
            metrics: box_metrics(&text, options),
            attributes: box_attributes(attributes, "non-terminal", options),
            options: options.clone(),
            text,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Component for NonTerminal {
    fn kind(&self) -> &'static str {
        "non-terminal"
    }

    fn metrics(&self) -> Metrics {
        self.metrics
    }

    fn format(&self, x: f64, y: f64, width: f64) -> Element {
        draw_box(
            &self.text,
            &self.attributes,
            &self.options,
            &self.metrics,
            false,
            x,
            y,
            width,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_sizing() {
        let t = Terminal::new("0", &Options::default());
        assert_eq!(
            t.metrics(),
            Metrics {
                width: 28.5,
                height: 0.0,
                up: 11.0,
                down: 11.0,
                needs_space: true
            }
        );
    }

    #[test]
    fn terminal_draws_centered_rounded_box() {
        let t = Terminal::new("ab", &Options::default());
        let svg = t.format(0.0, 30.0, 57.0).to_string();
        let expected = concat!(
            "<g class=\"terminal\">\n",
            "<path d=\"M 0 30 h 10\"></path>\n",
            "<path d=\"M 47 30 h 10\"></path>\n",
            "<rect x=\"10\" y=\"19\" width=\"37\" height=\"22\" rx=\"10\" ry=\"10\"></rect>\n",
            "<text x=\"28.5\" y=\"34\">ab</text>\n",
            "</g>\n",
        );
        assert_eq!(svg, expected);
    }

    #[test]
    fn non_terminal_box_is_square() {
        let n = NonTerminal::new("expr", &Options::default());
        let svg = n.format(0.0, 0.0, n.metrics().width).to_string();
        assert!(svg.starts_with("<g class=\"non-terminal\">"));
        assert!(svg.contains("<rect x=\"0\" y=\"-11\" width=\"54\" height=\"22\"></rect>"));
    }

    #[test]
    fn href_and_title_wrap_text() {
        let attrs = Attributes::from_pairs([("href", "#expr"), ("title", "see expr")]).unwrap();
        let n = NonTerminal::with_attributes("expr", attrs, &Options::default());
        let g = n.format(0.0, 0.0, 0.0);
        let tags: Vec<&str> = g.elements().iter().map(Element::tag).collect();
        assert_eq!(tags, ["path", "path", "rect", "a", "title"]);
        let svg = g.to_string();
        assert!(svg.contains("<a xlink:href=\"#expr\"><text x=\"0\" y=\"4\">expr</text>\n</a>\n"));
        assert!(svg.contains("<title>see expr</title>"));
    }

    #[test]
    fn debug_records_sizes() {
        let options = Options {
            debug: true,
            ..Options::default()
        };
        let t = Terminal::new("x", &options);
        let svg = t.format(0.0, 0.0, 0.0).to_string();
        assert!(svg.starts_with(
            "<g class=\"terminal\" data-updown=\"11 11\" data-type=\"terminal\">"
        ));
    }
}
