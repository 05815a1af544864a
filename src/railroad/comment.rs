use super::attributes::Attributes;
use super::element::Element;
use super::options::Options;
use super::path::Path;
use super::{Component, Metrics, container, debug_attributes, determine_gaps, numeric_attributes, text_length};

/// Free text on the line, drawn without a box.
#[derive(Debug, Clone)]
pub struct Comment {
    text: String,
    href: Option<String>,
    title: Option<String>,
    attributes: Attributes,
    options: Options,
    metrics: Metrics,
}

impl Comment {
    pub fn new(text: impl Into<String>, options: &Options) -> Self {
        let text = text.into();
        let metrics = Metrics {
            width: text_length(&text) * options.default_char_width + 10.0,
            height: 0.0,
            up: 8.0,
            down: 8.0,
            needs_space: true,
        };
        let mut attributes = Attributes::new();
        debug_attributes(&mut attributes, options, &[metrics.up, metrics.down], "comment");
        Self {
            text,
            href: None,
            title: None,
            attributes,
            options: options.clone(),
            metrics,
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Component for Comment {
    fn kind(&self) -> &'static str {
        "comment"
    }

    fn metrics(&self) -> Metrics {
        self.metrics
    }

    fn format(&self, x: f64, y: f64, width: f64) -> Element {
        let o = &self.options;
        let m = &self.metrics;
        let gaps = determine_gaps(width, m.width, o);
        let mut g = container("g", &self.attributes);

        Path::new(x, y, o).h(gaps.left).add_to(&mut g);
        Path::new(x + gaps.left + m.width, y + m.height, o)
            .h(gaps.right)
            .add_to(&mut g);

        let x = x + gaps.left;
        let mut attributes = numeric_attributes(&[("x", x + m.width / 2.0), ("y", y + 5.0)]);
        attributes.set("class", "comment");
        let text = Element::with_text("text", attributes, self.text.as_str());

        match self.href.as_deref().filter(|h| !h.is_empty()) {
            Some(href) => {
                let mut link = Attributes::new();
                link.set("xlink:href", href);
                let mut a = Element::with_attributes("a", link);
                a.append_child(text);
                a.add_to(&mut g);
            }
            None => text.add_to(&mut g),
        }

        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            Element::with_text("title", Attributes::new(), title).add_to(&mut g);
        }

        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_draws_plain_text() {
        let c = Comment::new("any", &Options::default());
        assert_eq!(c.metrics().width, 35.5);
        let svg = c.format(0.0, 0.0, 35.5).to_string();
        let expected = concat!(
            "<g>\n",
            "<path d=\"M 0 0 h 0\"></path>\n",
            "<path d=\"M 35.5 0 h 0\"></path>\n",
            "<text x=\"17.75\" y=\"5\" class=\"comment\">any</text>\n",
            "</g>\n",
        );
        assert_eq!(svg, expected);
    }

    #[test]
    fn comment_link_and_title() {
        let c = Comment::new("note", &Options::default())
            .with_href("https://example.org")
            .with_title("more");
        let g = c.format(0.0, 0.0, 0.0);
        let tags: Vec<&str> = g.elements().iter().map(Element::tag).collect();
        assert_eq!(tags, ["path", "path", "a", "title"]);
    }
}
