use serde::{Deserialize, Serialize};

/// Where a node sits when its slot is wider than the node itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Drawing options shared by every node of a diagram. Each node keeps its own
/// copy, taken at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Write sizing information into `data-*` attributes.
    pub debug: bool,
    /// Minimum vertical gap between stacked content. For a 3px stroke this
    /// must be at least 4.
    pub vertical_separation: f64,
    pub arc_radius: f64,
    /// Class put on the root `<svg>`.
    pub diagram_class: String,
    /// Shift the drawing by half a pixel so odd stroke widths land on whole
    /// pixels.
    pub stroke_odd_pixel_length: bool,
    pub internal_alignment: Alignment,
    pub default_char_width: f64,
    pub comment_char_width: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            debug: false,
            vertical_separation: 8.0,
            arc_radius: 10.0,
            diagram_class: "railroad-diagram".to_string(),
            stroke_odd_pixel_length: true,
            internal_alignment: Alignment::Center,
            default_char_width: 8.5,
            comment_char_width: 7.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let options: Options =
            serde_json::from_str(r#"{"arcRadius": 12, "internalAlignment": "left"}"#).unwrap();
        assert_eq!(options.arc_radius, 12.0);
        assert_eq!(options.internal_alignment, Alignment::Left);
        assert_eq!(options.vertical_separation, 8.0);
        assert_eq!(options.diagram_class, "railroad-diagram");
    }
}
