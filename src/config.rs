use crate::railroad::{Options, Padding};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub padding: Padding,
    /// Emit namespace declarations and an embedded stylesheet.
    pub standalone: bool,
    /// Replaces the default stylesheet of standalone output.
    pub style: Option<String>,
    /// Use the single-tick markers meant for fragments.
    pub complex: bool,
    /// Put the rule name on the start marker.
    pub label_rules: bool,
    /// Sequences wider than this are broken into stacked rows.
    pub wrap_width: Option<f64>,
    /// PNG canvas used when the drawing has no usable size of its own.
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            padding: Padding::default(),
            standalone: true,
            style: None,
            complex: false,
            label_rules: true,
            wrap_width: None,
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub options: Options,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    padding: Option<Padding>,
    standalone: Option<bool>,
    style: Option<String>,
    complex: Option<bool>,
    label_rules: Option<bool>,
    wrap_width: Option<f64>,
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    options: Option<Options>,
    render: Option<RenderConfigFile>,
}

/// Reads a camelCase JSON config. Files that are not strict JSON are retried
/// as JSON5 so comments and trailing commas are accepted.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(err) => json5::from_str(contents).map_err(|_| err)?,
    };

    let mut config = Config::default();
    if let Some(options) = parsed.options {
        config.options = options;
    }
    if let Some(render) = parsed.render {
        let target = &mut config.render;
        if let Some(v) = render.padding {
            target.padding = v;
        }
        if let Some(v) = render.standalone {
            target.standalone = v;
        }
        if let Some(v) = render.style {
            target.style = Some(v);
        }
        if let Some(v) = render.complex {
            target.complex = v;
        }
        if let Some(v) = render.label_rules {
            target.label_rules = v;
        }
        if let Some(v) = render.wrap_width {
            target.wrap_width = Some(v);
        }
        if let Some(v) = render.width {
            target.width = v;
        }
        if let Some(v) = render.height {
            target.height = v;
        }
        if let Some(v) = render.background {
            target.background = v;
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::railroad::Alignment;

    #[test]
    fn missing_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.render.standalone);
        assert!(config.render.label_rules);
        assert_eq!(config.render.wrap_width, None);
    }

    #[test]
    fn partial_sections_merge_over_defaults() {
        let config = parse_config(
            r#"{
                "options": { "arcRadius": 12, "internalAlignment": "left" },
                "render": { "complex": true, "wrapWidth": 400, "padding": { "top": 5 } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.options.arc_radius, 12.0);
        assert_eq!(config.options.internal_alignment, Alignment::Left);
        assert_eq!(config.options.vertical_separation, 8.0);
        assert!(config.render.complex);
        assert!(config.render.label_rules);
        assert_eq!(config.render.wrap_width, Some(400.0));
        assert_eq!(config.render.padding, Padding::uniform(5.0));
    }

    #[test]
    fn accepts_json5() {
        let config = parse_config(
            "{\n  // fragments\n  render: { complex: true, labelRules: false, },\n}",
        )
        .unwrap();
        assert!(config.render.complex);
        assert!(!config.render.label_rules);
    }

    #[test]
    fn reports_the_json_error() {
        let err = parse_config("{ \"options\": 3 }").unwrap_err();
        assert!(err.to_string().contains("invalid type"));
    }

    #[test]
    fn reads_from_disk() {
        let path = std::env::temp_dir().join(format!("ebnf-railroad-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"render": {"standalone": false}}"#).unwrap();
        let config = load_config(Some(path.as_path())).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(!config.render.standalone);
    }
}
