use ebnf_railroad::railroad::{Document, Options};
use ebnf_railroad::translate::rule_diagram;
use ebnf_railroad::{Config, parse, render_document, render_grammar};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EbnfRenderOptions {
    rule: Option<String>,
    complex: Option<bool>,
    label_rules: Option<bool>,
    wrap_width: Option<f64>,
    inline: Option<bool>,
    style: Option<String>,
    railroad: Option<Options>,
}

fn build_config(options: &EbnfRenderOptions) -> Config {
    let mut config = Config::default();
    if let Some(railroad) = options.railroad.clone() {
        config.options = railroad;
    }
    if let Some(complex) = options.complex {
        config.render.complex = complex;
    }
    if let Some(label_rules) = options.label_rules {
        config.render.label_rules = label_rules;
    }
    if let Some(inline) = options.inline {
        config.render.standalone = !inline;
    }
    config.render.wrap_width = options.wrap_width;
    config.render.style = options.style.clone();
    config
}

fn parse_options(options_json: Option<String>) -> Result<EbnfRenderOptions, JsValue> {
    match options_json {
        Some(raw_options) => serde_json::from_str::<EbnfRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(EbnfRenderOptions::default()),
    }
}

fn render_svg(code: &str, options: &EbnfRenderOptions) -> Result<String, String> {
    let config = build_config(options);
    let mut rules = render_grammar(code, &config).map_err(|error| error.to_string())?;
    if let Some(name) = options.rule.as_deref() {
        rules.retain(|rule| rule.name == name);
        if rules.is_empty() {
            return Err(format!("Rule '{name}' not found"));
        }
    }
    Ok(render_document(&rules))
}

#[wasm_bindgen]
pub fn render_ebnf_svg(code: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json)?;
    render_svg(code, &options).map_err(|error| JsValue::from_str(&error))
}

/// Builds the `<svg>` of one rule (the first by default) as live DOM nodes.
#[wasm_bindgen]
pub fn render_ebnf_dom(
    document: web_sys::Document,
    code: &str,
    options_json: Option<String>,
) -> Result<web_sys::Element, JsValue> {
    let options = parse_options(options_json)?;
    let config = build_config(&options);
    let grammar = parse(code).map_err(to_js)?;
    let rule = match options.rule.as_deref() {
        Some(name) => grammar.rule(name),
        None => grammar.rules.first(),
    }
    .ok_or_else(|| JsValue::from_str("No matching rule in grammar"))?;
    let diagram = rule_diagram(rule, &config.options, &config.render).map_err(to_js)?;
    diagram
        .format(0.0, 0.0, 0.0, config.render.padding)
        .map_err(to_js)?;
    diagram.to_dom(Some(&BrowserDocument(document))).map_err(to_js)
}

fn to_js(error: ebnf_railroad::Error) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Browser document seen through the renderer's DOM interface.
struct BrowserDocument(web_sys::Document);

fn dom_error(error: JsValue) -> ebnf_railroad::Error {
    ebnf_railroad::Error::Dom(error.as_string().unwrap_or_else(|| format!("{error:?}")))
}

impl Document for BrowserDocument {
    type Element = web_sys::Element;

    fn create_element_ns(&self, namespace: &str, tag: &str) -> ebnf_railroad::Result<Self::Element> {
        self.0.create_element_ns(Some(namespace), tag).map_err(dom_error)
    }

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str) -> ebnf_railroad::Result<()> {
        element.set_attribute(name, value).map_err(dom_error)
    }

    fn set_attribute_ns(
        &self,
        element: &Self::Element,
        namespace: &str,
        name: &str,
        value: &str,
    ) -> ebnf_railroad::Result<()> {
        element
            .set_attribute_ns(Some(namespace), name, value)
            .map_err(dom_error)
    }

    fn set_text_content(&self, element: &Self::Element, text: &str) {
        element.set_text_content(Some(text));
    }

    fn append_child(&self, parent: &Self::Element, child: &Self::Element) -> ebnf_railroad::Result<()> {
        parent.append_child(child).map(|_| ()).map_err(dom_error)
    }
}

#[cfg(test)]
mod tests {
    use crate::{EbnfRenderOptions, render_svg};

    #[test]
    fn renders_every_rule_by_default() {
        let code = "digit = \"0\" | \"1\" ;\nnumber = digit , { digit } ;";
        let svg = render_svg(code, &EbnfRenderOptions::default()).expect("grammar should render");
        assert_eq!(svg.matches("<svg ").count(), 2);
        assert!(svg.contains(">digit</text>"));
        assert!(svg.contains(">number</text>"));
    }

    #[test]
    fn picks_one_rule_inline() {
        let options: EbnfRenderOptions =
            serde_json::from_str(r#"{"rule": "number", "inline": true, "railroad": {"arcRadius": 8}}"#)
                .unwrap();
        let svg = render_svg("digit = \"0\" ;\nnumber = digit ;", &options).unwrap();
        assert_eq!(svg.matches("<svg ").count(), 1);
        assert!(!svg.contains("<style>"));

        let missing: EbnfRenderOptions = serde_json::from_str(r#"{"rule": "letter"}"#).unwrap();
        assert_eq!(
            render_svg("digit = \"0\" ;", &missing).unwrap_err(),
            "Rule 'letter' not found"
        );
    }
}
