use crate::config::{Config, RenderConfig};
use crate::description::diagram_from_json;
use crate::error::Result;
use crate::parser::parse;
use crate::railroad::Diagram;
use crate::translate::rule_diagram;
use std::path::Path;

/// Markup of one grammar rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRule {
    pub name: String,
    pub svg: String,
}

/// Lays out a diagram with the configured padding and serializes it.
pub fn render_diagram(diagram: &Diagram, render: &RenderConfig) -> Result<String> {
    diagram.format(0.0, 0.0, 0.0, render.padding)?;
    if render.standalone {
        Ok(diagram.to_standalone(render.style.as_deref()))
    } else {
        Ok(diagram.to_string())
    }
}

/// One diagram per rule, in source order.
pub fn render_grammar(source: &str, config: &Config) -> Result<Vec<RenderedRule>> {
    let grammar = parse(source)?;
    grammar
        .rules
        .iter()
        .map(|rule| {
            let diagram = rule_diagram(rule, &config.options, &config.render)?;
            Ok(RenderedRule {
                name: rule.identifier.clone(),
                svg: render_diagram(&diagram, &config.render)?,
            })
        })
        .collect()
}

/// Renders a single named rule, if the grammar has it.
pub fn render_rule(source: &str, name: &str, config: &Config) -> Result<Option<RenderedRule>> {
    let grammar = parse(source)?;
    let Some(rule) = grammar.rule(name) else {
        return Ok(None);
    };
    let diagram = rule_diagram(rule, &config.options, &config.render)?;
    Ok(Some(RenderedRule {
        name: rule.identifier.clone(),
        svg: render_diagram(&diagram, &config.render)?,
    }))
}

pub fn render_description(json: &str, config: &Config) -> Result<String> {
    let diagram = diagram_from_json(json, &config.options)?;
    render_diagram(&diagram, &config.render)
}

/// Every rule's markup, one after another.
pub fn render_document(rules: &[RenderedRule]) -> String {
    let mut out = String::new();
    for rule in rules {
        out.push_str(&rule.svg);
        if !rule.svg.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

/// Rasterizes standalone markup. Diagrams carry their own size; the
/// configured canvas only applies when they do not.
#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> anyhow::Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some(color) = parse_hex_color(&render_cfg.background) {
        pixmap.fill(color);
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(feature = "png")]
fn parse_hex_color(value: &str) -> Option<resvg::tiny_skia::Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(resvg::tiny_skia::Color::from_rgba8(
        channel(0)?,
        channel(2)?,
        channel(4)?,
        255,
    ))
}
