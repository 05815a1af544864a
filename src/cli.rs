use crate::config::{Config, load_config};
use crate::description::diagram_from_json;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse;
use crate::railroad::Diagram;
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::{render_diagram, write_output_svg};
use crate::translate::rule_diagram;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "railroad", version, about = "EBNF to SVG railroad diagrams")]
pub struct Args {
    /// Input file (.ebnf, .md or .json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for a single SVG.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Render only the rule with this name
    #[arg(long = "rule")]
    pub rule: Option<String>,

    /// Draw fragment markers instead of whole-rule markers
    #[arg(long = "complex")]
    pub complex: bool,

    /// Emit bare markup without namespaces or stylesheet
    #[arg(long = "inline")]
    pub inline: bool,

    /// Write per-node metrics as JSON to this path
    #[arg(long = "dumpMetrics")]
    pub dump_metrics: Option<PathBuf>,

    /// PNG canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// PNG canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Log debug events to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Ebnf,
    Markdown,
    Description,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if args.complex {
        config.render.complex = true;
    }
    if args.inline {
        config.render.standalone = false;
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if args.output_format == OutputFormat::Png {
        config.render.standalone = true;
    }

    let (input, kind) = read_input(args.input.as_deref())?;
    let diagrams = build_diagrams(&input, kind, args.rule.as_deref(), &config, args.input.as_deref())?;
    info!(diagrams = diagrams.len(), "building diagrams");

    if let Some(path) = args.dump_metrics.as_deref() {
        let named: Vec<(String, &Diagram)> = diagrams
            .iter()
            .map(|(name, diagram)| (name.clone(), diagram))
            .collect();
        write_layout_dump(path, &named)?;
    }

    if let [(_, diagram)] = diagrams.as_slice() {
        let svg = render_diagram(diagram, &config.render)?;
        return match args.output_format {
            OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref()),
            OutputFormat::Png => {
                let output = ensure_output(&args.output, "png")?;
                write_png(&svg, &output, &config)
            }
        };
    }

    let names: Vec<&str> = diagrams.iter().map(|(name, _)| name.as_str()).collect();
    let outputs = resolve_multi_outputs(args.output.as_deref(), args.output_format, &names)?;
    for ((name, diagram), output) in diagrams.iter().zip(&outputs) {
        let svg = render_diagram(diagram, &config.render)?;
        debug!(rule = %name, path = %output.display(), "writing diagram");
        match args.output_format {
            OutputFormat::Svg => write_output_svg(&svg, Some(output))?,
            OutputFormat::Png => write_png(&svg, output, &config)?,
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "ebnf_railroad=debug"
    } else {
        "ebnf_railroad=warn"
    };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the 'png' feature"))
}

/// Named diagrams for every rule (or the selected one) in the input.
fn build_diagrams(
    input: &str,
    kind: InputKind,
    rule: Option<&str>,
    config: &Config,
    path: Option<&Path>,
) -> Result<Vec<(String, Diagram)>> {
    if kind == InputKind::Description {
        let name = path
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("diagram")
            .to_string();
        return Ok(vec![(name, diagram_from_json(input, &config.options)?)]);
    }

    let sources = match kind {
        InputKind::Markdown => extract_ebnf_blocks(input),
        _ => vec![input.to_string()],
    };
    if sources.is_empty() {
        return Err(anyhow::anyhow!("No EBNF blocks found in input"));
    }

    let mut diagrams = Vec::new();
    for source in &sources {
        let grammar = parse(source)?;
        for item in &grammar.rules {
            if rule.is_some_and(|wanted| wanted != item.identifier) {
                continue;
            }
            let diagram = rule_diagram(item, &config.options, &config.render)?;
            diagrams.push((item.identifier.clone(), diagram));
        }
    }
    if diagrams.is_empty() {
        return Err(match rule {
            Some(name) => anyhow::anyhow!("Rule '{name}' not found"),
            None => anyhow::anyhow!("No rules found in input"),
        });
    }
    Ok(diagrams)
}

fn read_input(path: Option<&Path>) -> Result<(String, InputKind)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, InputKind::Ebnf));
        }
        let content = std::fs::read_to_string(path)?;
        let kind = match path.extension().and_then(|e| e.to_str()) {
            Some("md" | "markdown") => InputKind::Markdown,
            Some("json") => InputKind::Description,
            _ => InputKind::Ebnf,
        };
        return Ok((content, kind));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, InputKind::Ebnf))
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

fn extract_ebnf_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut in_block = false;
    let mut current = Vec::new();
    let mut fence = String::new();

    for line in input.lines() {
        let trimmed = line.trim();
        if !in_block {
            if let Some(start_fence) = detect_ebnf_fence(trimmed) {
                in_block = true;
                fence = start_fence;
                continue;
            }
        } else if is_fence_end(trimmed, &fence) {
            in_block = false;
            blocks.push(current.join("\n"));
            current.clear();
            continue;
        }

        if in_block {
            current.push(line.to_string());
        }
    }

    blocks
}

fn detect_ebnf_fence(line: &str) -> Option<String> {
    for marker in ["```", "~~~"] {
        if line.starts_with(marker) {
            let rest = line.trim_start_matches(&marker[..1]).trim();
            if rest.starts_with("ebnf") {
                return Some(marker.to_string());
            }
        }
    }
    None
}

fn is_fence_end(line: &str, fence: &str) -> bool {
    if !line.starts_with(fence) {
        return false;
    }
    line[fence.len()..].trim().is_empty()
}

/// Rule names made safe for use in a file name.
fn file_slug(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' })
        .collect()
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    names: &[&str],
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    let base =
        output.ok_or_else(|| anyhow::anyhow!("Output path required when rendering several rules"))?;
    if base.is_dir() {
        return Ok(names
            .iter()
            .map(|name| base.join(format!("{}.{}", file_slug(name), ext)))
            .collect());
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("diagram");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    Ok(names
        .iter()
        .map(|name| parent.join(format!("{}-{}.{}", stem, file_slug(name), ext)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_ebnf_blocks() {
        let input = r#"
text
``` ebnf
digit = "0" | "1";
```
more
~~~ebnf
letter = "a";
~~~
```rust
fn main() {}
```
"#;
        let blocks = extract_ebnf_blocks(input);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("digit"));
        assert!(blocks[1].contains("letter"));
    }

    #[test]
    fn names_outputs_after_rules() {
        let outputs = resolve_multi_outputs(
            Some(Path::new("out/grammar.svg")),
            OutputFormat::Svg,
            &["digit", "one minus one"],
        )
        .unwrap();
        assert_eq!(
            outputs,
            [
                PathBuf::from("out/grammar-digit.svg"),
                PathBuf::from("out/grammar-one-minus-one.svg"),
            ]
        );

        let dir = std::env::temp_dir();
        let outputs = resolve_multi_outputs(Some(dir.as_path()), OutputFormat::Png, &["digit"]).unwrap();
        assert_eq!(outputs, [dir.join("digit.png")]);

        assert!(resolve_multi_outputs(None, OutputFormat::Svg, &["a", "b"]).is_err());
    }

    #[test]
    fn selects_a_single_rule() {
        let config = Config::default();
        let source = "digit = \"0\" | \"1\";\nnumber = digit, { digit };";
        let diagrams = build_diagrams(source, InputKind::Ebnf, Some("number"), &config, None).unwrap();
        assert_eq!(diagrams.len(), 1);
        assert_eq!(diagrams[0].0, "number");

        let err = build_diagrams(source, InputKind::Ebnf, Some("letter"), &config, None).unwrap_err();
        assert_eq!(err.to_string(), "Rule 'letter' not found");
    }

    #[test]
    fn gathers_rules_across_markdown_blocks() {
        let input = "```ebnf\na = \"x\";\n```\n\n```ebnf\nb = a;\nc = b;\n```\n";
        let diagrams =
            build_diagrams(input, InputKind::Markdown, None, &Config::default(), None).unwrap();
        let names: Vec<&str> = diagrams.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert!(build_diagrams("no fences", InputKind::Markdown, None, &Config::default(), None).is_err());
    }

    #[test]
    fn descriptions_are_named_after_the_file() {
        let diagrams = build_diagrams(
            r#"["a"]"#,
            InputKind::Description,
            None,
            &Config::default(),
            Some(Path::new("docs/pick.json")),
        )
        .unwrap();
        assert_eq!(diagrams[0].0, "pick");
    }
}
