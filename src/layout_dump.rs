use crate::railroad::{Component, Diagram};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub rules: Vec<RuleDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDump {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub up: f64,
    pub down: f64,
    pub nodes: Vec<NodeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub kind: String,
    pub depth: usize,
    pub width: f64,
    pub height: f64,
    pub up: f64,
    pub down: f64,
    pub needs_space: bool,
}

impl RuleDump {
    /// Nodes in pre-order; the diagram's own items are at depth 0.
    pub fn from_diagram(name: &str, diagram: &Diagram) -> Self {
        let mut nodes = Vec::new();
        for item in diagram.items() {
            collect(item.as_ref(), 0, &mut nodes);
        }
        let m = diagram.metrics();
        RuleDump {
            name: name.to_string(),
            width: m.width,
            height: m.height,
            up: m.up,
            down: m.down,
            nodes,
        }
    }
}

fn collect(node: &dyn Component, depth: usize, out: &mut Vec<NodeDump>) {
    let m = node.metrics();
    out.push(NodeDump {
        kind: node.kind().to_string(),
        depth,
        width: m.width,
        height: m.height,
        up: m.up,
        down: m.down,
        needs_space: m.needs_space,
    });
    for child in node.children() {
        collect(child, depth + 1, out);
    }
}

pub fn write_layout_dump(path: &Path, diagrams: &[(String, &Diagram)]) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump {
        rules: diagrams
            .iter()
            .map(|(name, diagram)| RuleDump::from_diagram(name, diagram))
            .collect(),
    };
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::railroad::{Choice, Options};

    #[test]
    fn dumps_nodes_in_walk_order() {
        let options = Options::default();
        let diagram = Diagram::new([Choice::new(0, ["a", "bc"], &options).unwrap()], &options);
        let dump = RuleDump::from_diagram("pick", &diagram);
        let kinds: Vec<(&str, usize)> = dump
            .nodes
            .iter()
            .map(|node| (node.kind.as_str(), node.depth))
            .collect();
        assert_eq!(
            kinds,
            [("start", 0), ("choice", 0), ("terminal", 1), ("terminal", 1), ("end", 0)]
        );
        assert_eq!(dump.nodes[2].width, 28.5);
        assert!(dump.nodes[2].needs_space);
        assert_eq!(dump.width, diagram.metrics().width);
    }

    #[test]
    fn writes_pretty_json() {
        let options = Options::default();
        let diagram = Diagram::new(["a"], &options);
        let path = std::env::temp_dir().join(format!("ebnf-railroad-dump-{}.json", std::process::id()));
        write_layout_dump(&path, &[("a".to_string(), &diagram)]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["rules"][0]["name"], "a");
        assert_eq!(value["rules"][0]["nodes"][1]["needsSpace"], true);
        assert!(text.contains("\n  "));
    }
}
