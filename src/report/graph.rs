use std::collections::{HashMap, HashSet};

use dot_structures::{
    Attribute, Edge, EdgeTy, Graph, GraphAttributes, Id, Node, NodeId, Stmt, Vertex,
};
use serde::Serialize;

use crate::system::process::ProcessRecord;

/// Field names of a root node label, in label order.
pub const ROOT_LABEL_FIELDS: [&str; 7] = [
    "PID",
    "Name",
    "Username",
    "Command Line",
    "Elevation",
    "PPID",
    "Base Priority",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub pid: u32,
    /// Multi-line label; `None` for bare descendant nodes.
    pub label: Option<String>,
}

/// Strict directed graph of a hierarchy: one node per pid, one edge per pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProcessGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<(u32, u32)>,
    #[serde(skip)]
    node_index: HashMap<u32, usize>,
    #[serde(skip)]
    edge_set: HashSet<(u32, u32)>,
}

/// Graph-level layout attributes passed through to Graphviz.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphStyle {
    pub rankdir: String,
    pub node_shape: String,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            rankdir: "TB".to_string(),
            node_shape: "box".to_string(),
        }
    }
}

pub fn root_label(record: &ProcessRecord) -> String {
    let values = [
        record.pid.to_string(),
        record.name.clone(),
        record.username_or_empty().to_string(),
        record.command_line.clone(),
        record.created_at.to_string(),
        record.ppid.to_string(),
        record.priority_or_empty(),
    ];
    ROOT_LABEL_FIELDS
        .iter()
        .zip(values)
        .map(|(field, value)| format!("{field}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ProcessGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a root node carrying the full label of `record`.
    pub fn add_root(&mut self, record: &ProcessRecord) {
        self.add_node(record.pid, Some(root_label(record)));
    }

    /// Adds a bare node and the edge `root -> pid`.
    pub fn add_descendant(&mut self, root: u32, pid: u32) {
        self.add_node(pid, None);
        self.add_edge(root, pid);
    }

    /// Adding an existing pid never erases its label.
    pub fn add_node(&mut self, pid: u32, label: Option<String>) {
        match self.node_index.get(&pid) {
            Some(&idx) => {
                if label.is_some() {
                    self.nodes[idx].label = label;
                }
            }
            None => {
                self.node_index.insert(pid, self.nodes.len());
                self.nodes.push(GraphNode { pid, label });
            }
        }
    }

    pub fn add_edge(&mut self, from: u32, to: u32) {
        if self.edge_set.insert((from, to)) {
            self.edges.push((from, to));
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    pub fn node(&self, pid: u32) -> Option<&GraphNode> {
        self.node_index.get(&pid).map(|&idx| &self.nodes[idx])
    }

    pub fn has_edge(&self, from: u32, to: u32) -> bool {
        self.edge_set.contains(&(from, to))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Converts to a strict Graphviz digraph.
    pub fn to_dot(&self, style: &GraphStyle) -> Graph {
        let mut stmts = vec![
            Stmt::GAttribute(GraphAttributes::Graph(vec![attr("rankdir", &style.rankdir)])),
            Stmt::GAttribute(GraphAttributes::Node(vec![attr("shape", &style.node_shape)])),
        ];

        for node in &self.nodes {
            let attributes = match &node.label {
                Some(label) => vec![Attribute(
                    Id::Plain("label".to_string()),
                    Id::Escaped(quote_label(label)),
                )],
                None => Vec::new(),
            };
            stmts.push(Stmt::Node(Node {
                id: node_id(node.pid),
                attributes,
            }));
        }

        for &(from, to) in &self.edges {
            stmts.push(Stmt::Edge(Edge {
                ty: EdgeTy::Pair(Vertex::N(node_id(from)), Vertex::N(node_id(to))),
                attributes: Vec::new(),
            }));
        }

        Graph::DiGraph {
            id: Id::Plain("process_flow".to_string()),
            strict: true,
            stmts,
        }
    }
}

fn attr(key: &str, value: &str) -> Attribute {
    Attribute(Id::Plain(key.to_string()), Id::Escaped(quote_label(value)))
}

fn node_id(pid: u32) -> NodeId {
    NodeId(Id::Plain(pid.to_string()), None)
}

/// Quotes `text` as a DOT string; embedded newlines become centered line breaks.
pub fn quote_label(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pid: u32) -> ProcessRecord {
        ProcessRecord {
            pid,
            ppid: 1,
            name: "demo".into(),
            command_line: "demo --port 80".into(),
            created_at: 1_700_000_000,
            priority: Some(0),
            username: Some("alice".into()),
        }
    }

    #[test]
    fn root_label_has_seven_fields_in_order() {
        let label = root_label(&record(100));
        let keys: Vec<&str> = label
            .lines()
            .map(|line| line.split_once(": ").map(|(k, _)| k).unwrap_or(line))
            .collect();
        assert_eq!(keys, ROOT_LABEL_FIELDS);
        assert!(label.starts_with("PID: 100\nName: demo\n"));
    }

    #[test]
    fn strict_graph_dedupes_nodes_and_edges() {
        let mut g = ProcessGraph::new();
        g.add_root(&record(100));
        g.add_descendant(100, 101);
        g.add_descendant(100, 101);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edges(), &[(100, 101)]);
    }

    #[test]
    fn bare_add_keeps_existing_label() {
        let mut g = ProcessGraph::new();
        g.add_root(&record(100));
        g.add_root(&record(200));
        // 200 is also below 100 (same name nested)
        g.add_descendant(100, 200);
        assert!(g.node(200).and_then(|n| n.label.as_ref()).is_some());
        assert!(g.has_edge(100, 200));
    }

    #[test]
    fn quoting_escapes_dot_metacharacters() {
        assert_eq!(quote_label("a\"b\\c\nd"), "\"a\\\"b\\\\c\\nd\"");
    }

    #[test]
    fn dot_graph_is_strict_digraph() {
        let mut g = ProcessGraph::new();
        g.add_root(&record(100));
        g.add_descendant(100, 101);
        match g.to_dot(&GraphStyle::default()) {
            Graph::DiGraph { strict, stmts, .. } => {
                assert!(strict);
                let nodes = stmts.iter().filter(|s| matches!(s, Stmt::Node(_))).count();
                let edges = stmts.iter().filter(|s| matches!(s, Stmt::Edge(_))).count();
                assert_eq!((nodes, edges), (2, 1));
            }
            Graph::Graph { .. } => panic!("expected a directed graph"),
        }
    }
}
