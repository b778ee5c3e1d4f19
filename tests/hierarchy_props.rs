use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use color_eyre::Result;
use dot_structures::Graph;
use proptest::prelude::*;

use procflow::hierarchy::build_hierarchy;
use procflow::report::render::dot_source;
use procflow::report::{GraphRenderer, ReportWriter};
use procflow::system::process::ProcessRecord;
use procflow::system::table::StaticProcessTable;

const NAMES: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

struct DotSourceRenderer;

impl GraphRenderer for DotSourceRenderer {
    fn render(&self, graph: &Graph, output: &Path) -> Result<()> {
        fs::write(output, dot_source(graph))?;
        Ok(())
    }
}

/// Fresh output root per generated case.
struct ScratchDir(PathBuf);

impl ScratchDir {
    fn new() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let path = std::env::temp_dir().join(format!(
            "procflow_props_{}_{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = fs::remove_dir_all(&path);
        Self(path)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// Forest of `n` processes where each parent has a smaller pid.
fn arb_forest() -> impl Strategy<Value = Vec<ProcessRecord>> {
    (1usize..60)
        .prop_flat_map(|n| {
            (
                proptest::collection::vec(any::<prop::sample::Index>(), n),
                proptest::collection::vec(0usize..NAMES.len(), n),
            )
        })
        .prop_map(|(parents, names)| {
            parents
                .iter()
                .zip(names)
                .enumerate()
                .map(|(i, (parent, name))| {
                    let pid = i as u32 + 1;
                    let ppid = if i == 0 { 0 } else { parent.index(i) as u32 + 1 };
                    ProcessRecord {
                        pid,
                        ppid,
                        name: NAMES[name].to_string(),
                        command_line: String::new(),
                        created_at: 0,
                        priority: None,
                        username: None,
                    }
                })
                .collect()
        })
}

fn naive_closure(records: &[ProcessRecord], root: u32) -> BTreeSet<u32> {
    let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
    for r in records {
        if r.pid != r.ppid {
            children.entry(r.ppid).or_default().push(r.pid);
        }
    }
    let mut out = BTreeSet::new();
    let mut stack = children.get(&root).cloned().unwrap_or_default();
    while let Some(pid) = stack.pop() {
        if out.insert(pid) {
            stack.extend(children.get(&pid).cloned().unwrap_or_default());
        }
    }
    out
}

proptest! {
    #[test]
    fn descendants_equal_transitive_closure(records in arb_forest(), name_idx in 0usize..NAMES.len()) {
        let name = NAMES[name_idx];
        let mut table = StaticProcessTable::new(records.clone());
        let h = build_hierarchy(&mut table, name);

        let expected_roots: Vec<u32> = records.iter().filter(|r| r.name == name).map(|r| r.pid).collect();
        prop_assert_eq!(h.roots().collect::<Vec<_>>(), expected_roots);

        for (root, descendants) in h.iter() {
            let got: BTreeSet<u32> = descendants.iter().copied().collect();
            prop_assert_eq!(got.len(), descendants.len(), "duplicate descendant");
            prop_assert!(!got.contains(&root));
            prop_assert_eq!(got, naive_closure(&records, root));
        }
    }

    #[test]
    fn written_report_has_a_node_and_edge_per_descendant(records in arb_forest(), name_idx in 0usize..NAMES.len()) {
        let mut table = StaticProcessTable::new(records);
        let h = build_hierarchy(&mut table, NAMES[name_idx]);
        let out = ScratchDir::new();
        let writer = ReportWriter::new(&out.0, DotSourceRenderer);

        let report = writer.write_report(&mut table, &h).unwrap();
        let dot = fs::read_to_string(&report.artifacts.paths.image_path).unwrap();
        let graph = &report.graph;

        prop_assert!(report.artifacts.skipped.is_empty());
        prop_assert_eq!(report.artifacts.nodes, graph.node_count());
        for (root, descendants) in h.iter() {
            prop_assert!(graph.node(root).and_then(|n| n.label.as_ref()).is_some());
            for &pid in descendants {
                prop_assert!(graph.node(pid).is_some());
                prop_assert!(graph.has_edge(root, pid));
                let edge = format!("{root} -> {pid}");
                prop_assert!(dot.contains(&edge), "missing {} in dot output", edge);
            }
        }
        let mut seen = BTreeSet::new();
        for &edge in graph.edges() {
            prop_assert!(seen.insert(edge), "duplicate edge {:?}", edge);
        }
        prop_assert_eq!(dot.matches(" -> ").count(), graph.edges().len());
    }
}
