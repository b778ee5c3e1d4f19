use std::collections::BTreeSet;

use color_eyre::Result;

use crate::hierarchy::{Hierarchy, build_hierarchy};
use crate::report::{GraphRenderer, Report, ReportWriter};
use crate::system::process::ProcessRecord;
use crate::system::table::ProcessTable;

/// Everything the presentation layer needs after one visualization.
#[derive(Clone, Debug)]
pub struct Visualization {
    pub hierarchy: Hierarchy,
    pub report: Report,
}

/// Distinct, non-empty process names of a snapshot.
pub fn names_from_records(records: &[ProcessRecord]) -> BTreeSet<String> {
    records
        .iter()
        .filter(|record| !record.name.is_empty())
        .map(|record| record.name.clone())
        .collect()
}

/// Core entry points consumed by the UI and the headless CLI.
pub struct Visualizer<T, R> {
    table: T,
    writer: ReportWriter<R>,
}

impl<T: ProcessTable, R: GraphRenderer> Visualizer<T, R> {
    pub fn new(table: T, writer: ReportWriter<R>) -> Self {
        Self { table, writer }
    }

    pub fn table_mut(&mut self) -> &mut T {
        &mut self.table
    }

    pub fn writer(&self) -> &ReportWriter<R> {
        &self.writer
    }

    pub fn list_process_names(&mut self) -> BTreeSet<String> {
        names_from_records(&self.table.processes())
    }

    /// Builds the hierarchy for `name` and writes its report.
    pub fn visualize(&mut self, name: &str) -> Result<Visualization> {
        let hierarchy = build_hierarchy(&mut self.table, name);
        let report = self.writer.write_report(&mut self.table, &hierarchy)?;
        Ok(Visualization { hierarchy, report })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use dot_structures::Graph;

    use super::*;
    use crate::system::table::StaticProcessTable;

    struct NullRenderer;

    impl GraphRenderer for NullRenderer {
        fn render(&self, _graph: &Graph, output: &Path) -> Result<()> {
            std::fs::write(output, b"")?;
            Ok(())
        }
    }

    fn rec(pid: u32, ppid: u32, name: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            ppid,
            name: name.to_string(),
            command_line: String::new(),
            created_at: 0,
            priority: None,
            username: None,
        }
    }

    #[test]
    fn names_are_distinct_and_sorted() {
        let table = StaticProcessTable::new(vec![
            rec(1, 0, "zsh"),
            rec(2, 1, "bash"),
            rec(3, 1, "bash"),
            rec(4, 1, ""),
        ]);
        let writer = ReportWriter::new(std::env::temp_dir(), NullRenderer);
        let mut v = Visualizer::new(table, writer);
        let names: Vec<String> = v.list_process_names().into_iter().collect();
        assert_eq!(names, vec!["bash".to_string(), "zsh".to_string()]);
    }

    #[test]
    fn visualize_writes_both_artifacts() {
        let root = std::env::temp_dir().join(format!("procflow_visualize_{}", std::process::id()));
        let table = StaticProcessTable::new(vec![rec(10, 1, "demo"), rec(11, 10, "child")]);
        let mut v = Visualizer::new(table, ReportWriter::new(&root, NullRenderer));
        let result = v.visualize("demo").unwrap();
        assert_eq!(result.report.artifacts.records, 1);
        assert!(result.report.artifacts.paths.text_path.exists());
        assert!(result.report.artifacts.paths.image_path.exists());
        let _ = std::fs::remove_dir_all(&root);
    }
}
