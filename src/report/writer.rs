use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use serde::Serialize;

use crate::hierarchy::Hierarchy;
use crate::system::process::ProcessRecord;
use crate::system::table::ProcessTable;

use super::graph::{GraphStyle, ProcessGraph};
use super::render::GraphRenderer;
use super::text::render_details;

/// Where the artifacts for one process name live.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub text_path: PathBuf,
    pub image_path: PathBuf,
}

impl ArtifactPaths {
    /// `<root>/<name>_info/{<name>_details.txt, <name>_process_flow.png}`
    pub fn for_name(output_root: &Path, name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(eyre!("process name must not be empty"));
        }
        let stem = sanitize_component(name);
        let dir = output_root.join(format!("{stem}_info"));
        Ok(Self {
            text_path: dir.join(format!("{stem}_details.txt")),
            image_path: dir.join(format!("{stem}_process_flow.png")),
            dir,
        })
    }
}

/// Replaces characters that would escape the output directory.
pub fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            _ => c,
        })
        .collect();
    match cleaned.as_str() {
        "." | ".." => cleaned.replace('.', "_"),
        _ => cleaned,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportArtifacts {
    #[serde(flatten)]
    pub paths: ArtifactPaths,
    pub records: usize,
    pub nodes: usize,
    pub edges: usize,
    /// Roots that exited before their details could be read.
    pub skipped: Vec<u32>,
}

#[derive(Clone, Debug)]
pub struct Report {
    pub artifacts: ReportArtifacts,
    /// Root records in hierarchy order.
    pub records: Vec<ProcessRecord>,
    pub graph: ProcessGraph,
}

pub struct ReportWriter<R> {
    output_root: PathBuf,
    style: GraphStyle,
    renderer: R,
}

impl<R: GraphRenderer> ReportWriter<R> {
    pub fn new(output_root: impl Into<PathBuf>, renderer: R) -> Self {
        Self {
            output_root: output_root.into(),
            style: GraphStyle::default(),
            renderer,
        }
    }

    pub fn with_style(mut self, style: GraphStyle) -> Self {
        self.style = style;
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Writes the details file and renders the graph image for `hierarchy`.
    ///
    /// A root that exited since the hierarchy was built is left out of both
    /// artifacts, along with its descendants.
    pub fn write_report<T: ProcessTable + ?Sized>(
        &self,
        table: &mut T,
        hierarchy: &Hierarchy,
    ) -> Result<Report> {
        let _span = tracing::debug_span!("report.write", name = %hierarchy.name).entered();
        let paths = ArtifactPaths::for_name(&self.output_root, &hierarchy.name)?;

        fs::create_dir_all(&paths.dir)
            .wrap_err_with(|| format!("failed to create {}", paths.dir.display()))?;

        let mut records = Vec::with_capacity(hierarchy.root_count());
        let mut skipped = Vec::new();
        let mut graph = ProcessGraph::new();

        for (root, descendants) in hierarchy.iter() {
            let Some(record) = table.lookup(root) else {
                tracing::warn!(pid = root, "root process exited before its details were read");
                skipped.push(root);
                continue;
            };
            graph.add_root(&record);
            for &pid in descendants {
                graph.add_descendant(root, pid);
            }
            records.push(record);
        }

        fs::write(&paths.text_path, render_details(&records))
            .wrap_err_with(|| format!("failed to write {}", paths.text_path.display()))?;

        self.renderer
            .render(&graph.to_dot(&self.style), &paths.image_path)?;

        tracing::info!(
            name = %hierarchy.name,
            records = records.len(),
            nodes = graph.node_count(),
            image = %paths.image_path.display(),
            "report written"
        );

        Ok(Report {
            artifacts: ReportArtifacts {
                paths,
                records: records.len(),
                nodes: graph.node_count(),
                edges: graph.edges().len(),
                skipped,
            },
            records,
            graph,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_name_layout() {
        let paths = ArtifactPaths::for_name(Path::new("/out"), "nginx").unwrap();
        assert_eq!(paths.dir, Path::new("/out/nginx_info"));
        assert_eq!(paths.text_path, Path::new("/out/nginx_info/nginx_details.txt"));
        assert_eq!(
            paths.image_path,
            Path::new("/out/nginx_info/nginx_process_flow.png")
        );
    }

    #[test]
    fn separators_cannot_escape_output_dir() {
        assert_eq!(sanitize_component("kworker/0:1"), "kworker_0:1");
        assert_eq!(sanitize_component(".."), "__");
        let paths = ArtifactPaths::for_name(Path::new("out"), "../evil").unwrap();
        assert_eq!(paths.dir, Path::new("out/.._evil_info"));
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(ArtifactPaths::for_name(Path::new("."), "").is_err());
    }
}
