use std::path::Path;

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use dot_structures::Graph;
use graphviz_rust::cmd::{CommandArg, Format, Layout};
use graphviz_rust::printer::{DotPrinter, PrinterContext};

/// Lays out a graph and writes the resulting image to `output`.
pub trait GraphRenderer {
    fn render(&self, graph: &Graph, output: &Path) -> Result<()>;
}

impl<R: GraphRenderer + ?Sized> GraphRenderer for Box<R> {
    fn render(&self, graph: &Graph, output: &Path) -> Result<()> {
        (**self).render(graph, output)
    }
}

/// Runs a Graphviz layout engine and rasterizes to PNG.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    engine: String,
}

impl GraphvizRenderer {
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
        }
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new("dot")
    }
}

impl GraphRenderer for GraphvizRenderer {
    fn render(&self, graph: &Graph, output: &Path) -> Result<()> {
        let _span = tracing::debug_span!("report.render", engine = %self.engine).entered();
        let args = vec![
            CommandArg::Layout(parse_layout(&self.engine)),
            CommandArg::Format(Format::Png),
            CommandArg::Output(output.to_string_lossy().to_string()),
        ];
        graphviz_rust::exec(graph.clone(), &mut PrinterContext::default(), args)
            .wrap_err_with(|| {
                format!(
                    "graphviz `{}` failed to render {} (is graphviz installed?)",
                    self.engine,
                    output.display()
                )
            })?;
        Ok(())
    }
}

pub fn parse_layout(engine: &str) -> Layout {
    match engine.to_lowercase().as_str() {
        "neato" => Layout::Neato,
        "twopi" => Layout::Twopi,
        "circo" => Layout::Circo,
        "fdp" => Layout::Fdp,
        "sfdp" => Layout::Sfdp,
        _ => Layout::Dot,
    }
}

/// Graphviz source text of `graph`.
pub fn dot_source(graph: &Graph) -> String {
    graph.print(&mut PrinterContext::default())
}
