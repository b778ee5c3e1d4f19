use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use procflow::action::Action;
use procflow::app::{self, App};
use procflow::config::{Config, load_config, load_config_from_path};
use procflow::event::{Event, EventHandler};
use procflow::{logging, ui};

const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(
    name = "procflow",
    about = "Browse running processes and render a process hierarchy as a Graphviz image"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory under which per-name report folders are created
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long)]
    log_level: Option<String>,

    /// Print the distinct running process names and exit.
    #[arg(long, default_value_t = false)]
    list_names: bool,

    /// Visualize every process with this exact name and exit.
    #[arg(long, value_name = "NAME")]
    visualize: Option<String>,

    /// Print headless results as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    logging::init(&config.logging)?;

    if cli.list_names {
        return list_names(&config, cli.json);
    }
    if let Some(name) = cli.visualize.as_deref() {
        return visualize_headless(&config, name, cli.json);
    }

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(std::io::stdout(), DisableMouseCapture);
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config, cli.config.clone()).await;

    execute!(stdout(), DisableMouseCapture)?;
    ratatui::restore();

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    config: Config,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut app = App::new(config);
    if config_path.is_some() {
        app.config_path = config_path;
    }
    let mut events = EventHandler::new(TICK_RATE);

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    while app.running {
        if let Some(event) = events.next().await {
            let mut should_draw = true;
            match event {
                Event::Key(key) => {
                    let action = app.map_key(key);
                    app.dispatch(action);
                }
                Event::Click { column, row } => app.dispatch(Action::SelectAt(column, row)),
                Event::Scroll(delta) => app.scroll(delta),
                Event::Tick => {
                    let had_status = app.status.is_some();
                    app.on_tick();
                    should_draw = had_status && app.status.is_none();
                }
                Event::Resize => {}
            }
            if should_draw {
                terminal.draw(|frame| ui::draw(frame, &mut app))?;
            }
        }
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(ref dir) = cli.output_dir {
        config.general.output_dir = dir.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    config
}

fn list_names(config: &Config, json: bool) -> Result<()> {
    let mut visualizer = app::live_visualizer(config);
    let names = visualizer.list_process_names();
    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}

fn visualize_headless(config: &Config, name: &str, json: bool) -> Result<()> {
    let mut visualizer = app::live_visualizer(config);
    let vis = visualizer.visualize(name)?;
    let artifacts = &vis.report.artifacts;
    if json {
        let value = serde_json::json!({
            "hierarchy": vis.hierarchy,
            "artifacts": artifacts,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Details: {}", artifacts.paths.text_path.display());
    println!("Image:   {}", artifacts.paths.image_path.display());
    println!(
        "{} root(s), {} node(s), {} edge(s)",
        artifacts.records, artifacts.nodes, artifacts.edges
    );
    if !artifacts.skipped.is_empty() {
        let skipped: Vec<String> = artifacts.skipped.iter().map(u32::to_string).collect();
        println!("Exited before lookup: {}", skipped.join(", "));
    }
    Ok(())
}
