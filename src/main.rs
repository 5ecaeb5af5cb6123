//! pcenter - replay progress events through a progress center.
//!
//! Usage:
//!   pcenter replay FILE          Apply a JSON event script and print each step
//!   pcenter replay FILE -a       Finish every animation right after each event
//!   pcenter templates            Print the active message templates
//!   pcenter --help               Show help

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use progress_center_core::{CenterConfig, MessageTemplates, ProgressItem};
use progress_center_group::{CenterSnapshot, ProgressCenter, ProgressEvent, UpdateOutcome};

#[derive(Parser)]
#[command(
    name = "pcenter",
    version,
    about = "Progress aggregation for long-running file operations",
    long_about = "pcenter feeds a script of progress events through a progress center \n\
                  and shows how items are grouped, summarized and retired."
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML file with summary message templates
    #[arg(short, long, global = true)]
    messages: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a JSON array of events and print a snapshot after each one
    Replay {
        /// Event script
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Report every animation as finished right after each event
        #[arg(short = 'a', long)]
        auto_animate: bool,
    },

    /// Print the active message templates as TOML
    Templates,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let templates = load_templates(cli.messages.as_deref())?;

    match cli.command {
        Command::Replay {
            file,
            format,
            auto_animate,
        } => {
            run_replay(&file, templates, format, auto_animate)?;
        }
        Command::Templates => {
            print!("{}", templates.to_toml_string()?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();
}

fn load_templates(path: Option<&Path>) -> Result<MessageTemplates> {
    match path {
        Some(path) => MessageTemplates::load(path)
            .with_context(|| format!("Failed to load templates from {}", path.display())),
        None => Ok(MessageTemplates::default()),
    }
}

/// Replay an event script and print the center after every event.
fn run_replay(
    path: &Path,
    templates: MessageTemplates,
    format: OutputFormat,
    auto_animate: bool,
) -> Result<()> {
    let events = ProgressEvent::load_script(path).context("Failed to read event script")?;
    let config = CenterConfig::builder()
        .templates(templates)
        .build()
        .context("Invalid configuration")?;
    let mut center = ProgressCenter::new(config);

    debug!(
        events = events.len(),
        normal = %center.config().normal_group,
        quiet = %center.config().quiet_group,
        "replaying {}",
        path.display()
    );

    let mut steps = Vec::with_capacity(events.len());
    for (index, event) in events.iter().enumerate() {
        let outcome = center
            .apply(event)
            .with_context(|| format!("Event #{} could not be applied", index + 1))?;
        if auto_animate {
            center.complete_all_animations();
        }
        let snapshot = center.snapshot();

        match format {
            OutputFormat::Text => print_step(index + 1, event, &outcome, &snapshot),
            OutputFormat::Json => steps.push(serde_json::json!({
                "step": index + 1,
                "event": event,
                "applied": outcome.is_applied(),
                "center": snapshot,
            })),
        }
    }

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&steps)?);
    }

    Ok(())
}

fn print_step(step: usize, event: &ProgressEvent, outcome: &UpdateOutcome, snapshot: &CenterSnapshot) {
    println!("{}", "─".repeat(60));
    print!(" #{step} {}", describe_event(event));
    match outcome {
        UpdateOutcome::Applied => println!(),
        UpdateOutcome::Rejected(reason) => println!("  (ignored: {reason:?})"),
    }
    println!("{}", "─".repeat(60));

    for group in &snapshot.groups {
        println!(
            " [{}] {} - {} item(s), {} error(s), totals {}/{}{}",
            group.name,
            group.state,
            group.items.len(),
            group.num_errors,
            group.totals.value,
            group.totals.max,
            if group.summarized_animated {
                ", summary animating"
            } else {
                ""
            }
        );
        for item in &group.items {
            let animating = item
                .id
                .as_ref()
                .is_some_and(|id| group.animated.contains(id));
            println!(
                "   {}{}",
                format_item(item),
                if animating { "  ~" } else { "" }
            );
        }
    }

    match &snapshot.summary {
        Some(summary) => println!(" => {}", format_item(summary)),
        None => println!(" => (nothing to show)"),
    }
    println!();
}

fn describe_event(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::Update { item } => format!(
            "update {} -> {}",
            item.id.as_ref().map_or("<no id>", |id| id.as_str()),
            item.state
        ),
        ProgressEvent::ItemAnimationEnd { group, id } => {
            format!("animation end {id} in {group}")
        }
        ProgressEvent::SummaryAnimationEnd { group } => format!("summary animation end in {group}"),
        ProgressEvent::DismissErrors => "dismiss errors".to_string(),
    }
}

fn format_item(item: &ProgressItem) -> String {
    let id = item.id.as_ref().map_or("*", |id| id.as_str());
    let kind = item
        .item_type
        .map_or_else(|| "-".to_string(), |kind| kind.to_string());
    format!(
        "{id:<8} {kind:<9} {:<12} {:>3}%  {}",
        item.state.to_string(),
        item.progress_rate_in_percent(),
        item.message
    )
}
