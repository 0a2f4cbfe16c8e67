//! Provenance replay runner
//!
//! Replays a JSON-lines script of report commands through a
//! `ProvenanceReporter` backed by a configurable sink, or prints the event
//! JSON schema.

mod command;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use command::ReportCommand;
use flowprov_core::{ComponentId, ExternalId, ReporterConfig, SinkConfig};
use flowprov_observability::{spans, tracing_setup};
use flowprov_reporter::{
    EventSink, InMemoryEventSink, JsonLinesSink, ProvenanceReporter, TracingEventSink, event_schema,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{Instrument, error, info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SinkChoice {
    Memory,
    Tracing,
    Jsonl,
}

#[derive(Debug, Parser)]
#[command(name = "flowprov-runner")]
#[command(about = "Replay provenance report scripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply each JSON line of a report script through a reporter.
    Replay(ReplayArgs),
    /// Print the JSON schema of a provenance event.
    Schema,
}

#[derive(Debug, clap::Args)]
struct ReplayArgs {
    /// Script path; reads stdin when omitted.
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// JSON reporter config file; replaces the FLOWPROV_* environment.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Event sink (defaults to FLOWPROV_SINK, then memory).
    #[arg(long, value_enum)]
    sink: Option<SinkChoice>,

    /// Journal path for the jsonl sink (defaults to FLOWPROV_JSONL_PATH).
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long)]
    component_id: Option<String>,

    #[arg(long)]
    component_type: Option<String>,

    /// Continue after a failed command instead of aborting.
    #[arg(long)]
    keep_going: bool,
}

impl ReplayArgs {
    /// Layer command line flags over the file or environment configuration.
    fn into_config(
        self,
        mut config: ReporterConfig,
    ) -> anyhow::Result<(ReporterConfig, ReplayPlan)> {
        if let Some(id) = self.component_id {
            config.component_id = ComponentId::from_external(ExternalId::new(id));
        }
        if let Some(component_type) = self.component_type {
            config.component_type = component_type;
        }

        let current_path = match &config.sink {
            SinkConfig::JsonLines { path } => Some(path.clone()),
            _ => None,
        };
        let output = self.output.or(current_path);
        config.sink = match self.sink {
            Some(SinkChoice::Memory) => SinkConfig::Memory,
            Some(SinkChoice::Tracing) => SinkConfig::Tracing,
            Some(SinkChoice::Jsonl) => {
                let path = output.ok_or_else(|| {
                    anyhow::anyhow!("--output is required for the jsonl sink")
                })?;
                SinkConfig::JsonLines { path }
            }
            None => match (config.sink, output) {
                (SinkConfig::JsonLines { .. }, Some(path)) => SinkConfig::JsonLines { path },
                (sink, _) => sink,
            },
        };
        config.validate().context("Invalid reporter configuration")?;

        Ok((config, ReplayPlan { script: self.script, keep_going: self.keep_going }))
    }
}

#[derive(Debug)]
struct ReplayPlan {
    script: Option<PathBuf>,
    keep_going: bool,
}

#[derive(Debug, Default)]
struct ReplaySummary {
    applied: BTreeMap<&'static str, usize>,
    failed: usize,
}

impl ReplaySummary {
    fn print(&self) {
        for (operation, count) in &self.applied {
            println!("{operation:<18} {count}");
        }
        println!("{:<18} {}", "failed", self.failed);
    }
}

async fn build_sink(sink: &SinkConfig) -> anyhow::Result<Arc<dyn EventSink>> {
    let sink: Arc<dyn EventSink> = match sink {
        SinkConfig::Memory => Arc::new(InMemoryEventSink::new()),
        SinkConfig::Tracing => Arc::new(TracingEventSink::new()),
        SinkConfig::JsonLines { path } => Arc::new(
            JsonLinesSink::open(path)
                .await
                .with_context(|| format!("Failed to open journal {}", path.display()))?,
        ),
    };
    Ok(sink)
}

async fn replay<R>(
    reporter: &ProvenanceReporter,
    input: R,
    keep_going: bool,
) -> anyhow::Result<ReplaySummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = ReplaySummary::default();
    let mut lines = input.lines();
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line().await.context("Failed to read script")? {
        line_number += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let outcome = match ReportCommand::parse(line) {
            Ok(command) => command
                .apply(reporter)
                .await
                .map(|()| command.capability().as_str())
                .map_err(anyhow::Error::from),
            Err(err) => Err(anyhow::Error::from(err).context("Malformed command")),
        };

        match outcome {
            Ok(operation) => *summary.applied.entry(operation).or_default() += 1,
            Err(err) if keep_going => {
                warn!(line = line_number, error = %format!("{err:#}"), "Skipping failed command");
                summary.failed += 1;
            }
            Err(err) => return Err(err.context(format!("Script line {line_number}"))),
        }
    }

    Ok(summary)
}

async fn run_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let base = match &args.config {
        Some(path) => ReporterConfig::from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => ReporterConfig::from_env().context("Failed to load configuration")?,
    };
    let (config, plan) = args.into_config(base)?;
    let sink = build_sink(&config.sink).await?;
    let reporter = ProvenanceReporter::from_config(&config, sink);

    info!(
        component_id = %config.component_id,
        component_type = config.component_type,
        sink = config.sink.name(),
        "Replaying provenance script"
    );

    let span = spans::replay_script(plan.script.as_deref());
    let summary = async {
        match &plan.script {
            Some(path) => {
                let file = open_script(path).await?;
                replay(&reporter, BufReader::new(file), plan.keep_going).await
            }
            None => replay(&reporter, BufReader::new(tokio::io::stdin()), plan.keep_going).await,
        }
    }
    .instrument(span)
    .await?;

    summary.print();
    Ok(())
}

async fn open_script(path: &Path) -> anyhow::Result<tokio::fs::File> {
    tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open script {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_setup::init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Replay(args) => {
            if let Err(err) = run_replay(args).await {
                error!(error = %format!("{err:#}"), "Replay failed");
                return Err(err);
            }
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&event_schema())?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(sink: Option<SinkChoice>, output: Option<&str>) -> ReplayArgs {
        ReplayArgs {
            script: None,
            config: None,
            sink,
            output: output.map(PathBuf::from),
            component_id: Some("replayer".to_string()),
            component_type: None,
            keep_going: false,
        }
    }

    fn memory_reporter() -> (Arc<InMemoryEventSink>, ProvenanceReporter) {
        let sink = Arc::new(InMemoryEventSink::new());
        let reporter = ProvenanceReporter::new(
            sink.clone(),
            ComponentId::from_external(ExternalId::new("replayer")),
            "Replay",
        );
        (sink, reporter)
    }

    #[test]
    fn flags_override_environment_config() {
        let (config, _) = args(Some(SinkChoice::Tracing), None)
            .into_config(ReporterConfig::default())
            .expect("config");
        assert_eq!(config.component_id.as_str(), "replayer");
        assert_eq!(config.sink, SinkConfig::Tracing);
    }

    #[test]
    fn jsonl_sink_requires_output() {
        let missing = args(Some(SinkChoice::Jsonl), None).into_config(ReporterConfig::default());
        assert!(missing.is_err());
        let (config, _) = args(Some(SinkChoice::Jsonl), Some("out/events.jsonl"))
            .into_config(ReporterConfig::default())
            .expect("config");
        assert_eq!(config.sink, SinkConfig::JsonLines { path: PathBuf::from("out/events.jsonl") });
    }

    #[tokio::test]
    async fn replay_counts_each_operation() {
        let (sink, reporter) = memory_reporter();
        let script = concat!(
            "# comment\n",
            "{\"op\":\"create\",\"record\":{\"id\":\"a\"}}\n",
            "\n",
            "{\"op\":\"create\",\"record\":{\"id\":\"b\"}}\n",
            "{\"op\":\"clone\",\"parent\":{\"id\":\"a\"},\"child\":{\"id\":\"c\"}}\n",
        );

        let summary = replay(&reporter, script.as_bytes(), false).await.expect("replay");
        assert_eq!(summary.applied.get("create"), Some(&2));
        assert_eq!(summary.applied.get("clone"), Some(&1));
        assert_eq!(summary.failed, 0);
        assert_eq!(sink.len().await, 3);
    }

    #[tokio::test]
    async fn replay_stops_at_first_failure_unless_keep_going() {
        let script = concat!(
            "{\"op\":\"create\",\"record\":{\"id\":\"\"}}\n",
            "not json\n",
            "{\"op\":\"create\",\"record\":{\"id\":\"b\"}}\n",
        );

        let (sink, reporter) = memory_reporter();
        let err = replay(&reporter, script.as_bytes(), false).await.unwrap_err();
        assert!(format!("{err:#}").contains("Script line 1"));
        assert!(sink.is_empty().await);

        let (sink, reporter) = memory_reporter();
        let summary = replay(&reporter, script.as_bytes(), true).await.expect("replay");
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.applied.get("create"), Some(&1));
        assert_eq!(sink.len().await, 1);
    }

    #[tokio::test]
    async fn replay_skips_lines_with_foreign_options() {
        let (sink, reporter) = memory_reporter();
        let script = concat!(
            "{\"op\":\"clone\",\"parent\":{\"id\":\"a\"},\"child\":{\"id\":\"b\"},",
            "\"details\":\"x\",\"durationMillis\":5}\n",
            "{\"op\":\"create\",\"record\":{\"id\":\"a\"},\"durationMillis\":5}\n",
        );

        let summary = replay(&reporter, script.as_bytes(), true).await.expect("replay");
        assert_eq!(summary.failed, 2);
        assert!(summary.applied.is_empty());
        assert!(sink.is_empty().await);
    }
}
