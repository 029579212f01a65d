//! Roll statistics report
//!
//! Reads a simulation result (`[inputs, trials]` JSON message) and prints the
//! derived series, either as a text report or as the JSON render payload.
//!
//! Usage:
//!   rollstats [OPTIONS] < result.json
//!
//! Options:
//!   --input FILE     Read the payload from FILE instead of stdin
//!   --select N       Highlight trial N
//!   --json           Print the render payload as JSON
//!   --report-json    Print the aggregated report as JSON
//!   --bin-width W    Histogram bin width (default: 1)
//!   --trials         Include a row per trial in the text report
//!   --quiet          Only the summary line
//!   --verbose        Debug logging on stderr

use std::io::Read;
use std::process::ExitCode;

use rollstats::build_info::version_line;
use rollstats::{Error, Orchestrator, ReportConfig, RollReport, SimulationPayload};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ── CLI Configuration ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    RenderJson,
    ReportJson,
}

struct CliConfig {
    input: Option<String>,
    select: Option<usize>,
    format: OutputFormat,
    report: ReportConfig,
    verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            input: None,
            select: None,
            format: OutputFormat::Text,
            report: ReportConfig::default(),
            verbose: false,
        }
    }
}

enum Command {
    Run(CliConfig),
    Help,
    Version,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut config = CliConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                config.input = Some(value_for("--input", args.get(i))?.to_string());
            }
            "--select" => {
                i += 1;
                let raw = value_for("--select", args.get(i))?;
                config.select = Some(
                    raw.parse()
                        .map_err(|_| format!("--select requires a trial index, got {raw}"))?,
                );
            }
            "--bin-width" => {
                i += 1;
                let raw = value_for("--bin-width", args.get(i))?;
                config.report.bin_width = raw
                    .parse()
                    .map_err(|_| format!("--bin-width requires a number, got {raw}"))?;
            }
            "--json" => config.format = OutputFormat::RenderJson,
            "--report-json" => config.format = OutputFormat::ReportJson,
            "--trials" => config.report.verbosity = 2,
            "--quiet" => config.report.verbosity = 0,
            "--verbose" => config.verbose = true,
            "--version" | "-V" => return Ok(Command::Version),
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("Unknown argument: {other}")),
        }
        i += 1;
    }
    Ok(Command::Run(config))
}

fn value_for<'a>(flag: &str, value: Option<&'a String>) -> Result<&'a str, String> {
    value
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn print_usage() {
    eprintln!(
        "Roll statistics report\n\
         \n\
         Usage: rollstats [OPTIONS] < result.json\n\
         \n\
         Options:\n\
         \x20 --input FILE     Read the payload from FILE instead of stdin\n\
         \x20 --select N       Highlight trial N\n\
         \x20 --json           Print the render payload as JSON\n\
         \x20 --report-json    Print the aggregated report as JSON\n\
         \x20 --bin-width W    Histogram bin width (default: 1)\n\
         \x20 --trials         Include a row per trial in the text report\n\
         \x20 --quiet          Only the summary line\n\
         \x20 --verbose        Debug logging on stderr\n\
         \x20 --version, -V    Show version\n\
         \x20 --help, -h       Show this help"
    );
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("rollstats=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// ── Main ─────────────────────────────────────────────────────────────

fn read_payload(input: Option<&str>) -> rollstats::Result<SimulationPayload> {
    let json = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    SimulationPayload::from_json(&json)
}

/// Derive the series once and format them as requested.
fn render_output(config: &CliConfig, payload: SimulationPayload) -> rollstats::Result<String> {
    let mut orchestrator = Orchestrator::new();
    let mut render = orchestrator.run_simulation(payload);
    if let Some(index) = config.select {
        if index >= render.trial_count() {
            tracing::warn!(
                index,
                trials = render.trial_count(),
                "selected trial is out of range"
            );
        }
        render = orchestrator.reselect(index)?;
    }

    if config.format == OutputFormat::RenderJson {
        return Ok(format!("{}\n", render.to_json()?));
    }

    let payload = orchestrator.current().ok_or(Error::NoActiveSimulation)?;
    let report = RollReport::from_render(payload, &render, &config.report);
    if config.format == OutputFormat::ReportJson {
        Ok(format!("{}\n", report.to_json()?))
    } else {
        Ok(report.to_text())
    }
}

fn run(config: &CliConfig) -> rollstats::Result<()> {
    let payload = read_payload(config.input.as_deref())?;
    tracing::info!(trials = payload.len(), "loaded simulation result");

    print!("{}", render_output(config, payload)?);
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let config = match parse_args(&args) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("{}", version_line());
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.verbose);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("rollstats: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("rollstats")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_defaults() {
        let Ok(Command::Run(config)) = parse_args(&args(&[])) else {
            panic!("expected run command");
        };
        assert!(config.input.is_none());
        assert!(config.select.is_none());
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.report, ReportConfig::default());
    }

    #[test]
    fn test_parse_options() {
        let parsed = parse_args(&args(&[
            "--input",
            "run.json",
            "--select",
            "3",
            "--json",
            "--bin-width",
            "2.5",
            "--quiet",
        ]));
        let Ok(Command::Run(config)) = parsed else {
            panic!("expected run command");
        };
        assert_eq!(config.input.as_deref(), Some("run.json"));
        assert_eq!(config.select, Some(3));
        assert_eq!(config.format, OutputFormat::RenderJson);
        assert_eq!(config.report.bin_width, 2.5);
        assert_eq!(config.report.verbosity, 0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["--select"])).is_err());
        assert!(parse_args(&args(&["--select", "-1"])).is_err());
        assert!(parse_args(&args(&["--frobnicate"])).is_err());
        assert!(matches!(parse_args(&args(&["-h"])), Ok(Command::Help)));
        assert!(matches!(parse_args(&args(&["--version"])), Ok(Command::Version)));
    }

    fn sample_payload() -> SimulationPayload {
        SimulationPayload::from_json(
            r#"[{"attackingTroops": 10, "defendingTroops": 5},
                [{"summarizedOffense": [8, 2], "summarizedDefense": [3, 1]},
                 {"summarizedOffense": [2, 4], "summarizedDefense": [5, 2]}]]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_output_formats_share_the_selection() {
        let mut config = CliConfig {
            select: Some(1),
            ..Default::default()
        };

        let text = render_output(&config, sample_payload()).unwrap();
        assert!(text.contains("Trial #1"));

        config.format = OutputFormat::ReportJson;
        let report: serde_json::Value =
            serde_json::from_str(&render_output(&config, sample_payload()).unwrap()).unwrap();
        assert_eq!(report["selected"]["index"], 1);
        assert_eq!(report["selected"]["bucket"], "loss");

        config.format = OutputFormat::RenderJson;
        let render: serde_json::Value =
            serde_json::from_str(&render_output(&config, sample_payload()).unwrap()).unwrap();
        assert_eq!(render["selectedBucket"], "loss");
        assert_eq!(render["selectedPositionInBucket"], 0);
    }

    #[test]
    fn test_output_survives_extreme_scores() {
        let payload = SimulationPayload::from_json(
            r#"[{"attackingTroops": 10, "defendingTroops": 5},
                [{"summarizedOffense": [4, 0], "summarizedDefense": [1e20, 1]}]]"#,
        )
        .unwrap();
        let config = CliConfig::default();

        let text = render_output(&config, payload).unwrap();
        assert!(text.contains("ROLL REPORT"));
    }
}
