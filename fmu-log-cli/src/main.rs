//! FMU Log CLI Application
//!
//! Command-line front end for the fmu-log-core library. It loads a model
//! description file and:
//! - Forwards log messages through the reference expander
//! - Prints model statistics, variable counts and display unit conversions

use anyhow::{Context, Result};
use clap::Parser;
use fmu_log_core::{
    convert_to_display_unit, ExpanderConfig, LogForwarder, LogLevel, ModelCounts,
    ModelDescription, Status, StdoutSink, Unit,
};
use std::fmt;
use std::path::PathBuf;

mod config;

/// FMU Log - Expand variable references in simulation log messages
#[derive(Parser, Debug)]
#[command(name = "fmu-log-cli")]
#[command(about = "Expand #<type><vr># references in FMU log messages", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the model file (TOML, or JSON with a .json extension)
    #[arg(short, long, value_name = "FILE")]
    model: PathBuf,

    /// Message to forward (can be repeated)
    #[arg(long, value_name = "TEXT")]
    message: Vec<String>,

    /// Status reported with the messages
    #[arg(long, value_enum, default_value = "ok")]
    status: StatusArg,

    /// Log category prefixed to the messages
    #[arg(long, value_name = "NAME")]
    category: Option<String>,

    /// Instance name the messages are attributed to
    #[arg(long, value_name = "NAME", default_value = "instance")]
    instance: String,

    /// Minimum level forwarded (overrides the model file)
    #[arg(long, value_enum)]
    min_level: Option<LevelArg>,

    /// Print variable counts
    #[arg(long)]
    counts: bool,

    /// Print unit definitions with their display unit conversions
    #[arg(long)]
    units: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
enum StatusArg {
    Ok,
    Warning,
    Discard,
    Error,
    Fatal,
    Pending,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Ok => Status::Ok,
            StatusArg::Warning => Status::Warning,
            StatusArg::Discard => Status::Discard,
            StatusArg::Error => Status::Error,
            StatusArg::Fatal => Status::Fatal,
            StatusArg::Pending => Status::Pending,
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
enum LevelArg {
    Debug,
    Verbose,
    Info,
    Warning,
    Error,
    Fatal,
}

impl From<LevelArg> for LogLevel {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Debug => LogLevel::Debug,
            LevelArg::Verbose => LogLevel::Verbose,
            LevelArg::Info => LogLevel::Info,
            LevelArg::Warning => LogLevel::Warning,
            LevelArg::Error => LogLevel::Error,
            LevelArg::Fatal => LogLevel::Fatal,
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("FMU Log CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using fmu-log-core library v{}", fmu_log_core::VERSION);

    let model_file = config::load_model_file(&args.model)?;
    let model = model_file
        .build_model()
        .with_context(|| format!("Failed to build model from {:?}", args.model))?;

    let mut expander_config = model_file.logging.clone();
    if let Some(level) = args.min_level {
        expander_config = expander_config.with_min_level(level.into());
    }

    print_model_summary(&model);

    if args.counts {
        print_counts(&model.counts());
    }

    if args.units {
        print_units(model.units());
    }

    if !args.message.is_empty() {
        forward_messages(&args, &model, expander_config);
    }

    Ok(())
}

/// Forward every `--message` through a single forwarding context
fn forward_messages(args: &Args, model: &ModelDescription, config: ExpanderConfig) {
    let mut forwarder = LogForwarder::new(StdoutSink, config).with_resolver(model);
    let status = Status::from(args.status);

    for message in &args.message {
        let delivered = forwarder.forward(&args.instance, status, args.category.as_deref(), message);
        if !delivered {
            log::debug!("Message below minimum level: {:?}", message);
        }
    }
}

fn print_model_summary(model: &ModelDescription) {
    let stats = model.stats();
    println!("Model:");
    println!("  Variables:     {}", stats.num_variables);
    println!("  Aliases:       {}", stats.num_aliases);
    println!("  Units:         {}", stats.num_units);
    println!("  Display units: {}", stats.num_display_units);
}

fn print_counts(counts: &ModelCounts) {
    println!("\nVariability:");
    println!("  constant:   {}", counts.num_constants);
    println!("  fixed:      {}", counts.num_fixed);
    println!("  tunable:    {}", counts.num_tunable);
    println!("  discrete:   {}", counts.num_discrete);
    println!("  continuous: {}", counts.num_continuous);

    println!("\nCausality:");
    println!("  parameter:  {}", counts.num_parameters);
    println!("  input:      {}", counts.num_inputs);
    println!("  output:     {}", counts.num_outputs);
    println!("  local:      {}", counts.num_local);

    println!("\nBase type:");
    println!("  real:        {}", counts.num_real_vars);
    println!("  integer:     {}", counts.num_integer_vars);
    println!("  boolean:     {}", counts.num_bool_vars);
    println!("  string:      {}", counts.num_string_vars);
    println!("  enumeration: {}", counts.num_enum_vars);
}

fn print_units(units: &[Unit]) {
    println!("\nUnits:");
    for unit in units {
        println!("  {}", unit.name());
        for index in 0..unit.display_unit_count() {
            if let Some(du) = unit.display_unit(index) {
                println!("    {}", display_unit_line(unit, index));
                log::trace!("Display unit {} factor={} offset={}", du.name(), du.factor(), du.offset());
            }
        }
    }
}

/// One line per display unit, showing what 1 base unit reads as
fn display_unit_line(unit: &Unit, index: usize) -> String {
    match unit.display_unit(index) {
        Some(du) => format!(
            "{}: 1 {} = {} {}",
            du.name(),
            unit.name(),
            convert_to_display_unit(1.0, du, false),
            du.name()
        ),
        None => String::new(),
    }
}

/// Render one log record; the target names the emitting module (e.g. LOGGER)
fn log_line(level: log::Level, target: &str, args: impl fmt::Display) -> String {
    format!("[{}][{}] {}", level, target, args)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(buf, "{}", log_line(record.level(), record.target(), record.args()))
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "fmu-log-cli",
            "--model",
            "model.toml",
            "--message",
            "#r42# high",
            "--message",
            "second",
            "--status",
            "warning",
            "--min-level",
            "error",
            "--counts",
            "--units",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.model, PathBuf::from("model.toml"));
        assert_eq!(args.message.len(), 2);
        assert_eq!(Status::from(args.status), Status::Warning);
        assert_eq!(args.min_level.map(LogLevel::from), Some(LogLevel::Error));
        assert!(args.counts);
        assert!(args.units);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.instance, "instance");
    }

    #[test]
    fn test_model_is_required() {
        assert!(Args::try_parse_from(["fmu-log-cli"]).is_err());
    }

    #[test]
    fn test_display_unit_line() {
        use fmu_log_core::DisplayUnit;

        let unit = Unit::new("m").with_display_unit(DisplayUnit::new("mm", 1000.0, 0.0));
        assert_eq!(display_unit_line(&unit, 0), "mm: 1 m = 1000 mm");
        assert_eq!(display_unit_line(&unit, 1), "");
    }

    #[test]
    fn test_log_line_names_target() {
        assert_eq!(
            log_line(log::Level::Warn, "LOGGER", "Could not find variable"),
            "[WARN][LOGGER] Could not find variable"
        );
    }
}
