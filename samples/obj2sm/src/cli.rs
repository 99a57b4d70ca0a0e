use std::path::PathBuf;

use clap::ValueHint;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        global = true,
        default_value = "warn,smconv=info,obj2sm=info",
        env = "OBJ2SM_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, global = true, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
    /// Trace every attribute record as it is deduplicated; replaces --log-filter
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Convert an OBJ file into an SM file
    Convert {
        /// OBJ file to read
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// SM file to write; replaced only if conversion succeeds
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: PathBuf,
    },
    /// Print the contents of an SM file
    Dump {
        /// SM file to read
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
}

impl Cli {
    /// The filter to install, taking `--verbose` into account.
    pub fn effective_log_filter(&self) -> String {
        if self.verbose {
            "warn,smconv=trace,obj2sm=trace".to_owned()
        } else {
            self.log_filter.clone()
        }
    }
}

/// Set up pretty log output
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::OffsetTime::new(
            time::UtcOffset::current_local_offset().unwrap_or_else(|e| {
                tracing::warn!("couldn't get local time offset: {:?}", e);
                time::UtcOffset::UTC
            }),
            time::macros::format_description!("[hour]:[minute]:[second]"),
        ))
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}
