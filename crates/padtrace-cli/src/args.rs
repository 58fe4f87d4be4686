use clap::{Parser, Subcommand, ValueEnum};
use padtrace_engine::WfFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "padtrace")]
#[command(
    about = "Extract and re-encode circuit padding traces for website-fingerprinting research",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transform a folder of instrumented tor logs into trace files
    Extract {
        /// Folder of tor log files to transform
        #[arg(short = 'i', long, value_name = "DIR")]
        input: PathBuf,

        /// Folder to store trace files in
        #[arg(short = 'o', long, value_name = "DIR")]
        output: PathBuf,

        /// Drop trace events with source=client (simulator output)
        #[arg(long)]
        exclude_client: bool,

        /// Drop trace events with source=relay (simulator output)
        #[arg(long)]
        exclude_relay: bool,

        /// Keep circuits that only ever connect to IPv4/IPv6 addresses
        #[arg(long = "ip")]
        allow_ips: bool,

        /// Also drop the side-effect cells of client-side negotiation
        #[arg(long)]
        filter_client_negotiate: bool,

        /// Also drop the side-effect cells of relay-side negotiation
        #[arg(long)]
        filter_relay_negotiate: bool,

        /// Additional blacklisted stream destinations (on top of the
        /// built-in tor-internal addresses)
        #[arg(long = "blacklist", value_name = "ADDR")]
        blacklist: Vec<String>,
    },

    /// Transform a folder of trace files into a WF classifier format
    Wf {
        /// Folder of trace files to transform
        #[arg(short = 'i', long, value_name = "DIR")]
        input: PathBuf,

        /// Folder to store WF files in
        #[arg(short = 'o', long, value_name = "DIR")]
        output: PathBuf,

        /// Output format
        #[arg(short = 't', long, value_enum)]
        format: WfFormatArg,

        /// Override the output file extension (defaults to the format name)
        #[arg(long, value_name = "EXT")]
        extension: Option<String>,
    },

    /// Compute bandwidth-overhead statistics over a folder of trace files
    Overhead {
        /// Folder of trace files to measure
        #[arg(short = 'i', long, value_name = "DIR")]
        input: PathBuf,

        /// Write the report as JSON instead of printing text
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// CLI-facing mirror of [`WfFormat`] so clap can enumerate values.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WfFormatArg {
    Cells,
    Timecells,
    Dirtime,
}

impl From<WfFormatArg> for WfFormat {
    fn from(arg: WfFormatArg) -> WfFormat {
        match arg {
            WfFormatArg::Cells => WfFormat::Cells,
            WfFormatArg::Timecells => WfFormat::Timecells,
            WfFormatArg::Dirtime => WfFormat::Dirtime,
        }
    }
}
