//! Command-line interface for Pcmwav
//!
//! Handles argument parsing and logging configuration.

use clap::{Args as ClapArgs, Parser, Subcommand};
use log::LevelFilter;
use pcmwav::{PcmFormat, Result};
use std::path::PathBuf;

/// Pcmwav - PCM recording format and WAV header tool
#[derive(Parser, Debug)]
#[command(name = "pcmwav")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Increase logging verbosity
    /// -v = info, -vv = debug, -vvv = trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the 44-byte header for a data block of the given length
    Header {
        /// Data length in bytes
        #[arg(short, long)]
        length: u64,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Print the playback duration of a data block of the given length
    Duration {
        /// Data length in bytes
        #[arg(short, long)]
        length: u64,

        /// Print fractional seconds instead of whole seconds
        #[arg(long)]
        exact: bool,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Prepend a WAV header to a raw PCM file
    Wrap {
        /// Raw PCM input file
        input: PathBuf,

        /// Output file (input with a .wav extension if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Decode and print the header of a WAV file
    Inspect {
        /// WAV file to inspect
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recordings, newest first
    List {
        /// Recordings directory (platform data directory if omitted)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

/// PCM format options shared by the subcommands that produce headers
#[derive(ClapArgs, Debug, Clone)]
pub struct FormatArgs {
    /// Sample rate in Hz
    #[arg(long, default_value_t = 44100)]
    pub sample_rate: u32,

    /// Bits per sample (multiple of 8)
    #[arg(long, default_value_t = 16)]
    pub bits: u16,

    /// Channel count
    #[arg(long, default_value_t = 1)]
    pub channels: u16,

    /// Samples are unsigned integers
    #[arg(long)]
    pub unsigned: bool,

    /// Samples are big-endian
    #[arg(long)]
    pub big_endian: bool,
}

impl FormatArgs {
    /// Build the validated format descriptor
    pub fn to_format(&self) -> Result<PcmFormat> {
        PcmFormat::new(
            self.sample_rate,
            self.bits,
            self.channels,
            !self.unsigned,
            self.big_endian,
        )
    }
}

impl Args {
    /// Get the log level filter based on verbosity flags
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else {
            match self.verbose {
                0 => LevelFilter::Warn,
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        }
    }
}

/// Initialize the logging system based on CLI arguments
pub fn init_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();

    // Base level for all modules - keep at warn to suppress noisy deps
    builder.filter_level(LevelFilter::Warn);

    // Set pcmwav modules to requested verbosity level
    builder.filter_module("pcmwav", args.log_level());

    builder.format_timestamp_millis().init();
}
