//! Pcmwav - PCM recording format and WAV header tool
//!
//! This is the main entry point for the pcmwav command-line tool.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Command;
use log::{info, warn};
use pcmwav::audio::{read_header, write_header, write_wav, WavRecorder};
use pcmwav::duration_seconds;
use std::fs::File;
use std::io::{self, BufWriter, Write};

fn main() -> Result<()> {
    // Parse command-line arguments and initialize logging
    let args = cli::Args::parse();
    cli::init_logging(&args);

    run(args.command)
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Header {
            length,
            output,
            format,
        } => {
            let format = format.to_format()?;
            match output {
                Some(path) => {
                    let mut file = File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    write_header(&mut file, length, &format)?;
                    info!("Wrote header for {} bytes to {}", length, path.display());
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    write_header(&mut stdout, length, &format)?;
                    stdout.flush()?;
                }
            }
        }

        Command::Duration {
            length,
            exact,
            format,
        } => {
            let format = format.to_format()?;
            if exact {
                println!("{:.3}", format.duration(length).as_secs_f64());
            } else {
                println!("{}", duration_seconds(&format, length));
            }
        }

        Command::Wrap {
            input,
            output,
            format,
        } => {
            let format = format.to_format()?;
            let data = std::fs::read(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            if data.len() % usize::from(format.block_align()) != 0 {
                warn!(
                    "{} is not a whole number of {}-byte frames",
                    input.display(),
                    format.block_align()
                );
            }

            let output = output.unwrap_or_else(|| input.with_extension("wav"));
            let file = File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            let mut writer = BufWriter::new(file);
            write_wav(&mut writer, &format, &data)?;
            writer.flush()?;

            info!(
                "Wrapped {} ({}) into {}",
                input.display(),
                format,
                output.display()
            );
        }

        Command::Inspect { path, json } => {
            let mut file =
                File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
            let header = read_header(&mut file)
                .with_context(|| format!("Failed to read header of {}", path.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&header)?);
            } else {
                let format = header.format()?;
                println!("format:      {}", format);
                println!("byte rate:   {}", header.byte_rate);
                println!("block align: {}", header.block_align);
                println!("data bytes:  {}", header.data_len);
                println!(
                    "duration:    {:.3}s",
                    format.duration(u64::from(header.data_len)).as_secs_f64()
                );
            }
        }

        Command::List { dir } => {
            let recorder = match dir {
                Some(dir) => WavRecorder::new().with_recordings_dir(dir),
                None => WavRecorder::new(),
            };
            for path in recorder.list_recordings()? {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
