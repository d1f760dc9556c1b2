/*
 * Copyright (C) 2024 taylor.fish <contact@taylor.fish>
 *
 * This file is part of base91.
 *
 * base91 is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * base91 is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with base91. If not, see <https://www.gnu.org/licenses/>.
 */

use std::fs::File;
use std::io::{self, stdin, stdout, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use base91::wrap::LineWrapper;
use base91::{DecodeConfig, DecodeError, StreamDecoder, StreamEncoder};
use clap::Parser;
use log::{debug, info};

/// Encodes or decodes basE91 data from [FILE] and writes the result to
/// standard output. If [FILE] is missing or "-", the data is read from
/// standard input.
#[derive(Parser, Debug)]
#[command(name = "base91", version)]
struct Cli {
    /// Decode data instead of encoding
    #[arg(short, long)]
    decode: bool,

    /// When encoding, wrap lines after COLS characters (0 disables wrapping)
    #[arg(short, long, value_name = "COLS", default_value_t = 0)]
    wrap: usize,

    /// When decoding, reject whitespace instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", default_value = "warn")]
    log_level: String,

    /// Input file
    file: Option<PathBuf>,
}

fn init_logger(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn Read>> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path).with_context(|| {
                format!("could not open file '{}'", path.display())
            })?;
            info!("reading {}", path.display());
            Ok(Box::new(file))
        }
        _ => Ok(Box::new(stdin())),
    }
}

fn encode(input: impl Read, output: impl Write, width: usize) -> Result<()> {
    let mut input = BufReader::new(input);
    let mut encoder = StreamEncoder::new(LineWrapper::new(output, width));
    let n = io::copy(&mut input, &mut encoder)
        .context("could not encode input")?;
    debug!("encoded {} bytes", n);
    encoder
        .finish()
        .and_then(LineWrapper::finish)
        .context("could not write to standard output")?;
    Ok(())
}

fn decode(
    input: impl Read,
    mut output: impl Write,
    strict: bool,
) -> Result<()> {
    let config = if strict {
        DecodeConfig::new()
    } else {
        DecodeConfig::lenient()
    };
    let mut decoder = StreamDecoder::with_config(input, config);
    let n = io::copy(&mut decoder, &mut output).map_err(|e| {
        match e.get_ref().and_then(|e| e.downcast_ref::<DecodeError>()) {
            Some(e) => anyhow!("input is not valid base-91 data: {}", e),
            None => anyhow::Error::new(e).context("could not decode input"),
        }
    })?;
    debug!("decoded {} bytes", n);
    output.flush().context("could not write to standard output")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(&cli.log_level);

    let input = open_input(cli.file.as_ref())?;
    let output = BufWriter::new(stdout().lock());
    if cli.decode {
        decode(input, output, cli.strict)
    } else {
        encode(input, output, cli.wrap)
    }
}
