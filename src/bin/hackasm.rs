/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use anyhow::{Context, Result};
use clap::Parser as clap_parser;
use clap::error::ErrorKind;
use hacktools::errors::{CliError, exit_code_for};
use hacktools::logging;
use std::fs;
use std::path::PathBuf;

#[derive(clap_parser)]
#[clap(version = "0.1.0", about = "Translates Hack assembly (.asm) into machine code (.hack)")]
struct Opts {
    /// Input .asm file
    input: PathBuf,
    /// Output path (defaults to the input path with extension .hack)
    #[clap(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    let opts = parse_opts();

    if let Err(err) = run(&opts) {
        logging::error(&format!("{err:#}"));
        std::process::exit(exit_code_for(&err));
    }
}

fn parse_opts() -> Opts {
    match Opts::try_parse() {
        Ok(opts) => opts,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    }
}

fn run(opts: &Opts) -> Result<()> {
    if !opts.input.exists() {
        return Err(CliError::InputNotFound(opts.input.clone()).into());
    }

    let source = fs::read_to_string(&opts.input)
        .with_context(|| format!("Failed to read input file: {}", opts.input.display()))?;

    let words = hacktools::assemble(&source)?;

    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| opts.input.with_extension("hack"));

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }
    }

    let mut text = String::new();
    for word in &words {
        text.push_str(word);
        text.push('\n');
    }

    fs::write(&output, text)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    println!("OK: wrote {} ({} instructions)", output.display(), words.len());

    Ok(())
}
