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

pub mod ast;
mod code_writer;
pub mod parser;

use crate::errors::CliError;
use crate::file_reader::FileReader;
use anyhow::{Context, Result};
use code_writer::CodeWriter;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Translation {
    pub asm: String,
    pub output_path: PathBuf,
}

/// Translates a `.vm` file or a directory of `.vm` files into Hack
/// assembly. Directory units are translated in ascending base-name order
/// behind the bootstrap preamble and the output is `<dir>/<dir>.asm`;
/// single-file input gets a sibling `.asm` and no bootstrap, keeping the
/// raw stack state of a test harness.
pub fn translate<F: FileReader>(input: &Path, reader: &F) -> Result<Translation> {
    let mut writer = CodeWriter::new();

    let (unit_paths, output_path) = if reader.is_dir(input) {
        let mut paths: Vec<PathBuf> = reader
            .list_dir(input)
            .with_context(|| format!("Failed to list directory: {}", input.display()))?
            .into_iter()
            .filter(|p| has_vm_extension(p))
            .collect();

        if paths.is_empty() {
            return Err(CliError::NoVmFiles(input.to_path_buf()).into());
        }

        paths.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));

        let mut file_name = input
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| input.as_os_str().to_os_string());
        file_name.push(".asm");

        writer.write_bootstrap();
        (paths, input.join(file_name))
    } else {
        if !has_vm_extension(input) {
            return Err(CliError::NotVmInput.into());
        }
        (vec![input.to_path_buf()], input.with_extension("asm"))
    };

    for path in &unit_paths {
        let text = reader
            .read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        let lines = parser::parse_source(&text)
            .with_context(|| format!("Failed during parsing stage: {}", path.display()))?;

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        writer.set_file_name(stem);
        writer.emit_comment(&format!("=== {stem}.vm ==="));

        for line in &lines {
            writer
                .write_command(line)
                .with_context(|| format!("Failed during code generation: {}", path.display()))?;
        }
    }

    Ok(Translation {
        asm: writer.finish(),
        output_path,
    })
}

fn has_vm_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("vm"))
}
