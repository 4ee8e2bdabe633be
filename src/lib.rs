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

pub mod assembler;
pub mod errors;
pub mod file_reader;
pub mod logging;
pub mod translator;

use anyhow::{Context, Result};

extern crate pest;
extern crate pest_derive;

pub use translator::{Translation, translate};

/// Assembles Hack assembly source into machine code: one 16-character
/// binary word per instruction, in program order.
pub fn assemble(source: &str) -> Result<Vec<String>> {
    let lines = assembler::parser::parse_source(source).context("Failed during parsing stage")?;

    let symbol_table =
        assembler::build_symbol_table(&lines).context("Failed during assembler pass 1")?;

    let words =
        assembler::generate_code(&lines, symbol_table).context("Failed during assembler pass 2")?;

    Ok(words)
}
