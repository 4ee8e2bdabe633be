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
mod encoder;
pub mod parser;
mod symbol_table;

use crate::errors::AssemblyError;
use ast::{AsmItem, AsmLine};
use encoder::Encoder;
pub use symbol_table::SymbolTable;

/// Pass 1: bind each `(NAME)` pseudo-instruction to the ROM address of the
/// next real instruction. Only real instructions consume ROM addresses.
pub fn build_symbol_table(lines: &[AsmLine]) -> Result<SymbolTable, AssemblyError> {
    let mut symbol_table = SymbolTable::with_predefined();
    let mut rom_address: u16 = 0;

    for line in lines {
        match &line.item {
            AsmItem::Label(name) => {
                symbol_table.bind_label(name, rom_address, line.line_number)?;
            }
            _ => rom_address += 1,
        }
    }

    Ok(symbol_table)
}

/// Pass 2: translate each instruction to a 16-character binary word,
/// allocating RAM variables from 16 in first-occurrence order.
pub fn generate_code(
    lines: &[AsmLine],
    mut symbol_table: SymbolTable,
) -> Result<Vec<String>, AssemblyError> {
    let mut words = Vec::new();

    for line in lines {
        match &line.item {
            AsmItem::Label(_) => {}
            AsmItem::AInstruction(value) => {
                let encoder = Encoder {
                    symbol_table: &mut symbol_table,
                    line_num: &line.line_number,
                    raw: &line.raw,
                };
                words.push(encoder.encode_a_instruction(value)?);
            }
            AsmItem::CInstruction { dest, comp, jump } => {
                let encoder = Encoder {
                    symbol_table: &mut symbol_table,
                    line_num: &line.line_number,
                    raw: &line.raw,
                };
                words.push(encoder.encode_c_instruction(
                    dest.as_deref(),
                    comp,
                    jump.as_deref(),
                )?);
            }
        }
    }

    Ok(words)
}
