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

use crate::assembler::ast::AValue;
use crate::assembler::symbol_table::SymbolTable;
use crate::errors::AssemblyError;

// Largest address expressible in the 15-bit A-instruction payload.
const MAX_ADDRESS: u32 = 32767;

// Per-instruction encoding context for pass 2.
pub struct Encoder<'a> {
    pub symbol_table: &'a mut SymbolTable,
    pub line_num: &'a usize,
    pub raw: &'a str,
}

impl<'a> Encoder<'a> {
    /// Encodes an A-instruction as '0' followed by the 15-bit address.
    /// An unbound symbol becomes the next RAM variable.
    pub fn encode_a_instruction(self, value: &AValue) -> Result<String, AssemblyError> {
        let addr = match value {
            AValue::Literal(literal) => {
                if *literal > MAX_ADDRESS {
                    return Err(AssemblyError::ConstantOutOfRange {
                        line: *self.line_num,
                        raw: self.raw.to_string(),
                    });
                }
                *literal as u16
            }
            AValue::Symbol(name) => self.symbol_table.resolve_or_allocate(name),
        };

        Ok(format!("0{addr:015b}"))
    }

    /// Encodes a C-instruction as 111 + comp7 + dest3 + jump3, validating
    /// each field against the fixed tables.
    pub fn encode_c_instruction(
        self,
        dest: Option<&str>,
        comp: &str,
        jump: Option<&str>,
    ) -> Result<String, AssemblyError> {
        let comp_bits = comp_bits(comp).ok_or_else(|| AssemblyError::InvalidCompField {
            line: *self.line_num,
            field: comp.to_string(),
            raw: self.raw.to_string(),
        })?;

        let dest_bits = match dest {
            None => "000",
            Some(field) => dest_bits(field).ok_or_else(|| AssemblyError::InvalidDestField {
                line: *self.line_num,
                field: field.to_string(),
                raw: self.raw.to_string(),
            })?,
        };

        let jump_bits = match jump {
            None => "000",
            Some(field) => jump_bits(field).ok_or_else(|| AssemblyError::InvalidJumpField {
                line: *self.line_num,
                field: field.to_string(),
                raw: self.raw.to_string(),
            })?,
        };

        Ok(format!("111{comp_bits}{dest_bits}{jump_bits}"))
    }
}

// comp table, 7 bits a||cccccc; the a=1 rows are the a=0 rows with A
// replaced by M.
fn comp_bits(comp: &str) -> Option<&'static str> {
    match comp {
        "0" => Some("0101010"),
        "1" => Some("0111111"),
        "-1" => Some("0111010"),
        "D" => Some("0001100"),
        "A" => Some("0110000"),
        "!D" => Some("0001101"),
        "!A" => Some("0110001"),
        "-D" => Some("0001111"),
        "-A" => Some("0110011"),
        "D+1" => Some("0011111"),
        "A+1" => Some("0110111"),
        "D-1" => Some("0001110"),
        "A-1" => Some("0110010"),
        "D+A" => Some("0000010"),
        "D-A" => Some("0010011"),
        "A-D" => Some("0000111"),
        "D&A" => Some("0000000"),
        "D|A" => Some("0010101"),
        "M" => Some("1110000"),
        "!M" => Some("1110001"),
        "-M" => Some("1110011"),
        "M+1" => Some("1110111"),
        "M-1" => Some("1110010"),
        "D+M" => Some("1000010"),
        "D-M" => Some("1010011"),
        "M-D" => Some("1000111"),
        "D&M" => Some("1000000"),
        "D|M" => Some("1010101"),
        _ => None,
    }
}

fn dest_bits(dest: &str) -> Option<&'static str> {
    match dest {
        "M" => Some("001"),
        "D" => Some("010"),
        "MD" => Some("011"),
        "A" => Some("100"),
        "AM" => Some("101"),
        "AD" => Some("110"),
        "AMD" => Some("111"),
        _ => None,
    }
}

fn jump_bits(jump: &str) -> Option<&'static str> {
    match jump {
        "JGT" => Some("001"),
        "JEQ" => Some("010"),
        "JGE" => Some("011"),
        "JLT" => Some("100"),
        "JNE" => Some("101"),
        "JLE" => Some("110"),
        "JMP" => Some("111"),
        _ => None,
    }
}
