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

// Address operand of an A-instruction: a decimal literal or a symbol to be
// resolved through the symbol table.
#[derive(Debug, Clone, PartialEq)]
pub enum AValue {
    Literal(u32),
    Symbol(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AsmItem {
    Label(String),
    AInstruction(AValue),
    CInstruction {
        dest: Option<String>,
        comp: String,
        jump: Option<String>,
    },
}

// Represents a single surviving source line: the parsed item plus the
// 1-based line number and trimmed text for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct AsmLine {
    pub line_number: usize,
    pub raw: String,
    pub item: AsmItem,
}
