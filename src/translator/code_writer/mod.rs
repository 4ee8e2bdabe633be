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

mod arithmetic;
mod control_flow;
mod function;
mod memory;

use crate::errors::TranslationError;
use crate::translator::ast::{VmCommand, VmLine};

// Emits Hack assembly for VM commands. State spans every .vm unit of one
// run: the comparison and call counters are never reset, which keeps
// generated labels unique across files.
pub struct CodeWriter {
    lines: Vec<String>,
    file_name: String,
    current_function: String,
    cmp_counter: usize,
    call_counter: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        CodeWriter {
            lines: Vec::new(),
            file_name: String::new(),
            current_function: String::new(),
            cmp_counter: 0,
            call_counter: 0,
        }
    }

    /// Sets the unqualified stem of the unit being translated; it names the
    /// unit's static symbols as `<file>.<index>`.
    pub fn set_file_name(&mut self, name: &str) {
        self.file_name = name.to_string();
    }

    /// Emits the run preamble: SP=256 followed by `call Sys.init 0`.
    pub fn write_bootstrap(&mut self) {
        self.emit_comment("bootstrap: SP=256; call Sys.init");
        self.emit_all(&["@256", "D=A", "@SP", "M=D"]);
        self.emit_comment("call Sys.init 0");
        self.write_call("Sys.init", 0);
    }

    /// Translates one command, prefixed by a banner comment with the
    /// original command text.
    pub fn write_command(&mut self, line: &VmLine) -> Result<(), TranslationError> {
        self.emit_comment(&line.raw);

        match &line.command {
            VmCommand::Arithmetic(op) => self.write_arithmetic(*op),
            VmCommand::Push(segment, index) => {
                self.write_push(*segment, *index, line.line_number)?
            }
            VmCommand::Pop(segment, index) => self.write_pop(*segment, *index, line.line_number)?,
            VmCommand::Label(label) => self.write_label(label),
            VmCommand::Goto(label) => self.write_goto(label),
            VmCommand::IfGoto(label) => self.write_if_goto(label),
            VmCommand::Function(name, num_locals) => self.write_function(name, *num_locals),
            VmCommand::Call(name, num_args) => self.write_call(name, *num_args),
            VmCommand::Return => self.write_return(),
        }

        Ok(())
    }

    pub fn emit_comment(&mut self, text: &str) {
        self.lines.push(format!("// {text}"));
    }

    /// Consumes the writer, yielding the generated assembly with one
    /// instruction per line and a trailing newline.
    pub fn finish(self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    fn emit(&mut self, instruction: &str) {
        self.lines.push(instruction.to_string());
    }

    fn emit_all(&mut self, instructions: &[&str]) {
        for instruction in instructions {
            self.emit(instruction);
        }
    }

    // generic push tail: *SP = D; SP++
    fn push_d(&mut self) {
        self.emit_all(&["@SP", "A=M", "M=D", "@SP", "M=M+1"]);
    }

    // generic pop: D = *--SP
    fn pop_d(&mut self) {
        self.emit_all(&["@SP", "AM=M-1", "D=M"]);
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}
