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

use crate::errors::TranslationError;
use crate::translator::ast::Segment;
use crate::translator::code_writer::CodeWriter;

// temp i lives at RAM[5 + i] (R5..R12).
const TEMP_BASE: i32 = 5;

impl CodeWriter {
    pub(super) fn write_push(
        &mut self,
        segment: Segment,
        index: i32,
        line: usize,
    ) -> Result<(), TranslationError> {
        // load the pushed value into D, then run the generic push tail
        match segment {
            Segment::Constant => {
                self.emit(&format!("@{index}"));
                self.emit("D=A");
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = segment.base_symbol().unwrap();
                self.emit(&format!("@{base}"));
                self.emit("D=M");
                self.emit(&format!("@{index}"));
                self.emit("A=D+A");
                self.emit("D=M");
            }
            Segment::Temp => {
                self.emit(&format!("@{}", TEMP_BASE + index));
                self.emit("D=M");
            }
            Segment::Pointer => {
                let symbol = pointer_symbol(index, line)?;
                self.emit(&format!("@{symbol}"));
                self.emit("D=M");
            }
            Segment::Static => {
                let symbol = self.static_symbol(index);
                self.emit(&format!("@{symbol}"));
                self.emit("D=M");
            }
        }

        self.push_d();
        Ok(())
    }

    pub(super) fn write_pop(
        &mut self,
        segment: Segment,
        index: i32,
        line: usize,
    ) -> Result<(), TranslationError> {
        match segment {
            Segment::Constant => return Err(TranslationError::PopConstant { line }),
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                // The effective address is staged in R13 first: the stack
                // pop and the address computation contend for D.
                let base = segment.base_symbol().unwrap();
                self.emit(&format!("@{base}"));
                self.emit("D=M");
                self.emit(&format!("@{index}"));
                self.emit("D=D+A");
                self.emit_all(&["@R13", "M=D"]);
                self.pop_d();
                self.emit_all(&["@R13", "A=M", "M=D"]);
            }
            Segment::Temp => {
                self.pop_d();
                self.emit(&format!("@{}", TEMP_BASE + index));
                self.emit("M=D");
            }
            Segment::Pointer => {
                let symbol = pointer_symbol(index, line)?;
                self.pop_d();
                self.emit(&format!("@{symbol}"));
                self.emit("M=D");
            }
            Segment::Static => {
                let symbol = self.static_symbol(index);
                self.pop_d();
                self.emit(&format!("@{symbol}"));
                self.emit("M=D");
            }
        }

        Ok(())
    }

    fn static_symbol(&self, index: i32) -> String {
        format!("{}.{index}", self.file_name)
    }
}

// pointer 0 is THIS, pointer 1 is THAT.
fn pointer_symbol(index: i32, line: usize) -> Result<&'static str, TranslationError> {
    match index {
        0 => Ok("THIS"),
        1 => Ok("THAT"),
        _ => Err(TranslationError::InvalidPointerIndex { line, index }),
    }
}
