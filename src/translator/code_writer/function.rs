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

use crate::translator::code_writer::CodeWriter;

impl CodeWriter {
    /// `function f k`: global entry label, then k zero-initialized locals.
    /// Subsequent scoped labels live under f.
    pub(super) fn write_function(&mut self, name: &str, num_locals: i32) {
        self.current_function = name.to_string();
        self.emit(&format!("({name})"));

        for _ in 0..num_locals {
            self.emit_all(&["@0", "D=A"]);
            self.push_d();
        }
    }

    /// `call f n`: push the return address and the caller's segment bases,
    /// relocate ARG below the pushed arguments, set LCL, and jump.
    pub(super) fn write_call(&mut self, name: &str, num_args: i32) {
        let return_label = format!("{name}$ret.{}", self.call_counter);
        self.call_counter += 1;

        // push return-address
        self.emit(&format!("@{return_label}"));
        self.emit("D=A");
        self.push_d();

        // push LCL, ARG, THIS, THAT
        for segment in ["LCL", "ARG", "THIS", "THAT"] {
            self.emit(&format!("@{segment}"));
            self.emit("D=M");
            self.push_d();
        }

        // ARG = SP - 5 - n
        self.emit_all(&["@SP", "D=M", "@5", "D=D-A"]);
        self.emit(&format!("@{num_args}"));
        self.emit("D=D-A");
        self.emit_all(&["@ARG", "M=D"]);

        // LCL = SP
        self.emit_all(&["@SP", "D=M", "@LCL", "M=D"]);

        // goto f
        self.emit(&format!("@{name}"));
        self.emit("0;JMP");

        self.emit(&format!("({return_label})"));
    }

    /// `return`: splice the return value into the caller's stack, restore
    /// the caller's segment bases from the frame, and jump back.
    pub(super) fn write_return(&mut self) {
        // FRAME = LCL, kept in R13
        self.emit_all(&["@LCL", "D=M", "@R13", "M=D"]);

        // RET = *(FRAME-5), kept in R14. Captured before *ARG is written:
        // with zero arguments the return-address slot aliases *ARG.
        self.emit_all(&["@5", "A=D-A", "D=M", "@R14", "M=D"]);

        // *ARG = pop()
        self.pop_d();
        self.emit_all(&["@ARG", "A=M", "M=D"]);

        // SP = ARG + 1
        self.emit_all(&["@ARG", "D=M+1", "@SP", "M=D"]);

        self.restore_from_frame("THAT", 1);
        self.restore_from_frame("THIS", 2);
        self.restore_from_frame("ARG", 3);
        self.restore_from_frame("LCL", 4);

        // goto RET
        self.emit_all(&["@R14", "A=M", "0;JMP"]);
    }

    // segment = *(FRAME - offset), with FRAME in R13
    fn restore_from_frame(&mut self, segment: &str, offset: u16) {
        self.emit_all(&["@R13", "D=M"]);
        self.emit(&format!("@{offset}"));
        self.emit_all(&["A=D-A", "D=M"]);
        self.emit(&format!("@{segment}"));
        self.emit("M=D");
    }
}
