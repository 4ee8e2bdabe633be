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

use crate::translator::ast::ArithmeticOp;
use crate::translator::code_writer::CodeWriter;

impl CodeWriter {
    pub(super) fn write_arithmetic(&mut self, op: ArithmeticOp) {
        match op {
            ArithmeticOp::Add | ArithmeticOp::Sub | ArithmeticOp::And | ArithmeticOp::Or => {
                self.write_binary(op)
            }
            ArithmeticOp::Neg | ArithmeticOp::Not => self.write_unary(op),
            ArithmeticOp::Eq | ArithmeticOp::Gt | ArithmeticOp::Lt => self.write_compare(op),
        }
    }

    // Binary ops pop y into D, point A at x, and combine in place, leaving
    // `x op y` at the new top of stack. sub goes through -y so every
    // combination uses the D+M form.
    fn write_binary(&mut self, op: ArithmeticOp) {
        self.emit_all(&["@SP", "AM=M-1", "D=M", "A=A-1"]);

        match op {
            ArithmeticOp::Add => self.emit_all(&["D=D+M", "M=D"]),
            ArithmeticOp::Sub => self.emit_all(&["D=-D", "D=D+M", "M=D"]),
            ArithmeticOp::And => self.emit_all(&["D=D&M", "M=D"]),
            ArithmeticOp::Or => self.emit_all(&["D=D|M", "M=D"]),
            _ => unreachable!(),
        }
    }

    // Unary ops rewrite the top of stack in place.
    fn write_unary(&mut self, op: ArithmeticOp) {
        self.emit_all(&["@SP", "A=M-1"]);

        match op {
            ArithmeticOp::Neg => self.emit("M=-M"),
            ArithmeticOp::Not => self.emit("M=!M"),
            _ => unreachable!(),
        }
    }

    // Comparisons branch on x - y and write -1 (true) or 0 (false) at the
    // new top of stack. The difference wraps per 16-bit two's complement,
    // matching the machine's subtraction; there is no saturation.
    fn write_compare(&mut self, op: ArithmeticOp) {
        let (tag, jump) = match op {
            ArithmeticOp::Eq => ("EQ", "JEQ"),
            ArithmeticOp::Gt => ("GT", "JGT"),
            ArithmeticOp::Lt => ("LT", "JLT"),
            _ => unreachable!(),
        };

        let true_label = format!("{tag}_TRUE_{}", self.cmp_counter);
        let end_label = format!("{tag}_END_{}", self.cmp_counter);
        self.cmp_counter += 1;

        self.emit_all(&["@SP", "AM=M-1", "D=M", "A=A-1", "D=-D", "D=D+M"]);
        self.emit(&format!("@{true_label}"));
        self.emit(&format!("D;{jump}"));
        self.emit_all(&["@SP", "A=M-1", "M=0"]);
        self.emit(&format!("@{end_label}"));
        self.emit("0;JMP");
        self.emit(&format!("({true_label})"));
        self.emit_all(&["@SP", "A=M-1", "M=-1"]);
        self.emit(&format!("({end_label})"));
    }
}
