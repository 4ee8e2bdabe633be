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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Argument,
    Local,
    This,
    That,
    Constant,
    Static,
    Temp,
    Pointer,
}

impl Segment {
    /// Base pointer symbol for the indirect segments; the other segments
    /// are lowered without one.
    pub fn base_symbol(self) -> Option<&'static str> {
        match self {
            Segment::Local => Some("LCL"),
            Segment::Argument => Some("ARG"),
            Segment::This => Some("THIS"),
            Segment::That => Some("THAT"),
            _ => None,
        }
    }
}

// A single VM command as a tagged variant; indices are signed because the
// source grammar admits signed decimals.
#[derive(Debug, Clone, PartialEq)]
pub enum VmCommand {
    Arithmetic(ArithmeticOp),
    Push(Segment, i32),
    Pop(Segment, i32),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function(String, i32),
    Call(String, i32),
    Return,
}

// A parsed command plus its 1-based source line number and trimmed text.
#[derive(Debug, Clone, PartialEq)]
pub struct VmLine {
    pub line_number: usize,
    pub raw: String,
    pub command: VmCommand,
}
