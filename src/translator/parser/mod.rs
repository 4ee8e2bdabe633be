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
use crate::translator::ast::{ArithmeticOp, Segment, VmCommand, VmLine};
use pest::Parser;
use pest_derive::Parser;

// Derive the parser from our grammar file.
#[derive(Parser)]
#[grammar = "translator/vm.pest"]
pub struct VmParser;

// Main parsing function that takes one .vm file's text.
pub fn parse_source(source: &str) -> Result<Vec<VmLine>, TranslationError> {
    let pairs = VmParser::parse(Rule::program, source)?;
    let mut lines = Vec::new();

    for command_pair in pairs.flatten().filter(|p| p.as_rule() == Rule::command) {
        let line_number = command_pair.as_span().start_pos().line_col().0;
        let raw = command_pair.as_str().trim().to_string();
        let tokens: Vec<&str> = command_pair.into_inner().map(|t| t.as_str()).collect();
        let command = build_command(&tokens, line_number, &raw)?;

        lines.push(VmLine {
            line_number,
            raw,
            command,
        });
    }

    Ok(lines)
}

// Classification is by first token; any token outside the reserved control
// words is an arithmetic command. Extra trailing tokens are ignored.
fn build_command(tokens: &[&str], line: usize, raw: &str) -> Result<VmCommand, TranslationError> {
    match tokens[0] {
        "push" => Ok(VmCommand::Push(
            build_segment(arg(tokens, 1, line, raw)?, line)?,
            build_index(arg(tokens, 2, line, raw)?, line)?,
        )),
        "pop" => Ok(VmCommand::Pop(
            build_segment(arg(tokens, 1, line, raw)?, line)?,
            build_index(arg(tokens, 2, line, raw)?, line)?,
        )),
        "label" => Ok(VmCommand::Label(arg(tokens, 1, line, raw)?.to_string())),
        "goto" => Ok(VmCommand::Goto(arg(tokens, 1, line, raw)?.to_string())),
        "if-goto" => Ok(VmCommand::IfGoto(arg(tokens, 1, line, raw)?.to_string())),
        "function" => Ok(VmCommand::Function(
            arg(tokens, 1, line, raw)?.to_string(),
            build_index(arg(tokens, 2, line, raw)?, line)?,
        )),
        "call" => Ok(VmCommand::Call(
            arg(tokens, 1, line, raw)?.to_string(),
            build_index(arg(tokens, 2, line, raw)?, line)?,
        )),
        "return" => Ok(VmCommand::Return),
        op => Ok(VmCommand::Arithmetic(build_arithmetic_op(op, line)?)),
    }
}

fn arg<'a>(
    tokens: &[&'a str],
    index: usize,
    line: usize,
    raw: &str,
) -> Result<&'a str, TranslationError> {
    tokens
        .get(index)
        .copied()
        .ok_or_else(|| TranslationError::MissingArgument {
            line,
            raw: raw.to_string(),
        })
}

// arg2 is a signed decimal integer.
fn build_index(token: &str, line: usize) -> Result<i32, TranslationError> {
    token.parse().map_err(|_| TranslationError::InvalidIndex {
        line,
        token: token.to_string(),
    })
}

fn build_segment(token: &str, line: usize) -> Result<Segment, TranslationError> {
    match token {
        "argument" => Ok(Segment::Argument),
        "local" => Ok(Segment::Local),
        "this" => Ok(Segment::This),
        "that" => Ok(Segment::That),
        "constant" => Ok(Segment::Constant),
        "static" => Ok(Segment::Static),
        "temp" => Ok(Segment::Temp),
        "pointer" => Ok(Segment::Pointer),
        _ => Err(TranslationError::UnknownSegment {
            line,
            segment: token.to_string(),
        }),
    }
}

fn build_arithmetic_op(token: &str, line: usize) -> Result<ArithmeticOp, TranslationError> {
    match token {
        "add" => Ok(ArithmeticOp::Add),
        "sub" => Ok(ArithmeticOp::Sub),
        "neg" => Ok(ArithmeticOp::Neg),
        "eq" => Ok(ArithmeticOp::Eq),
        "gt" => Ok(ArithmeticOp::Gt),
        "lt" => Ok(ArithmeticOp::Lt),
        "and" => Ok(ArithmeticOp::And),
        "or" => Ok(ArithmeticOp::Or),
        "not" => Ok(ArithmeticOp::Not),
        _ => Err(TranslationError::UnknownArithmeticOp {
            line,
            op: token.to_string(),
        }),
    }
}

// ------------- unit tests -------------
