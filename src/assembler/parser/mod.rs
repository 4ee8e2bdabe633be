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

use crate::assembler::ast::{AValue, AsmItem, AsmLine};
use crate::errors::AssemblyError;
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

// Derive the parser from our grammar file.
#[derive(Parser)]
#[grammar = "assembler/hack.pest"]
pub struct HackParser;

// Main parsing function that takes the entire source code string.
pub fn parse_source(source: &str) -> Result<Vec<AsmLine>, AssemblyError> {
    let pairs = HackParser::parse(Rule::program, source)?;
    let mut lines = Vec::new();

    for content_pair in pairs
        .flatten()
        .filter(|p| p.as_rule() == Rule::line_content)
    {
        let line_number = content_pair.as_span().start_pos().line_col().0;
        let raw = content_pair.as_str().trim().to_string();
        let item_pair = content_pair.into_inner().next().unwrap();

        let item = match item_pair.as_rule() {
            Rule::label_def => build_label(item_pair, line_number, &raw)?,
            Rule::a_instruction => build_a_instruction(item_pair, line_number, &raw)?,
            Rule::c_instruction => build_c_instruction(item_pair),
            _ => unreachable!(),
        };

        lines.push(AsmLine {
            line_number,
            raw,
            item,
        });
    }

    Ok(lines)
}

fn build_label(pair: Pair<Rule>, line: usize, raw: &str) -> Result<AsmItem, AssemblyError> {
    let name = pair.into_inner().next().unwrap().as_str().trim();

    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(AssemblyError::InvalidLabel {
            line,
            raw: raw.to_string(),
        });
    }

    Ok(AsmItem::Label(name.to_string()))
}

fn build_a_instruction(pair: Pair<Rule>, line: usize, raw: &str) -> Result<AsmItem, AssemblyError> {
    let token = pair.into_inner().next().unwrap().as_str();

    // An all-digit token is a decimal literal, anything else is a symbol.
    let value = if token.chars().all(|c| c.is_ascii_digit()) {
        let literal = token
            .parse::<u32>()
            .map_err(|_| AssemblyError::ConstantOutOfRange {
                line,
                raw: raw.to_string(),
            })?;
        AValue::Literal(literal)
    } else {
        AValue::Symbol(token.to_string())
    };

    Ok(AsmItem::AInstruction(value))
}

fn build_c_instruction(pair: Pair<Rule>) -> AsmItem {
    let mut dest = None;
    let mut comp = String::new();
    let mut jump = None;

    for field in pair.into_inner() {
        let text = field.as_str();
        match field.as_rule() {
            // An empty field after a separator is treated as absent.
            Rule::dest if !text.is_empty() => dest = Some(text.to_string()),
            Rule::comp => comp = text.to_string(),
            Rule::jump if !text.is_empty() => jump = Some(text.to_string()),
            _ => {}
        }
    }

    AsmItem::CInstruction { dest, comp, jump }
}

// ------------- unit tests -------------
