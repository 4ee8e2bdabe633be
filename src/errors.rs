use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AssemblyError {
    #[error("Syntax Error: {0}")]
    Syntax(#[from] pest::error::Error<crate::assembler::parser::Rule>),

    #[error("Invalid label on line {line}: {raw}")]
    InvalidLabel { line: usize, raw: String },

    #[error("Label redefined on line {line}: {name}")]
    LabelRedefined { line: usize, name: String },

    #[error("Constant out of range for 15-bit A-instruction on line {line}: {raw}")]
    ConstantOutOfRange { line: usize, raw: String },

    #[error("Invalid comp field '{field}' on line {line}: {raw}")]
    InvalidCompField {
        line: usize,
        field: String,
        raw: String,
    },

    #[error("Invalid dest field '{field}' on line {line}: {raw}")]
    InvalidDestField {
        line: usize,
        field: String,
        raw: String,
    },

    #[error("Invalid jump field '{field}' on line {line}: {raw}")]
    InvalidJumpField {
        line: usize,
        field: String,
        raw: String,
    },
}

#[derive(Error, Debug, PartialEq)]
pub enum TranslationError {
    #[error("Syntax Error: {0}")]
    Syntax(#[from] pest::error::Error<crate::translator::parser::Rule>),

    #[error("Unknown segment '{segment}' on line {line}")]
    UnknownSegment { line: usize, segment: String },

    #[error("Unknown arithmetic op '{op}' on line {line}")]
    UnknownArithmeticOp { line: usize, op: String },

    #[error("pointer index must be 0 or 1, got {index} on line {line}")]
    InvalidPointerIndex { line: usize, index: i32 },

    #[error("Cannot pop to the constant segment on line {line}")]
    PopConstant { line: usize },

    #[error("Missing argument on line {line}: {raw}")]
    MissingArgument { line: usize, raw: String },

    #[error("Invalid integer argument '{token}' on line {line}")]
    InvalidIndex { line: usize, token: String },
}

// CLI-level failures, all mapped to exit code 1.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Input must be a .vm file or a directory containing .vm files.")]
    NotVmInput,

    #[error("No .vm files found in directory: {}", .0.display())]
    NoVmFiles(PathBuf),
}

/// Maps a failure to the process exit code: 1 for usage/not-found, 2 for
/// assembly or translation errors, 3 for unexpected I/O failures.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.downcast_ref::<CliError>().is_some() {
            return 1;
        }
        if cause.downcast_ref::<AssemblyError>().is_some()
            || cause.downcast_ref::<TranslationError>().is_some()
        {
            return 2;
        }
    }
    3
}
