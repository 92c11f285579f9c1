use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::MissingSemicolon { .. } => "MissingSemicolon",
            ErrorImpl::UnbalancedParenthesis => "UnbalancedParenthesis",
            ErrorImpl::ExpectedExpression { .. } => "ExpectedExpression",
            ErrorImpl::InvalidAssignment { .. } => "InvalidAssignment",
            ErrorImpl::MalformedParameters { .. } => "MalformedParameters",
            ErrorImpl::MalformedArguments { .. } => "MalformedArguments",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::FunctionNotDeclared { .. } => "FunctionNotDeclared",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::MissingSemicolon { token } => ErrorTip::Suggestion(format!(
                "Expected `;` but found `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnbalancedParenthesis => ErrorTip::Suggestion(String::from(
                "Every `(` needs a matching `)` within the same statement",
            )),
            ErrorImpl::ExpectedExpression { token } => {
                ErrorTip::Suggestion(format!("Expected an expression, found `{}`", token))
            }
            ErrorImpl::InvalidAssignment { variable } => ErrorTip::Suggestion(format!(
                "Expected `=`, `+=`, `-=`, `++` or `--` after `{}`",
                variable
            )),
            ErrorImpl::MalformedParameters { token } => ErrorTip::Suggestion(format!(
                "Malformed parameter list near `{}`, expected `[a, b, ...]`",
                token
            )),
            ErrorImpl::MalformedArguments { token } => ErrorTip::Suggestion(format!(
                "Malformed argument list near `{}`, expected `[expr, ...]`",
                token
            )),
            ErrorImpl::VariableAlreadyDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` already declared", variable))
            }
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Identifier not found: `{}`", variable))
            }
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", function))
            }
            ErrorImpl::FunctionNotDeclared { function } => {
                ErrorTip::Suggestion(format!("Function not found: `{}`", function))
            }
            ErrorImpl::UnexpectedArguments {
                function,
                expected,
                received,
            }
            | ErrorImpl::MissingArguments {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Invalid arguments passed to `{}`: required {}, found {}",
                function, expected, received
            )),
            ErrorImpl::ReturnOutsideFunction => ErrorTip::Suggestion(String::from(
                "`return` is only valid inside a function body",
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    // Lexical
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },

    // Syntax
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("missing ';' before {token:?}")]
    MissingSemicolon { token: String },
    #[error("invalid parenthesis")]
    UnbalancedParenthesis,
    #[error("expected expression, found {token:?}")]
    ExpectedExpression { token: String },
    #[error("invalid assignment to variable {variable:?}")]
    InvalidAssignment { variable: String },
    #[error("invalid function declaration near {token:?}")]
    MalformedParameters { token: String },
    #[error("invalid function call near {token:?}")]
    MalformedArguments { token: String },

    // Semantic
    #[error("identifier {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("identifier {variable:?} not found")]
    VariableNotDeclared { variable: String },
    #[error("duplicate function declaration for {function:?}")]
    FunctionAlreadyDeclared { function: String },
    #[error("function {function:?} not found")]
    FunctionNotDeclared { function: String },
    #[error("invalid parameters passed to {function:?}: required {expected}, found {received}")]
    UnexpectedArguments {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("invalid parameters passed to {function:?}: required {expected}, found {received}")]
    MissingArguments {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("return outside of a function")]
    ReturnOutsideFunction,
}
