//! Error types shared across the lexer, parser and evaluator.

use std::fmt;

use crate::ast::Kind;

/// A stable, machine-readable identifier for an error kind, matching the
/// diagnostic table in the language design document. Used both for the
/// line the CLI prints and for tests that care which failure fired.
pub trait DiagnosticCode {
    fn code(&self) -> &'static str;
}

/// Failures raised while turning source text into tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    UnterminatedString { line: u32 },
    EmptyCharLiteral { line: u32 },
    UnterminatedBracket { line: u32 },
}

impl LexError {
    pub fn line(&self) -> u32 {
        match self {
            Self::UnterminatedString { line }
            | Self::EmptyCharLiteral { line }
            | Self::UnterminatedBracket { line } => *line,
        }
    }
}

impl DiagnosticCode for LexError {
    fn code(&self) -> &'static str {
        "lexer-malformed"
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString { .. } => write!(f, "unterminated string literal"),
            Self::EmptyCharLiteral { .. } => write!(f, "empty character literal"),
            Self::UnterminatedBracket { .. } => write!(f, "unterminated bracketed literal"),
        }
    }
}

impl std::error::Error for LexError {}

/// Failures raised while building the program tree from a token stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    StructureInvalid(String),
    ExpectedToken(String),
    UndeclaredVariable(String),
    DuplicateDeclaration(String),
    ReservedKeyword(String),
    InvalidAssignmentTarget,
    DisallowedAssignInCondition,
    ConcatOutsideDisplay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: u32,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: u32) -> Self {
        Self { kind, line }
    }
}

impl DiagnosticCode for ParseError {
    fn code(&self) -> &'static str {
        match &self.kind {
            ParseErrorKind::StructureInvalid(_) => "structure-invalid",
            ParseErrorKind::ExpectedToken(_)
            | ParseErrorKind::DisallowedAssignInCondition
            | ParseErrorKind::ConcatOutsideDisplay => "expected-token",
            ParseErrorKind::UndeclaredVariable(_) => "undeclared-variable",
            // the design's diagnostic table has no dedicated code for
            // re-declaration; it shares the declaration-discipline bucket
            // with undeclared-variable rather than inventing a new one.
            ParseErrorKind::DuplicateDeclaration(_) => "undeclared-variable",
            ParseErrorKind::ReservedKeyword(_) => "reserved-keyword",
            ParseErrorKind::InvalidAssignmentTarget => "invalid-assignment-target",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::StructureInvalid(msg) => write!(f, "{}", msg),
            ParseErrorKind::ExpectedToken(msg) => write!(f, "expected {}", msg),
            ParseErrorKind::UndeclaredVariable(name) => {
                write!(f, "undeclared variable '{}'", name)
            }
            ParseErrorKind::DuplicateDeclaration(name) => {
                write!(f, "'{}' is already declared", name)
            }
            ParseErrorKind::ReservedKeyword(word) => {
                write!(f, "'{}' is a reserved word and cannot be used here", word)
            }
            ParseErrorKind::InvalidAssignmentTarget => {
                write!(f, "left-hand side of '=' is not a variable")
            }
            ParseErrorKind::DisallowedAssignInCondition => {
                write!(f, "assignment is not allowed inside a condition")
            }
            ParseErrorKind::ConcatOutsideDisplay => {
                write!(f, "'&' may only be used inside an IPAKITA argument list")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Failures raised while walking the program tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    UndeclaredVariable(String),
    ReservedKeyword(String),
    TypeMismatchAssign {
        name: String,
        value: String,
        declared: Kind,
        found: Kind,
    },
    TypeMismatchOp {
        op: &'static str,
        lhs: Kind,
        rhs: Kind,
    },
    DivisionByZero,
    IntegerOverflow(String),
    InputInvalid(String),
    ConditionNotBoolean(Kind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub line: u32,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, line: u32) -> Self {
        Self { kind, line }
    }
}

impl DiagnosticCode for RuntimeError {
    fn code(&self) -> &'static str {
        match &self.kind {
            RuntimeErrorKind::UndeclaredVariable(_) => "undeclared-variable",
            RuntimeErrorKind::ReservedKeyword(_) => "reserved-keyword",
            RuntimeErrorKind::TypeMismatchAssign { .. } | RuntimeErrorKind::TypeMismatchOp { .. } => {
                "type-mismatch"
            }
            RuntimeErrorKind::DivisionByZero => "division-by-zero",
            RuntimeErrorKind::IntegerOverflow(_) => "integer-overflow",
            RuntimeErrorKind::InputInvalid(_) => "input-invalid",
            RuntimeErrorKind::ConditionNotBoolean(_) => "type-mismatch",
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RuntimeErrorKind::UndeclaredVariable(name) => {
                write!(f, "undeclared variable '{}'", name)
            }
            RuntimeErrorKind::ReservedKeyword(word) => {
                write!(f, "'{}' is a reserved word", word)
            }
            RuntimeErrorKind::TypeMismatchAssign {
                name,
                value,
                declared,
                found,
            } => write!(
                f,
                "cannot assign {} ({}) to '{}' declared as {}",
                value, found, name, declared
            ),
            RuntimeErrorKind::TypeMismatchOp { op, lhs, rhs } => write!(
                f,
                "operator '{}' is not defined for {} and {}",
                op, lhs, rhs
            ),
            RuntimeErrorKind::DivisionByZero => write!(f, "division by zero"),
            RuntimeErrorKind::IntegerOverflow(what) => write!(f, "integer overflow in {}", what),
            RuntimeErrorKind::InputInvalid(name) => {
                write!(f, "DAWAT received an empty line for '{}'", name)
            }
            RuntimeErrorKind::ConditionNotBoolean(found) => {
                write!(f, "condition must be {}, found {}", Kind::Bool, found)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Umbrella error unifying all three pipeline stages, so a caller can
/// match a single `Result` across `tokenize` → `parse` → `run`.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Lex(LexError),
    Parse(ParseError),
    Runtime(RuntimeError),
}

impl Error {
    pub fn line(&self) -> u32 {
        match self {
            Self::Lex(e) => e.line(),
            Self::Parse(e) => e.line,
            Self::Runtime(e) => e.line,
        }
    }
}

impl DiagnosticCode for Error {
    fn code(&self) -> &'static str {
        match self {
            Self::Lex(e) => e.code(),
            Self::Parse(e) => e.code(),
            Self::Runtime(e) => e.code(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(e) => write!(f, "{}", e),
            Self::Parse(e) => write!(f, "{}", e),
            Self::Runtime(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<LexError> for Error {
    fn from(e: LexError) -> Self {
        Self::Lex(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<RuntimeError> for Error {
    fn from(e: RuntimeError) -> Self {
        Self::Runtime(e)
    }
}
