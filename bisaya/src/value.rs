//! Runtime values and their display/coercion rules.

use crate::ast::Kind;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f32),
    Char(char),
    Bool(bool),
    Str(String),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Int(_) => Kind::Int,
            Self::Float(_) => Kind::Float,
            Self::Char(_) => Kind::Char,
            Self::Bool(_) => Kind::Bool,
            Self::Str(_) => Kind::String,
        }
    }

    /// The per-kind default used when a `MUGNA` declaration has no
    /// initializer.
    pub fn default_for(kind: Kind) -> Self {
        match kind {
            Kind::Int => Self::Int(0),
            Kind::Float => Self::Float(0.0),
            Kind::Char => Self::Char('\0'),
            Kind::Bool => Self::Bool(false),
            Kind::String => Self::Str(String::new()),
        }
    }

    /// The display form written by `IPAKITA` and used to build concat (`&`)
    /// operands: `"OO"`/`"DILI"` for booleans, a trailing `.0` for integral
    /// floats, natural decimal formatting otherwise.
    pub fn display(&self) -> String {
        match self {
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format_float(*f),
            Self::Char(c) => c.to_string(),
            Self::Bool(b) => (if *b { "OO" } else { "DILI" }).to_string(),
            Self::Str(s) => s.clone(),
        }
    }

    /// If this value is a string that parses as a number, return the
    /// parsed numeric value; otherwise return this value unchanged. Used
    /// by arithmetic/relational operators before the int→float promotion
    /// step.
    pub fn coerce_numeric_string(self) -> Self {
        if let Self::Str(s) = &self {
            let trimmed = s.trim();
            if !trimmed.contains('.') {
                if let Ok(i) = trimmed.parse::<i32>() {
                    return Self::Int(i);
                }
            }
            if let Ok(f) = trimmed.parse::<f32>() {
                return Self::Float(f);
            }
        }
        self
    }
}

fn format_float(f: f32) -> String {
    if f.is_finite() && f == f.trunc() {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
