//! Leaf values and their text form.

use std::borrow::Cow;
use std::fmt;

use crate::shape::ScalarKind;

/// A leaf value borrowed from a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Kept apart from `Float` so `0.1f32` prints as `0.1`, not its widened value.
    Float32(f32),
    Char(char),
    Text(Cow<'a, str>),
}

impl Scalar<'_> {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::UInt(_) => ScalarKind::UInt,
            Scalar::Float(_) | Scalar::Float32(_) => ScalarKind::Float,
            Scalar::Char(_) => ScalarKind::Char,
            Scalar::Text(_) => ScalarKind::Text,
        }
    }

    /// Append the text form of this value to `out`.
    ///
    /// Integers are base 10, floats use the shortest decimal that round-trips
    /// (never an exponent), non-finite floats are `NaN`, `+Inf`, `-Inf`.
    pub fn write_text<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        match self {
            Scalar::Bool(b) => out.write_str(if *b { "true" } else { "false" }),
            Scalar::Int(n) => write!(out, "{}", n),
            Scalar::UInt(n) => write!(out, "{}", n),
            Scalar::Float(x) => write_float(out, *x, x.is_nan(), x.is_infinite()),
            Scalar::Float32(x) => write_float(out, *x, x.is_nan(), x.is_infinite()),
            Scalar::Char(c) => out.write_char(*c),
            Scalar::Text(s) => out.write_str(s),
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_text(&mut out);
        out
    }
}

fn write_float<W, F>(out: &mut W, value: F, nan: bool, infinite: bool) -> fmt::Result
where
    W: fmt::Write,
    F: fmt::Display + PartialOrd + Default,
{
    if nan {
        out.write_str("NaN")
    } else if infinite {
        out.write_str(if value > F::default() { "+Inf" } else { "-Inf" })
    } else {
        write!(out, "{}", value)
    }
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_text(f)
    }
}
