//! Equality and total ordering across kinds.

use super::Variable;
use std::cmp::Ordering;
use std::iter::Copied;
use std::slice;

/// Characters of a string variable, whatever its width.
pub(crate) enum Chars<'a> {
    Narrow(std::str::Chars<'a>),
    Wide(Copied<slice::Iter<'a, char>>),
    Utf16(std::char::DecodeUtf16<Copied<slice::Iter<'a, u16>>>),
}

impl<'a> Chars<'a> {
    pub(crate) fn new(value: &'a Variable) -> Option<Self> {
        let chars = match value {
            Variable::String(s) => Chars::Narrow(s.chars()),
            Variable::WString(chars) | Variable::U32String(chars) => {
                Chars::Wide(chars.iter().copied())
            }
            Variable::U16String(units) => Chars::Utf16(char::decode_utf16(units.iter().copied())),
            _ => return None,
        };
        Some(chars)
    }
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match self {
            Chars::Narrow(chars) => chars.next(),
            Chars::Wide(chars) => chars.next(),
            Chars::Utf16(units) => units
                .next()
                .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER)),
        }
    }
}

fn compare_reals(a: f64, b: f64) -> Ordering {
    // Keeps 0.0 == -0.0; NaN falls back to the IEEE total order.
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        let (left, right) = (self.kind().group(), other.kind().group());
        if left != right {
            return left.cmp(&right);
        }
        match (self, other) {
            (Variable::Boolean(a), Variable::Boolean(b)) => a.cmp(b),
            (Variable::Array(a), Variable::Array(b)) => a.iter().cmp(b.iter()),
            (Variable::Map(a), Variable::Map(b)) => a.iter().cmp(b.iter()),
            _ => {
                if let (Some(a), Some(b)) = (self.integer(), other.integer()) {
                    a.cmp(&b)
                } else if let (Some(a), Some(b)) = (self.real(), other.real()) {
                    compare_reals(a, b)
                } else if let (Some(a), Some(b)) = (self.chars(), other.chars()) {
                    a.cmp(b)
                } else {
                    // Both null.
                    Ordering::Equal
                }
            }
        }
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Variable {}
