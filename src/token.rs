//! Format-independent token vocabulary.
//!
//! Each wire format has its own code enumeration (see
//! [`bintoken::Code`](crate::bintoken::Code)). Consumers that only care about
//! the shape of a token dispatch on its [`Symbol`], or more coarsely on its
//! [`Category`].

/// Coarse projection of a format-specific token code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    End,
    Error,
    Null,
    Boolean,
    Integer,
    Real,
    String,
    Binary,
    /// A packed array of fixed-width scalars carried in a single token
    Array,
    BeginArray,
    EndArray,
    BeginRecord,
    EndRecord,
    BeginAssocArray,
    EndAssocArray,
}

/// Coarsest projection of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// End of input or an error
    Status,
    /// The null token
    Nullable,
    /// A token carrying a scalar, string or packed array
    Data,
    /// Open or close of a container
    Structural,
}

impl Symbol {
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Symbol::End | Symbol::Error => Category::Status,
            Symbol::Null => Category::Nullable,
            Symbol::Boolean
            | Symbol::Integer
            | Symbol::Real
            | Symbol::String
            | Symbol::Binary
            | Symbol::Array => Category::Data,
            Symbol::BeginArray
            | Symbol::EndArray
            | Symbol::BeginRecord
            | Symbol::EndRecord
            | Symbol::BeginAssocArray
            | Symbol::EndAssocArray => Category::Structural,
        }
    }

    /// Returns `true` for the three container openers.
    #[inline]
    #[must_use]
    pub const fn is_begin(self) -> bool {
        matches!(
            self,
            Symbol::BeginArray | Symbol::BeginRecord | Symbol::BeginAssocArray
        )
    }

    /// Returns `true` for the three container closers.
    #[inline]
    #[must_use]
    pub const fn is_end(self) -> bool {
        matches!(
            self,
            Symbol::EndArray | Symbol::EndRecord | Symbol::EndAssocArray
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(Symbol::End.category(), Category::Status);
        assert_eq!(Symbol::Error.category(), Category::Status);
        assert_eq!(Symbol::Null.category(), Category::Nullable);
        assert_eq!(Symbol::Integer.category(), Category::Data);
        assert_eq!(Symbol::Array.category(), Category::Data);
        assert_eq!(Symbol::EndRecord.category(), Category::Structural);
    }

    #[test]
    fn test_begin_end() {
        assert!(Symbol::BeginAssocArray.is_begin());
        assert!(!Symbol::BeginAssocArray.is_end());
        assert!(Symbol::EndArray.is_end());
        assert!(!Symbol::Array.is_begin());
        assert!(!Symbol::Array.is_end());
    }
}
