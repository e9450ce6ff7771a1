//! Error types returned by [`RbSet`](crate::RbSet) operations.

use core::fmt::{self, Debug, Display, Formatter};

/// The reason a set operation was rejected.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ErrorKind {
    /// An element comparing equal to the argument is already stored.
    DuplicateKey,

    /// No stored element compares equal to the argument.
    NotFound,

    /// The operation requires at least one element, but the set is empty.
    EmptyTree,
}

impl ErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            ErrorKind::DuplicateKey => "an equal element is already present",
            ErrorKind::NotFound => "no equal element is present",
            ErrorKind::EmptyTree => "the set is empty",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.pad(self.as_str())
    }
}

/// An error type indicating that an operation on the set failed.
///
/// A failed operation never modifies the set.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
}

impl Debug for Error {
    #[cold]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Error")
            .field("kind", &self.kind)
            .finish()
    }
}

impl Display for Error {
    #[cold]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.pad(self.kind.as_str())
    }
}

impl std::error::Error for Error {}

impl<T> From<AddError<T>> for Error {
    #[inline]
    fn from(add_error: AddError<T>) -> Self {
        add_error.error
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Error { kind }
    }
}

impl Error {
    /// Returned by [`add`](crate::RbSet::add) when an equal element is already stored.
    pub const DUPLICATE_KEY: Self = Error {
        kind: ErrorKind::DuplicateKey,
    };

    /// Returned by [`remove`](crate::RbSet::remove) when no equal element is stored.
    pub const NOT_FOUND: Self = Error {
        kind: ErrorKind::NotFound,
    };

    /// Returned by [`remove_first`](crate::RbSet::remove_first) on an empty set.
    pub const EMPTY_TREE: Self = Error {
        kind: ErrorKind::EmptyTree,
    };

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// An error type indicating that [`add`](crate::RbSet::add) rejected a value.
///
/// The rejected value is handed back to the caller untouched.
#[derive(Debug, PartialEq, Eq)]
pub struct AddError<T> {
    /// The value that was not added.
    pub value: T,

    /// The reason the value was rejected.
    pub error: Error,
}

impl<T> AddError<T> {
    #[inline]
    pub fn map<F: FnOnce(T) -> U, U>(self, f: F) -> AddError<U> {
        AddError {
            value: f(self.value),
            error: self.error,
        }
    }

    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> Display for AddError<T> {
    #[cold]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.error, formatter)
    }
}

impl<T: Debug> std::error::Error for AddError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kinds_round_trip_through_consts() {
        assert_eq!(Error::DUPLICATE_KEY.kind(), ErrorKind::DuplicateKey);
        assert_eq!(Error::NOT_FOUND.kind(), ErrorKind::NotFound);
        assert_eq!(Error::EMPTY_TREE.kind(), ErrorKind::EmptyTree);
        assert_eq!(Error::from(ErrorKind::NotFound), Error::NOT_FOUND);
    }

    #[test]
    fn add_error_keeps_value() {
        let err = AddError {
            value: "karina",
            error: Error::DUPLICATE_KEY,
        };
        let err = err.map(str::len);
        assert_eq!(err.value, 6);
        assert_eq!(Error::from(err), Error::DUPLICATE_KEY);
    }

    #[test]
    fn display() {
        assert_eq!(Error::EMPTY_TREE.to_string(), "the set is empty");
        let err = AddError {
            value: 3,
            error: Error::DUPLICATE_KEY,
        };
        assert_eq!(err.to_string(), "an equal element is already present");
        assert!(std::error::Error::source(&err).is_some());
    }
}
