// Copyright (c) 2016-2021 Fabian Schuiki

//! A global source file table that assigns an opaque ID to each source file.
//! This keeps source locations lean and allows for simple querying of
//! information.
//!
//! Since the parser that produces the trees consumed by this crate family is
//! external, the table only tracks file names and never maps file contents.

use crate::name::{get_name_table, Name, RcStr};
use std::fmt;

/// A source file identified by an opaque ID.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Source(pub Name);

pub const INVALID_SOURCE: Source = Source(Name(0));
pub const INVALID_SPAN: Span = Span {
    source: INVALID_SOURCE,
    begin: 0,
    end: 0,
};

impl Source {
    /// Register a source file path, or look up its existing ID.
    pub fn intern(path: &str) -> Source {
        Source(get_name_table().intern(path, true))
    }

    /// Return the path of this source file.
    pub fn get_path(self) -> RcStr {
        self.0.as_str()
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Source({})", self.get_path())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.get_path())
    }
}

/// A range of characters within a source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// The file the span is located in.
    pub source: Source,
    /// The byte offset at which the span starts.
    pub begin: usize,
    /// The byte offset at which the span ends.
    pub end: usize,
}

impl Span {
    /// Create a new span from two byte offsets.
    pub fn new(source: Source, begin: usize, end: usize) -> Span {
        Span { source, begin, end }
    }

    /// Create a new span that covers two spans, i.e. represents the smallest
    /// possible span that fully contains both input spans.
    pub fn union<S: Into<Span>>(&self, other: S) -> Span {
        let o = other.into();
        assert_eq!(self.source, o.source);
        Span {
            source: self.source,
            begin: std::cmp::min(self.begin, o.begin),
            end: std::cmp::max(self.end, o.end),
        }
    }

    /// Return the location just before the first character in this span.
    pub fn begin(&self) -> Location {
        Location {
            source: self.source,
            offset: self.begin,
        }
    }

    /// Return the location just after the last character in this span.
    pub fn end(&self) -> Location {
        Location {
            source: self.source,
            offset: self.end,
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if *self == INVALID_SPAN {
            write!(f, "<unknown>")
        } else {
            write!(f, "{}:{}-{}", self.source, self.begin, self.end)
        }
    }
}

impl From<Location> for Span {
    fn from(loc: Location) -> Span {
        Span {
            source: loc.source,
            begin: loc.offset,
            end: loc.offset,
        }
    }
}

/// A single character within a source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// The file the location is situated in.
    pub source: Source,
    /// The byte offset of the character.
    pub offset: usize,
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.offset)
    }
}

/// A wrapper that associates a span with a value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    /// Wrap a given value together with the span it covers.
    pub fn new(value: T, span: Span) -> Spanned<T> {
        Spanned { value, span }
    }

    /// Map the value, preserving the span.
    pub fn map<F, U>(self, f: F) -> Spanned<U>
    where
        F: FnOnce(T) -> U,
    {
        Spanned::new(f(self.value), self.span)
    }

    /// Map the value to a result, preserving the span.
    pub fn map_into<U>(self) -> Spanned<U>
    where
        T: Into<U>,
    {
        Spanned::new(self.value.into(), self.span)
    }
}

impl<T: fmt::Debug> fmt::Debug for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.value.fmt(f)
    }
}
