// Copyright (c) 2016-2021 Fabian Schuiki

//! This crate contains the fundamental utilities used by the rest of the
//! mealy compiler.

pub mod arenas;
pub mod errors;
pub mod id;
pub mod name;
pub mod source;
pub mod util;

pub use self::id::NodeId;

use self::errors::{DiagBuilder2, DiagEmitter, Severity};
use std::cell::{Cell, RefCell};

/// A compiler session.
///
/// The session owns the options the compiler was invoked with and collects
/// the diagnostics emitted during a run. Everything that wants to report
/// something to the user does so through the session.
pub struct Session {
    /// The options the compiler was started with.
    pub opts: SessionOptions,
    /// The diagnostics emitted so far.
    diags: RefCell<Vec<DiagBuilder2>>,
    /// The number of errors emitted so far.
    errors: Cell<usize>,
}

impl Session {
    /// Create a new session with default options.
    pub fn new() -> Session {
        Session {
            opts: SessionOptions::default(),
            diags: RefCell::new(Vec::new()),
            errors: Cell::new(0),
        }
    }

    /// Check whether any errors have been emitted.
    pub fn failed(&self) -> bool {
        self.errors.get() > 0
    }

    /// The number of errors emitted so far.
    pub fn error_count(&self) -> usize {
        self.errors.get()
    }

    /// Take a snapshot of the diagnostics emitted so far.
    pub fn diags(&self) -> Vec<DiagBuilder2> {
        self.diags.borrow().clone()
    }

    /// Check whether a diagnostic with the given severity and a message
    /// containing `needle` has been emitted. Useful in tests.
    pub fn has_diag(&self, severity: Severity, needle: &str) -> bool {
        self.diags
            .borrow()
            .iter()
            .any(|d| d.get_severity() == severity && d.get_message().contains(needle))
    }
}

impl Default for Session {
    fn default() -> Session {
        Session::new()
    }
}

impl DiagEmitter for Session {
    fn emit(&self, diag: DiagBuilder2) {
        if diag.get_severity() >= Severity::Error {
            self.errors.set(self.errors.get() + 1);
        }
        self.diags.borrow_mut().push(diag);
    }
}

/// The options a session is configured with.
#[derive(Debug, Default)]
pub struct SessionOptions {
    /// Accept IO declarations without a range when the matching variable
    /// declaration has one.
    pub allow_empty_io_range: bool,
}
