//! Diagnostic descriptors.
//!
//! Diagnostics are produced elsewhere; retype only consumes them. The engine
//! reads the code to pick a comparison rule and the span to anchor tree
//! walks, and treats everything else as opaque.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// An opaque mismatch signal: a classification code plus the source range the
/// producer flagged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: u32,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(code: u32, span: Span) -> Diagnostic {
        Diagnostic { code, span }
    }
}
