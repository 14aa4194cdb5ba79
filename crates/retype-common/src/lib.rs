//! Common types for the retype return-type repair engine.
//!
//! This crate provides the foundational types shared across all retype crates:
//! - Source spans (`Span`)
//! - Diagnostic descriptors (`Diagnostic`)
//! - Cooperative cancellation (`CancellationToken`, `Cancelled`)

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Diagnostic descriptors handed in by the host
pub mod diagnostics;
pub use diagnostics::Diagnostic;

// Cooperative cancellation
pub mod cancel;
pub use cancel::{CancellationToken, Cancelled};
