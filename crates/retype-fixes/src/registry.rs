//! Diagnostic-code registry for the return-type fix family.
//!
//! The engine fixes exactly three mismatch classifications. The code decides
//! only which comparison rule applies; it never changes data shapes.

/// Stable identifier for this fix family, as surfaced to hosts.
pub const FIX_NAME: &str = "fixReturnType";

/// A value-returning expression in a method declared to return nothing.
pub const CODE_VOID_RETURN_WITH_VALUE: u32 = 127;
/// Returned value not implicitly convertible to the declared return type.
pub const CODE_TYPE_MISMATCH: u32 = 29;
/// Same mismatch, but an explicit conversion exists.
pub const CODE_EXPLICIT_CONVERSION_EXISTS: u32 = 266;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MismatchKind {
    /// Triggers the void/async promotion path.
    VoidReturnWithValue,
    /// Triggers the declared-lineage scan.
    ImplicitMismatch,
    /// Handled identically to [`MismatchKind::ImplicitMismatch`].
    ExplicitConversionExists,
}

impl MismatchKind {
    /// Classify a diagnostic code. Unknown codes get no fix at all.
    pub fn for_code(code: u32) -> Option<MismatchKind> {
        match code {
            CODE_VOID_RETURN_WITH_VALUE => Some(MismatchKind::VoidReturnWithValue),
            CODE_TYPE_MISMATCH => Some(MismatchKind::ImplicitMismatch),
            CODE_EXPLICIT_CONVERSION_EXISTS => Some(MismatchKind::ExplicitConversionExists),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_classify() {
        assert_eq!(
            MismatchKind::for_code(127),
            Some(MismatchKind::VoidReturnWithValue)
        );
        assert_eq!(MismatchKind::for_code(29), Some(MismatchKind::ImplicitMismatch));
        assert_eq!(
            MismatchKind::for_code(266),
            Some(MismatchKind::ExplicitConversionExists)
        );
    }

    #[test]
    fn unknown_codes_do_not_classify() {
        assert_eq!(MismatchKind::for_code(0), None);
        assert_eq!(MismatchKind::for_code(1002), None);
    }
}
