//! Fix assembly: the one-proposal-per-diagnostic output shape.

use crate::registry::FIX_NAME;
use crate::rewrite::RewrittenMethod;
use retype_common::Span;
use serde::Serialize;
use tracing::debug;

/// A single proposed edit, shaped like an editor-protocol text change:
/// replace `span` (the whole method node) with `new_text`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixProposal {
    pub fix_name: String,
    pub description: String,
    pub span: Span,
    pub original_text: String,
    pub new_text: String,
}

/// Package a rewritten method as a proposal, or `None` when the rewrite
/// changed nothing.
pub fn assemble(rewritten: RewrittenMethod, new_type_display: &str) -> Option<FixProposal> {
    if rewritten.new_text == rewritten.original_text {
        debug!("rewrite produced identical text");
        return None;
    }

    Some(FixProposal {
        fix_name: FIX_NAME.to_string(),
        description: format!("Change return type to '{new_type_display}'"),
        span: rewritten.span,
        original_text: rewritten.original_text,
        new_text: rewritten.new_text,
    })
}
