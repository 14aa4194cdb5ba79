//! Return-type mismatch repair.
//!
//! Given a diagnostic saying a method's declared return type disagrees with
//! a value actually returned from its body, this crate computes a corrected
//! return type and proposes a rewrite of the method signature that touches
//! nothing but the return-type annotation.
//!
//! The pipeline runs four stages — locate, reconcile, rewrite, assemble —
//! each of which may conclude "no fix" and stop the whole invocation with
//! `Ok(None)`. Cancellation is the only error; it is observed at every tree
//! walk and lineage resolution and aborts with `Err(Cancelled)` rather than
//! a partial proposal. Invocations are stateless and safe to run
//! concurrently against the same immutable tree and oracle snapshot.

pub mod assemble;
pub mod locate;
pub mod reconcile;
pub mod registry;
pub mod rewrite;

pub use assemble::FixProposal;
pub use locate::FixSite;
pub use registry::MismatchKind;

use retype_common::{CancellationToken, Cancelled, Diagnostic};
use retype_oracle::TypeOracle;
use retype_syntax::{SyntaxFacts, SyntaxTree};
use tracing::debug;

/// One repair invocation: an immutable snapshot plus the diagnostic that
/// triggered it.
pub struct FixContext<'a, O: TypeOracle, F: SyntaxFacts> {
    pub tree: &'a SyntaxTree,
    pub oracle: &'a O,
    pub facts: &'a F,
    pub diagnostic: Diagnostic,
    pub cancel: CancellationToken,
}

/// Compute at most one fix proposal for the context's diagnostic.
pub fn compute_fix<O: TypeOracle, F: SyntaxFacts>(
    ctx: &FixContext<'_, O, F>,
) -> Result<Option<FixProposal>, Cancelled> {
    ctx.cancel.check()?;

    let Some(kind) = MismatchKind::for_code(ctx.diagnostic.code) else {
        debug!(code = ctx.diagnostic.code, "unrecognized diagnostic code");
        return Ok(None);
    };
    debug!(?kind, span = ?ctx.diagnostic.span, "computing return-type fix");

    let Some(site) = locate::locate(
        ctx.tree,
        ctx.oracle,
        ctx.facts,
        ctx.diagnostic.span,
        &ctx.cancel,
    )?
    else {
        return Ok(None);
    };

    let is_async = ctx.facts.method_is_async(ctx.tree, site.method);
    let Some(target) =
        reconcile::reconcile(ctx.oracle, site.declared, site.actual, is_async, &ctx.cancel)?
    else {
        return Ok(None);
    };

    let display = ctx.oracle.minimal_display(target);
    let Some(rewritten) = rewrite::rewrite(ctx.tree, site.method, site.return_type_node, &display)
    else {
        return Ok(None);
    };

    Ok(assemble::assemble(rewritten, &display))
}
