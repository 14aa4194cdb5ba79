//! Context location: from a diagnostic span to a concrete fix site.
//!
//! The span alone is ambiguous about which return statement in a file is
//! implicated, so the locator anchors on both the innermost enclosing method
//! declaration and the nearest enclosing return whose range contains the
//! span. Every "this diagnostic has no fixable shape here" condition exits
//! with `None`; only cancellation propagates.

use retype_common::{CancellationToken, Cancelled, Span};
use retype_oracle::{TypeId, TypeOracle, TypeTag};
use retype_syntax::{NodeIndex, SyntaxFacts, SyntaxTree};
use tracing::debug;

/// Everything downstream stages need about one located mismatch.
#[derive(Copy, Clone, Debug)]
pub struct FixSite {
    pub method: NodeIndex,
    pub return_type_node: NodeIndex,
    pub declared: TypeId,
    pub return_site: NodeIndex,
    pub actual: TypeId,
}

/// Resolve the diagnostic span to a fix site, or `None` when the span does
/// not pin a repairable method/return pair.
pub fn locate<O: TypeOracle, F: SyntaxFacts>(
    tree: &SyntaxTree,
    oracle: &O,
    facts: &F,
    span: Span,
    cancel: &CancellationToken,
) -> Result<Option<FixSite>, Cancelled> {
    let Some(token_idx) = tree.token_at(span.start) else {
        debug!(start = span.start, "no token at diagnostic position");
        return Ok(None);
    };

    // The span must name the token exactly: either it is the token's own
    // span, or it is a zero-width caret touching the token.
    let token_span = tree.token(token_idx).span();
    if span != token_span && !(span.is_empty() && token_span.intersects_pos(span.start)) {
        debug!(?span, ?token_span, "diagnostic span does not pin a token");
        return Ok(None);
    }

    let start_node = tree.node_covering_token(token_idx);
    if start_node.is_none() {
        debug!("token lies outside any syntax node");
        return Ok(None);
    }

    // One outward walk finds both anchors. Seeing the return before the
    // method guarantees the return lives inside that method rather than in
    // a sibling.
    let mut return_site = NodeIndex::NONE;
    let mut method = NodeIndex::NONE;
    for ancestor in tree.arena.ancestors_and_self(start_node) {
        cancel.check()?;
        if return_site.is_none()
            && facts.is_return_statement(tree, ancestor)
            && node_contains_span(tree, ancestor, span)
        {
            return_site = ancestor;
        }
        if facts.is_method_declaration(tree, ancestor) {
            method = ancestor;
            break;
        }
    }

    if method.is_none() {
        debug!("no enclosing method declaration");
        return Ok(None);
    }
    if return_site.is_none() {
        debug!("no enclosing return statement contains the span");
        return Ok(None);
    }

    let Some(return_type_node) = facts.method_return_type(tree, method) else {
        debug!("method has no return-type annotation");
        return Ok(None);
    };
    let Some(declared) = oracle.resolve_type_node(return_type_node) else {
        debug!("declared return type is unresolved");
        return Ok(None);
    };
    if oracle.tag(declared) == TypeTag::Dynamic {
        debug!("declared return type is dynamic");
        return Ok(None);
    }

    let Some(expression) = facts.return_expression(tree, return_site) else {
        debug!("return statement carries no expression");
        return Ok(None);
    };
    let Some(actual) = oracle.type_of(expression) else {
        debug!("returned expression's type is unresolved");
        return Ok(None);
    };
    if oracle.tag(actual) == TypeTag::Dynamic {
        debug!("returned expression's type is dynamic");
        return Ok(None);
    }
    // Anonymous-typed returns flow through; reconciliation names a fallback.

    Ok(Some(FixSite {
        method,
        return_type_node,
        declared,
        return_site,
        actual,
    }))
}

fn node_contains_span(tree: &SyntaxTree, node: NodeIndex, span: Span) -> bool {
    match tree.arena.get(node) {
        Some(n) => n.base().span().contains(span),
        None => false,
    }
}
