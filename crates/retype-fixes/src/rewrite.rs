//! Tree rewriting by byte splice.
//!
//! Trees are immutable, so "replacing" the return-type node means
//! re-rendering the method's text with exactly one substitution: the bytes
//! of the return-type node's own span become the new type's minimal
//! display. Trivia lives outside that span by construction, so every
//! comment and every space around the annotation survives byte-for-byte.

use retype_common::Span;
use retype_syntax::{NodeIndex, SyntaxTree};

/// The whole-method replacement produced by one rewrite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewrittenMethod {
    /// The method node's text span in the original source.
    pub span: Span,
    pub original_text: String,
    pub new_text: String,
}

/// Re-render `method` with `return_type_node`'s text replaced by
/// `new_type_text`. Returns `None` only for indices that do not name nodes
/// of this tree.
pub fn rewrite(
    tree: &SyntaxTree,
    method: NodeIndex,
    return_type_node: NodeIndex,
    new_type_text: &str,
) -> Option<RewrittenMethod> {
    let method_span = tree.arena.get(method)?.base().span();
    let type_span = tree.arena.get(return_type_node)?.base().span();
    if !method_span.contains(type_span) {
        return None;
    }

    let source = &tree.source;
    let prefix = &source[method_span.start as usize..type_span.start as usize];
    let suffix = &source[type_span.end as usize..method_span.end as usize];

    let mut new_text = String::with_capacity(
        prefix.len() + new_type_text.len() + suffix.len(),
    );
    new_text.push_str(prefix);
    new_text.push_str(new_type_text);
    new_text.push_str(suffix);

    Some(RewrittenMethod {
        span: method_span,
        original_text: method_span.text(source).to_string(),
        new_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use retype_syntax::{Node, parse_source};

    fn return_type_of(tree: &SyntaxTree) -> (NodeIndex, NodeIndex) {
        for (i, node) in tree.arena.nodes.iter().enumerate() {
            if let Node::MethodDeclaration(data) = node {
                return (NodeIndex(i as u32), data.return_type);
            }
        }
        panic!("no method in tree");
    }

    #[test]
    fn splices_only_the_type_span() {
        let tree = parse_source("class C { void M() { return 0; } }");
        let (method, return_type) = return_type_of(&tree);
        let rewritten = rewrite(&tree, method, return_type, "int").unwrap();
        assert_eq!(rewritten.original_text, "void M() { return 0; }");
        assert_eq!(rewritten.new_text, "int M() { return 0; }");
    }

    #[test]
    fn keeps_trivia_around_the_type_byte_for_byte() {
        let source = "class C {\n    /* keep */ void  M() { return 0; } // tail\n}";
        let tree = parse_source(source);
        let (method, return_type) = return_type_of(&tree);
        let rewritten = rewrite(&tree, method, return_type, "int").unwrap();
        assert_eq!(rewritten.new_text, "int  M() { return 0; }");
        // The comment is leading trivia of the method's first token, outside
        // the method's own text span; it is untouched in the source.
        assert!(source.contains("/* keep */"));
    }
}
