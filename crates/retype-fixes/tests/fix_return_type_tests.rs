//! End-to-end pipeline tests over marked sources.
//!
//! Fixture sources carry `[|...|]` markers around the span the diagnostic
//! reports, mirroring how the host would hand a span to the engine.

use once_cell::sync::Lazy;
use retype_common::{CancellationToken, Cancelled, Diagnostic, Span};
use retype_fixes::{FixContext, FixProposal, compute_fix};
use retype_oracle::{SemanticModel, TypeTable};
use retype_syntax::{CsFacts, parse_source};

/// A shared type universe: the table is append-only, so read-heavy tests
/// can run against one instance concurrently.
static TYPES: Lazy<TypeTable> = Lazy::new(|| {
    let table = TypeTable::new();
    let animal = table.define_class("Animal", None, &[]);
    table.define_class("Dog", Some(animal), &[]);
    table.define_class("Cat", Some(animal), &[]);
    let shape = table.define_interface("IShape", &[]);
    table.define_class("Circle", None, &[shape]);
    table
});

/// Split a `[|...|]` marked source into clean text and the marked span.
fn strip_markers(marked: &str) -> (String, Span) {
    let open = marked.find("[|").expect("missing [| marker");
    let close = marked.find("|]").expect("missing |] marker");
    assert!(open < close, "markers out of order");

    let mut source = String::with_capacity(marked.len() - 4);
    source.push_str(&marked[..open]);
    source.push_str(&marked[open + 2..close]);
    source.push_str(&marked[close + 2..]);
    (source, Span::new(open as u32, (close - 2) as u32))
}

fn run_fix(marked: &str, code: u32) -> Option<FixProposal> {
    let (source, span) = strip_markers(marked);
    let tree = parse_source(&source);
    let model = SemanticModel::bind(&tree, &TYPES);
    let ctx = FixContext {
        tree: &tree,
        oracle: &model,
        facts: &CsFacts,
        diagnostic: Diagnostic::new(code, span),
        cancel: CancellationToken::new(),
    };
    compute_fix(&ctx).expect("invocation was not cancelled")
}

fn expect_new_text(marked: &str, code: u32, expected: &str) {
    let proposal = run_fix(marked, code).expect("expected a fix proposal");
    assert_eq!(proposal.new_text, expected);
}

#[test]
fn void_method_returning_int_becomes_int() {
    expect_new_text(
        "class C { void M() { return [|0|]; } }",
        127,
        "int M() { return 0; }",
    );
}

#[test]
fn void_method_returning_object_becomes_object() {
    expect_new_text(
        "class C { void M() { return [|new|] object(); } }",
        127,
        "object M() { return new object(); }",
    );
}

#[test]
fn int_method_returning_object_widens_to_object() {
    expect_new_text(
        "class C { int M() { return [|new|] object(); } }",
        29,
        "object M() { return new object(); }",
    );
}

#[test]
fn anonymous_return_falls_back_to_object() {
    expect_new_text(
        "class C { int M() { return [|new|] { }; } }",
        29,
        "object M() { return new { }; }",
    );
}

#[test]
fn async_void_promotes_to_task_of_int() {
    expect_new_text(
        "class C { async void M() { return [|0|]; } }",
        127,
        "async Task<int> M() { return 0; }",
    );
}

#[test]
fn shared_base_class_wins_over_object() {
    expect_new_text(
        "class C { Dog M() { return [|new|] Cat(); } }",
        29,
        "Animal M() { return new Cat(); }",
    );
}

#[test]
fn declared_interface_is_kept_when_actual_implements_it() {
    // Circle implements IShape, so reconciliation lands on the declared
    // interface itself and there is nothing to change.
    assert_eq!(
        run_fix("class C { IShape M() { return [|new|] Circle(); } }", 29),
        None
    );
}

#[test]
fn unrelated_interface_declaration_prefers_actual_type() {
    expect_new_text(
        "class C { IShape M() { return [|new|] Animal(); } }",
        29,
        "Animal M() { return new Animal(); }",
    );
}

#[test]
fn object_declaration_with_anonymous_return_is_a_no_op() {
    assert_eq!(
        run_fix("class C { object M() { return [|new|] { }; } }", 29),
        None
    );
}

#[test]
fn repaired_async_signature_needs_no_further_fixing() {
    // Idempotence for the async scenario: the declared wrapper argument
    // already matches the returned value, so nothing is proposed.
    assert_eq!(
        run_fix("class C { async Task<int> M() { return [|0|]; } }", 29),
        None
    );
}

#[test]
fn async_mismatch_reconciles_inside_the_wrapper() {
    expect_new_text(
        "class C { async Task<int> M() { return [|\"s\"|]; } }",
        29,
        "async Task<string> M() { return \"s\"; }",
    );
}

#[test]
fn matching_types_propose_nothing() {
    // Idempotence: the repaired signature from the void scenario needs no
    // further fixing.
    assert_eq!(run_fix("class C { int M() { return [|0|]; } }", 29), None);
}

#[test]
fn dynamic_declared_type_proposes_nothing() {
    assert_eq!(
        run_fix("class C { dynamic M() { return [|0|]; } }", 29),
        None
    );
}

#[test]
fn dynamic_typed_parameter_return_proposes_nothing() {
    assert_eq!(
        run_fix(
            "class C { int M(dynamic value) { return [|value|]; } }",
            29
        ),
        None
    );
}

#[test]
fn unknown_diagnostic_code_proposes_nothing() {
    assert_eq!(run_fix("class C { void M() { return [|0|]; } }", 9999), None);
}

#[test]
fn explicit_conversion_code_behaves_like_implicit() {
    let implicit = run_fix("class C { int M() { return [|new|] object(); } }", 29);
    let explicit = run_fix("class C { int M() { return [|new|] object(); } }", 266);
    assert_eq!(implicit, explicit);
    assert!(implicit.is_some());
}

#[test]
fn span_not_pinning_a_token_proposes_nothing() {
    // The marked range covers two tokens, so it names neither exactly.
    assert_eq!(
        run_fix("class C { void M() { [|return 0|]; } }", 127),
        None
    );
}

#[test]
fn empty_span_at_token_end_still_pins_the_token() {
    expect_new_text(
        "class C { void M() { return 0[||]; } }",
        127,
        "int M() { return 0; }",
    );
}

#[test]
fn span_outside_any_method_proposes_nothing() {
    assert_eq!(run_fix("[|class|] C { }", 127), None);
}

#[test]
fn bare_return_proposes_nothing() {
    assert_eq!(run_fix("class C { void M() { [|return|]; } }", 127), None);
}

#[test]
fn trivia_around_the_return_type_survives_byte_for_byte() {
    let marked = "class C {\n    public /* note */ void  M() { return [|0|]; } // tail\n}";
    let proposal = run_fix(marked, 127).expect("expected a fix proposal");
    assert_eq!(proposal.new_text, "public /* note */ int  M() { return 0; }");
    assert_eq!(
        proposal.original_text,
        "public /* note */ void  M() { return 0; }"
    );
}

#[test]
fn proposal_replaces_exactly_the_method_span() {
    let (source, span) = strip_markers("class C { void M() { return [|0|]; } }");
    let tree = parse_source(&source);
    let model = SemanticModel::bind(&tree, &TYPES);
    let ctx = FixContext {
        tree: &tree,
        oracle: &model,
        facts: &CsFacts,
        diagnostic: Diagnostic::new(127, span),
        cancel: CancellationToken::new(),
    };
    let proposal = compute_fix(&ctx).unwrap().unwrap();

    assert_eq!(proposal.span.text(&source), proposal.original_text);
    let mut patched = source.clone();
    patched.replace_range(
        proposal.span.start as usize..proposal.span.end as usize,
        &proposal.new_text,
    );
    assert_eq!(patched, "class C { int M() { return 0; } }");
}

#[test]
fn cancellation_aborts_instead_of_declining() {
    let (source, span) = strip_markers("class C { void M() { return [|0|]; } }");
    let tree = parse_source(&source);
    let model = SemanticModel::bind(&tree, &TYPES);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let ctx = FixContext {
        tree: &tree,
        oracle: &model,
        facts: &CsFacts,
        diagnostic: Diagnostic::new(127, span),
        cancel,
    };
    assert_eq!(compute_fix(&ctx), Err(Cancelled));
}

#[test]
fn proposal_serializes_in_camel_case() {
    let proposal = run_fix("class C { void M() { return [|0|]; } }", 127).unwrap();
    let json = serde_json::to_value(&proposal).unwrap();
    assert_eq!(json["fixName"], "fixReturnType");
    assert_eq!(json["newText"], "int M() { return 0; }");
    assert_eq!(json["description"], "Change return type to 'int'");
    assert!(json["span"]["start"].is_number());
}
