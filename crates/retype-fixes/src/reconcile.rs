//! Type reconciliation: compute the repair target for a mismatched return.
//!
//! The general rule is "least-derived compatible ancestor": scan the
//! declared type's lineage from most specific to least specific and take the
//! first entry the actual type's lineage also contains, by interned identity.
//! Landing on the root object type means the two types share no meaningful
//! structure, so the actual type itself wins (unless it cannot be named in a
//! signature). Void and async-void declarations skip the scan entirely and
//! promote to the actual type.

use retype_common::{CancellationToken, Cancelled};
use retype_oracle::{TypeId, TypeOracle, TypeTag};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

/// Reconcile `declared` against `actual`, returning the repair target or
/// `None` when reconciliation is a no-op.
pub fn reconcile<O: TypeOracle>(
    oracle: &O,
    declared: TypeId,
    actual: TypeId,
    method_is_async: bool,
    cancel: &CancellationToken,
) -> Result<Option<TypeId>, Cancelled> {
    let target = if is_valueless(oracle, declared, method_is_async) {
        promote(oracle, actual, method_is_async)
    } else {
        match (method_is_async, oracle.task_arg(declared)) {
            // An async method returns its value through the wrapper, so
            // reconcile the wrapped argument against the actual and rewrap.
            // Scanning the wrapper type itself would demote the signature to
            // a bare value type, which is illegal on an async method.
            (true, Some(arg)) => oracle.task_of(scan_target(oracle, arg, actual, cancel)?),
            _ => scan_target(oracle, declared, actual, cancel)?,
        }
    };

    if target == declared {
        debug!("reconciliation target equals the declared type");
        return Ok(None);
    }
    Ok(Some(target))
}

/// The least-derived-compatible-ancestor scan over value types.
fn scan_target<O: TypeOracle>(
    oracle: &O,
    declared: TypeId,
    actual: TypeId,
    cancel: &CancellationToken,
) -> Result<TypeId, Cancelled> {
    let mut memo = LineageMemo::new(oracle, cancel);
    Ok(match memo.common_ancestor(declared, actual)? {
        Some(shared) if oracle.tag(shared) != TypeTag::RootObject => shared,
        // Only object in common: no meaningful relationship, so the
        // actual type itself is the better target.
        _ => nameable(oracle, actual),
    })
}

/// Whether the declaration promises no value: `void`, or the bare
/// asynchronous wrapper on an async method.
fn is_valueless<O: TypeOracle>(oracle: &O, declared: TypeId, method_is_async: bool) -> bool {
    oracle.tag(declared) == TypeTag::Void || (method_is_async && oracle.is_plain_task(declared))
}

/// The promotion target for a valueless declaration: the actual type, put
/// inside the asynchronous wrapper when the method is async.
fn promote<O: TypeOracle>(oracle: &O, actual: TypeId, method_is_async: bool) -> TypeId {
    let value = nameable(oracle, actual);
    if method_is_async {
        oracle.task_of(value)
    } else {
        value
    }
}

/// Anonymous types cannot appear in a signature; the root object type is
/// the safe spelling for them.
fn nameable<O: TypeOracle>(oracle: &O, ty: TypeId) -> TypeId {
    if oracle.tag(ty) == TypeTag::Anonymous {
        TypeId::OBJECT
    } else {
        ty
    }
}

/// Per-invocation lineage cache. Never reused across invocations: the
/// oracle is a snapshot and a later invocation may see a different one.
struct LineageMemo<'a, O: TypeOracle> {
    oracle: &'a O,
    cancel: &'a CancellationToken,
    chains: FxHashMap<TypeId, Vec<TypeId>>,
    interfaces: FxHashMap<TypeId, Vec<TypeId>>,
}

impl<'a, O: TypeOracle> LineageMemo<'a, O> {
    fn new(oracle: &'a O, cancel: &'a CancellationToken) -> LineageMemo<'a, O> {
        LineageMemo {
            oracle,
            cancel,
            chains: FxHashMap::default(),
            interfaces: FxHashMap::default(),
        }
    }

    fn chain(&mut self, ty: TypeId) -> Result<&[TypeId], Cancelled> {
        self.cancel.check()?;
        let oracle = self.oracle;
        Ok(self
            .chains
            .entry(ty)
            .or_insert_with(|| oracle.base_types_and_self(ty)))
    }

    fn all_interfaces(&mut self, ty: TypeId) -> Result<&[TypeId], Cancelled> {
        self.cancel.check()?;
        let oracle = self.oracle;
        Ok(self
            .interfaces
            .entry(ty)
            .or_insert_with(|| oracle.all_interfaces(ty)))
    }

    /// The declared-side candidate lineage: base chain then interfaces,
    /// most specific first, with the value-type root excluded (it is never
    /// a legal return-type target).
    fn candidates(&mut self, declared: TypeId) -> Result<Vec<TypeId>, Cancelled> {
        let chain = self.chain(declared)?.to_vec();
        let mut candidates: Vec<TypeId> = chain
            .into_iter()
            .filter(|ty| self.oracle.tag(*ty) != TypeTag::ValueTypeRoot)
            .collect();
        let interfaces = self.all_interfaces(declared)?.to_vec();
        candidates.extend(interfaces);
        Ok(candidates)
    }

    fn common_ancestor(
        &mut self,
        declared: TypeId,
        actual: TypeId,
    ) -> Result<Option<TypeId>, Cancelled> {
        let candidates = self.candidates(declared)?;

        let mut actual_lineage: FxHashSet<TypeId> =
            self.chain(actual)?.iter().copied().collect();
        actual_lineage.extend(self.all_interfaces(actual)?.iter().copied());

        for candidate in &candidates {
            trace!(?candidate, "lineage scan");
            if actual_lineage.contains(candidate) {
                return Ok(Some(*candidate));
            }
        }

        // No shared entry in the chains proper. A candidate may still
        // relate to the actual type through one of its own direct
        // interfaces.
        let actual_interfaces: FxHashSet<TypeId> =
            self.all_interfaces(actual)?.iter().copied().collect();
        for candidate in &candidates {
            self.cancel.check()?;
            for iface in self.oracle.direct_interfaces(*candidate) {
                if actual_interfaces.contains(&iface) {
                    return Ok(Some(iface));
                }
            }
        }

        Ok(None)
    }
}
