// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! Step-expression algebra and its type checker.
//!
//! A step expression navigates from a source asset to a target asset along
//! fields, sub-type restrictions, transitive closures and set combinators,
//! optionally terminating at an attack step. [`StepExprBuilder`] is the
//! by-name tree a builder collects; [`type_step_expr`] compiles it against
//! an in-progress or finalized asset graph into a typed [`StepExpr`], via
//! the [`AssetTyping`] trait rather than a concrete dependency on the
//! resolver or the immutable model — both implement it.

use crate::error::{EntityKind, LangError};
use crate::ids::{AssetId, AttackStepId, FieldId};

/// Asset-graph queries the step-expression type checker needs. Implemented
/// both by the resolver's in-progress state and by the finalized [`crate::model::Lang`].
pub trait AssetTyping {
    fn asset_name(&self, asset: AssetId) -> &str;

    fn find_asset(&self, name: &str) -> Option<AssetId>;

    /// `true` if `sub` is `sup` or a transitive sub-asset of `sup`.
    fn is_subtype(&self, sub: AssetId, sup: AssetId) -> bool;

    /// Least upper bound per `spec.md` §4.3: walks `a`'s super-chain in
    /// order and returns the first ancestor also found in `b`'s chain.
    fn lub(&self, a: AssetId, b: AssetId) -> Option<AssetId>;

    fn find_field(&self, asset: AssetId, name: &str) -> Option<FieldId>;

    fn field_target_asset(&self, field: FieldId) -> AssetId;

    fn find_attack_step(&self, asset: AssetId, name: &str) -> Option<AttackStepId>;

    /// Whether a variable named `name` is declared anywhere on `asset`'s
    /// super-chain, regardless of whether it has been resolved yet.
    fn variable_declared(&self, asset: AssetId, name: &str) -> bool;

    /// The resolved target asset of a variable declared on `asset`'s chain,
    /// if it has already been built. `None` means "declared but not yet
    /// resolved" when combined with `variable_declared` returning `true`.
    fn variable_target(&self, asset: AssetId, name: &str) -> Option<AssetId>;
}

/// A resolved, fully typed step expression.
#[derive(Clone, Debug, PartialEq)]
pub enum StepExpr {
    Union { lhs: Box<StepExpr>, rhs: Box<StepExpr>, source: AssetId, target: AssetId },
    Intersection { lhs: Box<StepExpr>, rhs: Box<StepExpr>, source: AssetId, target: AssetId },
    Difference { lhs: Box<StepExpr>, rhs: Box<StepExpr>, source: AssetId, target: AssetId },
    Collect { lhs: Box<StepExpr>, rhs: Box<StepExpr>, source: AssetId, target: AssetId },
    Transitive { inner: Box<StepExpr>, source: AssetId, target: AssetId },
    SubType { inner: Box<StepExpr>, source: AssetId, target: AssetId },
    Field { field: FieldId, source: AssetId, target: AssetId },
    AttackStep { step: AttackStepId, source: AssetId },
    Variable { name: String, source: AssetId, target: AssetId },
}

impl StepExpr {
    pub fn source_asset(&self) -> AssetId {
        use StepExpr::*;
        match self {
            Union { source, .. }
            | Intersection { source, .. }
            | Difference { source, .. }
            | Collect { source, .. }
            | Transitive { source, .. }
            | SubType { source, .. }
            | Field { source, .. }
            | AttackStep { source, .. }
            | Variable { source, .. } => *source,
        }
    }

    pub fn target_asset(&self) -> AssetId {
        use StepExpr::*;
        match self {
            Union { target, .. }
            | Intersection { target, .. }
            | Difference { target, .. }
            | Collect { target, .. }
            | Transitive { target, .. }
            | SubType { target, .. }
            | Field { target, .. }
            | Variable { target, .. } => *target,
            // An attackStep(...) node's target is its source: it terminates
            // navigation rather than continuing it.
            AttackStep { source, .. } => *source,
        }
    }

    /// The attack step this expression terminates at, following through a
    /// trailing `collect(..., attackStep(n))` chain. Used to validate that
    /// every `reaches` element resolves to a concrete step (`spec.md` §4.5
    /// step 6).
    pub fn terminal_attack_step(&self) -> Option<AttackStepId> {
        match self {
            StepExpr::AttackStep { step, .. } => Some(*step),
            StepExpr::Collect { rhs, .. } => rhs.terminal_attack_step(),
            _ => None,
        }
    }
}

/// By-name, unresolved step-expression tree collected by a builder.
#[derive(Clone, Debug, PartialEq)]
pub enum StepExprBuilder {
    Union(Box<StepExprBuilder>, Box<StepExprBuilder>),
    Intersection(Box<StepExprBuilder>, Box<StepExprBuilder>),
    Difference(Box<StepExprBuilder>, Box<StepExprBuilder>),
    Collect(Box<StepExprBuilder>, Box<StepExprBuilder>),
    Transitive(Box<StepExprBuilder>),
    SubType(String, Box<StepExprBuilder>),
    Field(String),
    AttackStep(String),
    Variable(String),
}

impl StepExprBuilder {
    pub fn union(lhs: Self, rhs: Self) -> Self { StepExprBuilder::Union(Box::new(lhs), Box::new(rhs)) }

    pub fn intersection(lhs: Self, rhs: Self) -> Self {
        StepExprBuilder::Intersection(Box::new(lhs), Box::new(rhs))
    }

    pub fn difference(lhs: Self, rhs: Self) -> Self {
        StepExprBuilder::Difference(Box::new(lhs), Box::new(rhs))
    }

    pub fn collect(lhs: Self, rhs: Self) -> Self {
        StepExprBuilder::Collect(Box::new(lhs), Box::new(rhs))
    }

    pub fn transitive(inner: Self) -> Self { StepExprBuilder::Transitive(Box::new(inner)) }

    pub fn sub_type(type_name: impl Into<String>, inner: Self) -> Self {
        StepExprBuilder::SubType(type_name.into(), Box::new(inner))
    }

    pub fn field(name: impl Into<String>) -> Self { StepExprBuilder::Field(name.into()) }

    pub fn attack_step(name: impl Into<String>) -> Self { StepExprBuilder::AttackStep(name.into()) }

    pub fn variable(name: impl Into<String>) -> Self { StepExprBuilder::Variable(name.into()) }
}

/// Types a by-name step-expression tree against `graph`, rooted at
/// `source`.
///
/// `allow_attack_step` gates whether an `attackStep(...)` node may appear
/// anywhere in this tree: `true` when typing a top-level element of a
/// `requires`/`reaches` list, `false` when typing a variable's body (an
/// attack step reference is never meaningful there).
pub fn type_step_expr<G: AssetTyping + ?Sized>(
    graph: &G,
    builder: &StepExprBuilder,
    source: AssetId,
    allow_attack_step: bool,
) -> Result<StepExpr, LangError> {
    use StepExprBuilder as B;

    Ok(match builder {
        B::Union(lhs, rhs) => {
            let lhs = type_step_expr(graph, lhs, source, false)?;
            let rhs = type_step_expr(graph, rhs, source, false)?;
            let target = lub_or_err(graph, &lhs, &rhs)?;
            StepExpr::Union { lhs: Box::new(lhs), rhs: Box::new(rhs), source, target }
        }
        B::Intersection(lhs, rhs) => {
            let lhs = type_step_expr(graph, lhs, source, false)?;
            let rhs = type_step_expr(graph, rhs, source, false)?;
            let target = lub_or_err(graph, &lhs, &rhs)?;
            StepExpr::Intersection { lhs: Box::new(lhs), rhs: Box::new(rhs), source, target }
        }
        B::Difference(lhs, rhs) => {
            let lhs = type_step_expr(graph, lhs, source, false)?;
            let rhs = type_step_expr(graph, rhs, source, false)?;
            let target = lub_or_err(graph, &lhs, &rhs)?;
            StepExpr::Difference { lhs: Box::new(lhs), rhs: Box::new(rhs), source, target }
        }
        B::Collect(lhs, rhs) => {
            let lhs = type_step_expr(graph, lhs, source, false)?;
            let rhs = type_step_expr(graph, rhs, lhs.target_asset(), allow_attack_step)?;
            let target = rhs.target_asset();
            StepExpr::Collect { lhs: Box::new(lhs), rhs: Box::new(rhs), source, target }
        }
        B::Transitive(inner) => {
            let inner = type_step_expr(graph, inner, source, false)?;
            if inner.source_asset() != inner.target_asset() {
                return Err(LangError::TransitiveNonUniform);
            }
            let source = inner.source_asset();
            let target = inner.target_asset();
            StepExpr::Transitive { inner: Box::new(inner), source, target }
        }
        B::SubType(type_name, inner) => {
            let inner = type_step_expr(graph, inner, source, false)?;
            let target = graph
                .find_asset(type_name)
                .ok_or_else(|| LangError::UnknownReference(EntityKind::Asset, type_name.clone()))?;
            if !graph.is_subtype(target, inner.target_asset()) {
                return Err(LangError::IncompatibleSubType(
                    type_name.clone(),
                    graph.asset_name(inner.target_asset()).to_string(),
                ));
            }
            StepExpr::SubType { inner: Box::new(inner), source, target }
        }
        B::Field(name) => {
            let field = graph
                .find_field(source, name)
                .ok_or_else(|| LangError::UnknownReference(EntityKind::Field, name.clone()))?;
            let target = graph.field_target_asset(field);
            StepExpr::Field { field, source, target }
        }
        B::AttackStep(name) => {
            if !allow_attack_step {
                return Err(LangError::AttackStepOutsideStepsList(graph.asset_name(source).to_string()));
            }
            let step = graph
                .find_attack_step(source, name)
                .ok_or_else(|| LangError::UnknownReference(EntityKind::AttackStep, name.clone()))?;
            StepExpr::AttackStep { step, source }
        }
        B::Variable(name) => {
            if !graph.variable_declared(source, name) {
                return Err(LangError::UnknownReference(EntityKind::Variable, name.clone()));
            }
            let target = graph.variable_target(source, name).ok_or_else(|| {
                LangError::VariableCycle(graph.asset_name(source).to_string(), name.clone())
            })?;
            StepExpr::Variable { name: name.clone(), source, target }
        }
    })
}

fn lub_or_err<G: AssetTyping + ?Sized>(graph: &G, lhs: &StepExpr, rhs: &StepExpr) -> Result<AssetId, LangError> {
    graph.lub(lhs.target_asset(), rhs.target_asset()).ok_or_else(|| {
        LangError::NoCommonSuperAsset(
            graph.asset_name(lhs.target_asset()).to_string(),
            graph.asset_name(rhs.target_asset()).to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// A tiny fake asset graph: `Base <- Mid <- Leaf`, each with one field
    /// `self` pointing back to `Base`, used to exercise the type checker
    /// without a full resolver.
    struct FakeGraph {
        names: Vec<&'static str>,
        supers: Vec<Option<AssetId>>,
        fields: HashMap<(AssetId, &'static str), (FieldId, AssetId)>,
        steps: HashMap<(AssetId, &'static str), AttackStepId>,
        variables: HashMap<(AssetId, &'static str), Option<AssetId>>,
    }

    impl AssetTyping for FakeGraph {
        fn asset_name(&self, asset: AssetId) -> &str { self.names[asset.index()] }

        fn find_asset(&self, name: &str) -> Option<AssetId> {
            self.names.iter().position(|n| *n == name).map(|i| AssetId(i as u32))
        }

        fn is_subtype(&self, sub: AssetId, sup: AssetId) -> bool {
            let mut cur = Some(sub);
            while let Some(a) = cur {
                if a == sup {
                    return true;
                }
                cur = self.supers[a.index()];
            }
            false
        }

        fn lub(&self, a: AssetId, b: AssetId) -> Option<AssetId> {
            let mut b_chain = vec![];
            let mut cur = Some(b);
            while let Some(x) = cur {
                b_chain.push(x);
                cur = self.supers[x.index()];
            }
            let mut cur = Some(a);
            while let Some(x) = cur {
                if b_chain.contains(&x) {
                    return Some(x);
                }
                cur = self.supers[x.index()];
            }
            None
        }

        fn find_field(&self, asset: AssetId, name: &str) -> Option<FieldId> {
            self.fields.get(&(asset, name)).map(|(f, _)| *f)
        }

        fn field_target_asset(&self, field: FieldId) -> AssetId {
            self.fields.values().find(|(f, _)| *f == field).unwrap().1
        }

        fn find_attack_step(&self, asset: AssetId, name: &str) -> Option<AttackStepId> {
            self.steps.get(&(asset, name)).copied()
        }

        fn variable_declared(&self, asset: AssetId, name: &str) -> bool {
            self.variables.contains_key(&(asset, name))
        }

        fn variable_target(&self, asset: AssetId, name: &str) -> Option<AssetId> {
            self.variables.get(&(asset, name)).copied().flatten()
        }
    }

    fn fake_graph() -> (FakeGraph, AssetId, AssetId, AssetId) {
        let base = AssetId(0);
        let mid = AssetId(1);
        let leaf = AssetId(2);
        let mut fields = HashMap::new();
        fields.insert((base, "self"), (FieldId(0), base));
        let mut steps = HashMap::new();
        steps.insert((base, "compromise"), AttackStepId(0));
        let graph = FakeGraph {
            names: vec!["Base", "Mid", "Leaf"],
            supers: vec![None, Some(base), Some(mid)],
            fields,
            steps,
            variables: HashMap::new(),
        };
        (graph, base, mid, leaf)
    }

    #[test]
    fn field_types_to_target_asset() {
        let (graph, base, _mid, _leaf) = fake_graph();
        let expr = type_step_expr(&graph, &StepExprBuilder::field("self"), base, false).unwrap();
        assert_eq!(expr.source_asset(), base);
        assert_eq!(expr.target_asset(), base);
    }

    #[test]
    fn attack_step_rejected_outside_steps_list() {
        let (graph, base, _mid, _leaf) = fake_graph();
        let err = type_step_expr(&graph, &StepExprBuilder::attack_step("compromise"), base, false).unwrap_err();
        assert!(matches!(err, LangError::AttackStepOutsideStepsList(_)));
    }

    #[test]
    fn attack_step_allowed_as_terminal() {
        let (graph, base, _mid, _leaf) = fake_graph();
        let expr = type_step_expr(&graph, &StepExprBuilder::attack_step("compromise"), base, true).unwrap();
        assert_eq!(expr.terminal_attack_step(), Some(AttackStepId(0)));
    }

    #[test]
    fn collect_propagates_terminal_flag_to_rightmost_only() {
        let (graph, base, _mid, _leaf) = fake_graph();
        let expr = type_step_expr(
            &graph,
            &StepExprBuilder::collect(
                StepExprBuilder::field("self"),
                StepExprBuilder::attack_step("compromise"),
            ),
            base,
            true,
        )
        .unwrap();
        assert_eq!(expr.terminal_attack_step(), Some(AttackStepId(0)));
    }

    #[test]
    fn transitive_requires_uniform_source_and_target() {
        let (graph, base, _mid, _leaf) = fake_graph();
        let expr = type_step_expr(&graph, &StepExprBuilder::transitive(StepExprBuilder::field("self")), base, false);
        assert!(expr.is_ok());
    }

    #[test]
    fn sub_type_requires_subtype_relation() {
        let (graph, base, _mid, leaf) = fake_graph();
        let _ = leaf;
        let err = type_step_expr(
            &graph,
            &StepExprBuilder::sub_type("Leaf", StepExprBuilder::field("self")),
            base,
            false,
        );
        // self-field targets Base, and Leaf is a subtype of Base, so this succeeds.
        assert!(err.is_ok());
    }

    #[test]
    fn union_without_common_ancestor_fails() {
        let (mut graph, base, _mid, _leaf) = fake_graph();
        // Disconnect an unrelated asset by appending it with no shared ancestor.
        graph.names.push("Other");
        graph.supers.push(None);
        let other = AssetId(3);
        graph.fields.insert((base, "toOther"), (FieldId(1), other));
        let err = type_step_expr(
            &graph,
            &StepExprBuilder::union(StepExprBuilder::field("self"), StepExprBuilder::field("toOther")),
            base,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, LangError::NoCommonSuperAsset(_, _)));
    }

    #[test]
    fn variable_declared_but_unresolved_is_a_cycle() {
        let (mut graph, base, _mid, _leaf) = fake_graph();
        graph.variables.insert((base, "v"), None);
        let err = type_step_expr(&graph, &StepExprBuilder::variable("v"), base, false).unwrap_err();
        assert!(matches!(err, LangError::VariableCycle(_, _)));
    }

    #[test]
    fn unknown_variable_is_unknown_reference() {
        let (graph, base, _mid, _leaf) = fake_graph();
        let err = type_step_expr(&graph, &StepExprBuilder::variable("missing"), base, false).unwrap_err();
        assert!(matches!(err, LangError::UnknownReference(EntityKind::Variable, _)));
    }
}
