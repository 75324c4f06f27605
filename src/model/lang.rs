// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! The finalized, immutable object graph.
//!
//! `Lang` is the sole owner of every entity (arena storage, `spec.md` §9);
//! everything else refers back to it by [`crate::ids`] index. Inherited
//! lookup (fields, variables, attack steps, icons, and the tag/risk/ttc and
//! requires/reaches override-or-extend semantics of §4.4) lives here rather
//! than on the entities themselves, computed on demand by walking the
//! super-asset chain — nothing about it is baked in at build time, so asset
//! declaration order never matters for these queries.

use std::collections::HashMap;

use crate::ids::{AssetId, AssocId, AttackStepId, CategoryId, FieldId, VariableId};
use crate::meta::Meta;
use crate::model::entities::{Asset, Association, AttackStep, Category, Field, StepsGroup, Variable};
use crate::risk::Risk;
use crate::stepexpr::AssetTyping;
use crate::ttc::TtcExpr;

/// The fully linked, immutable threat-modeling language descriptor.
#[derive(Clone, Debug)]
pub struct Lang {
    pub(crate) defines: Meta,
    pub(crate) categories: Vec<Category>,
    pub(crate) assets: Vec<Asset>,
    pub(crate) fields: Vec<Field>,
    pub(crate) associations: Vec<Association>,
    pub(crate) variables: Vec<Variable>,
    pub(crate) attack_steps: Vec<AttackStep>,
    pub(crate) license: Option<String>,
    pub(crate) notice: Option<String>,

    pub(crate) category_by_name: HashMap<String, CategoryId>,
    pub(crate) asset_by_name: HashMap<String, AssetId>,

    /// Names declared for each asset's *local* variables, taken from the
    /// builder before any variable body is typed. Consulted only by the
    /// resolver, to tell "not yet resolved" (a [`crate::error::LangError::VariableCycle`])
    /// apart from "does not exist" (an [`crate::error::LangError::UnknownReference`])
    /// while `variables` is still being populated incrementally.
    pub(crate) declared_variables: HashMap<AssetId, Vec<String>>,
}

impl Lang {
    pub fn defines(&self) -> &Meta { &self.defines }

    pub fn license(&self) -> Option<&str> { self.license.as_deref() }

    pub fn notice(&self) -> Option<&str> { self.notice.as_deref() }

    pub fn categories(&self) -> &[Category] { &self.categories }

    pub fn assets(&self) -> &[Asset] { &self.assets }

    pub fn associations(&self) -> &[Association] { &self.associations }

    pub fn category(&self, id: CategoryId) -> &Category { &self.categories[id.index()] }

    pub fn asset(&self, id: AssetId) -> &Asset { &self.assets[id.index()] }

    pub fn field(&self, id: FieldId) -> &Field { &self.fields[id.index()] }

    pub fn association(&self, id: AssocId) -> &Association { &self.associations[id.index()] }

    pub fn variable(&self, id: VariableId) -> &Variable { &self.variables[id.index()] }

    pub fn attack_step(&self, id: AttackStepId) -> &AttackStep { &self.attack_steps[id.index()] }

    pub fn get_category(&self, name: &str) -> Option<&Category> {
        self.category_by_name.get(name).map(|id| self.category(*id))
    }

    pub fn get_asset(&self, name: &str) -> Option<&Asset> {
        self.asset_by_name.get(name).map(|id| self.asset(*id))
    }

    pub fn get_asset_id(&self, name: &str) -> Option<AssetId> { self.asset_by_name.get(name).copied() }

    /// The chain `asset, asset.super, asset.super.super, ...` inclusive.
    fn super_chain(&self, asset: AssetId) -> impl Iterator<Item = AssetId> + '_ {
        std::iter::successors(Some(asset), move |a| self.assets[a.index()].super_asset)
    }

    pub fn is_subtype(&self, sub: AssetId, sup: AssetId) -> bool { self.super_chain(sub).any(|a| a == sup) }

    /// Least upper bound: the first ancestor of `a` (walking its chain in
    /// order) that also appears in `b`'s chain (`spec.md` §4.3).
    pub fn lub(&self, a: AssetId, b: AssetId) -> Option<AssetId> {
        let b_chain: Vec<AssetId> = self.super_chain(b).collect();
        self.super_chain(a).find(|x| b_chain.contains(x))
    }

    /// `asset.field(name)`: local if present, else inherited (`spec.md` §3).
    pub fn asset_field(&self, asset: AssetId, name: &str) -> Option<FieldId> {
        self.super_chain(asset)
            .find_map(|a| self.assets[a.index()].fields.iter().find(|f| self.fields[f.index()].name == name).copied())
    }

    /// `asset.variable(name)`: local if present, else inherited. Because
    /// `asset.variables` is populated incrementally during resolution, this
    /// also doubles as the resolver's "resolved so far" lookup.
    pub fn asset_variable(&self, asset: AssetId, name: &str) -> Option<VariableId> {
        self.super_chain(asset).find_map(|a| {
            self.assets[a.index()]
                .variables
                .iter()
                .find(|v| self.variables[v.index()].name == name)
                .copied()
        })
    }

    /// `asset.attackStep(name)`: local if present, else inherited — a local
    /// step overrides an inherited one of the same name (`spec.md` §4.4).
    pub fn asset_attack_step(&self, asset: AssetId, name: &str) -> Option<AttackStepId> {
        self.super_chain(asset).find_map(|a| {
            self.assets[a.index()]
                .attack_steps
                .iter()
                .find(|s| self.attack_steps[s.index()].name == name)
                .copied()
        })
    }

    pub fn asset_svg_icon(&self, asset: AssetId) -> Option<&[u8]> {
        self.super_chain(asset).find_map(|a| self.assets[a.index()].svg_icon.as_deref())
    }

    pub fn asset_png_icon(&self, asset: AssetId) -> Option<&[u8]> {
        self.super_chain(asset).find_map(|a| self.assets[a.index()].png_icon.as_deref())
    }

    /// The attack step of the same name on the nearest proper super-asset,
    /// if any. Used both for the type-match invariant and for tag/risk/ttc
    /// inheritance.
    pub(crate) fn super_step(&self, step: AttackStepId) -> Option<AttackStepId> {
        let owner = self.attack_steps[step.index()].owner;
        let name = &self.attack_steps[step.index()].name;
        let super_owner = self.assets[owner.index()].super_asset?;
        self.asset_attack_step(super_owner, name)
    }

    /// Inheritance-closed tag set (`spec.md` §4.4: "local absence means
    /// inherit").
    pub fn effective_tags(&self, step: AttackStepId) -> Vec<String> {
        let s = &self.attack_steps[step.index()];
        if !s.tags.is_empty() {
            return s.tags.clone();
        }
        self.super_step(step).map(|sup| self.effective_tags(sup)).unwrap_or_default()
    }

    pub fn effective_risk(&self, step: AttackStepId) -> Option<Risk> {
        let s = &self.attack_steps[step.index()];
        s.risk.or_else(|| self.super_step(step).and_then(|sup| self.effective_risk(sup)))
    }

    pub fn effective_ttc(&self, step: AttackStepId) -> Option<&TtcExpr> {
        let s = &self.attack_steps[step.index()];
        s.ttc.as_ref().or_else(|| self.super_step(step).and_then(|sup| self.effective_ttc(sup)))
    }

    pub fn effective_requires(&self, step: AttackStepId) -> Vec<crate::stepexpr::StepExpr> {
        self.effective_steps(step, |s| s.requires.as_ref())
    }

    pub fn effective_reaches(&self, step: AttackStepId) -> Vec<crate::stepexpr::StepExpr> {
        self.effective_steps(step, |s| s.reaches.as_ref())
    }

    fn effective_steps(
        &self,
        step: AttackStepId,
        pick: fn(&AttackStep) -> Option<&StepsGroup>,
    ) -> Vec<crate::stepexpr::StepExpr> {
        let s = &self.attack_steps[step.index()];
        let inherited = self.super_step(step).map(|sup| self.effective_steps(sup, pick)).unwrap_or_default();
        match pick(s) {
            None => inherited,
            Some(group) if group.overrides => group.expressions.clone(),
            Some(group) => {
                let mut combined = inherited;
                combined.extend(group.expressions.clone());
                combined
            }
        }
    }

    /// The transitive union of an asset's local and inherited attack steps,
    /// ordered `(super-order…, local-order…)` with super entries that the
    /// asset overrides removed (`spec.md` §8 property 2).
    pub fn effective_attack_steps(&self, asset: AssetId) -> Vec<AttackStepId> {
        let local = &self.assets[asset.index()].attack_steps;
        let local_names: std::collections::HashSet<&str> =
            local.iter().map(|id| self.attack_steps[id.index()].name.as_str()).collect();

        let mut result = match self.assets[asset.index()].super_asset {
            Some(sup) => self
                .effective_attack_steps(sup)
                .into_iter()
                .filter(|id| !local_names.contains(self.attack_steps[id.index()].name.as_str()))
                .collect(),
            None => Vec::new(),
        };
        result.extend(local.iter().copied());
        result
    }
}

impl AssetTyping for Lang {
    fn asset_name(&self, asset: AssetId) -> &str { &self.assets[asset.index()].name }

    fn find_asset(&self, name: &str) -> Option<AssetId> { self.get_asset_id(name) }

    fn is_subtype(&self, sub: AssetId, sup: AssetId) -> bool { Lang::is_subtype(self, sub, sup) }

    fn lub(&self, a: AssetId, b: AssetId) -> Option<AssetId> { Lang::lub(self, a, b) }

    fn find_field(&self, asset: AssetId, name: &str) -> Option<FieldId> { self.asset_field(asset, name) }

    fn field_target_asset(&self, field: FieldId) -> AssetId { self.fields[self.field(field).target_field().index()].owner }

    fn find_attack_step(&self, asset: AssetId, name: &str) -> Option<AttackStepId> {
        self.asset_attack_step(asset, name)
    }

    fn variable_declared(&self, asset: AssetId, name: &str) -> bool {
        self.super_chain(asset).any(|a| {
            self.declared_variables.get(&a).map(|names| names.iter().any(|n| n == name)).unwrap_or(false)
        })
    }

    fn variable_target(&self, asset: AssetId, name: &str) -> Option<AssetId> {
        self.asset_variable(asset, name).map(|v| self.variables[v.index()].target_asset())
    }
}
