// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! Plain data held by the [`crate::model::Lang`] arena.
//!
//! Every entity here is the *local* view only: override/merge and
//! inheritance resolution live on `Lang` (`spec.md` §4.4), not baked into
//! these structs, so that building an asset never depends on the
//! declaration order of its super-asset.

use crate::ids::{AssetId, AssocId, CategoryId, FieldId, VariableId};
use crate::meta::Meta;
use crate::multiplicity::Multiplicity;
use crate::risk::Risk;
use crate::stepexpr::StepExpr;
use crate::ttc::TtcExpr;

#[derive(Clone, Debug)]
pub struct Category {
    pub(crate) name: String,
    pub(crate) meta: Meta,
    pub(crate) assets: Vec<AssetId>,
}

impl Category {
    pub fn name(&self) -> &str { &self.name }

    pub fn meta(&self) -> &Meta { &self.meta }

    pub fn assets(&self) -> &[AssetId] { &self.assets }
}

#[derive(Clone, Debug)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) owner: AssetId,
    pub(crate) multiplicity: Multiplicity,
    pub(crate) association: AssocId,
    /// Set once both ends of the owning association exist.
    pub(crate) target_field: Option<FieldId>,
}

impl Field {
    pub fn name(&self) -> &str { &self.name }

    pub fn owner(&self) -> AssetId { self.owner }

    pub fn multiplicity(&self) -> Multiplicity { self.multiplicity }

    pub fn association(&self) -> AssocId { self.association }

    pub fn target_field(&self) -> FieldId {
        self.target_field.expect("target_field set once both association ends are linked")
    }
}

#[derive(Clone, Debug)]
pub struct Association {
    pub(crate) name: String,
    pub(crate) meta: Meta,
    pub(crate) left_field: FieldId,
    pub(crate) right_field: FieldId,
}

impl Association {
    pub fn name(&self) -> &str { &self.name }

    pub fn meta(&self) -> &Meta { &self.meta }

    pub fn left_field(&self) -> FieldId { self.left_field }

    pub fn right_field(&self) -> FieldId { self.right_field }
}

#[derive(Clone, Debug)]
pub struct Variable {
    pub(crate) name: String,
    pub(crate) owner: AssetId,
    pub(crate) expr: StepExpr,
}

impl Variable {
    pub fn name(&self) -> &str { &self.name }

    pub fn owner(&self) -> AssetId { self.owner }

    pub fn expr(&self) -> &StepExpr { &self.expr }

    pub fn target_asset(&self) -> AssetId { self.expr.target_asset() }
}

/// Attack step kind, per `spec.md` §3.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AttackStepType {
    Or,
    And,
    Defense,
    Exist,
    NotExist,
}

impl AttackStepType {
    pub fn is_existence(&self) -> bool {
        matches!(self, AttackStepType::Exist | AttackStepType::NotExist)
    }

    pub fn json_name(&self) -> &'static str {
        match self {
            AttackStepType::Or => "or",
            AttackStepType::And => "and",
            AttackStepType::Defense => "defense",
            AttackStepType::Exist => "exist",
            AttackStepType::NotExist => "notExist",
        }
    }

    pub fn from_json_name(s: &str) -> Option<Self> {
        Some(match s {
            "or" => AttackStepType::Or,
            "and" => AttackStepType::And,
            "defense" => AttackStepType::Defense,
            "exist" => AttackStepType::Exist,
            "notExist" => AttackStepType::NotExist,
            _ => return None,
        })
    }
}

/// A `requires` or `reaches` list: `spec.md` §3 "Steps group".
#[derive(Clone, Debug, Default)]
pub struct StepsGroup {
    pub(crate) overrides: bool,
    pub(crate) expressions: Vec<StepExpr>,
}

impl StepsGroup {
    pub fn overrides(&self) -> bool { self.overrides }

    pub fn expressions(&self) -> &[StepExpr] { &self.expressions }
}

#[derive(Clone, Debug)]
pub struct AttackStep {
    pub(crate) name: String,
    pub(crate) meta: Meta,
    pub(crate) owner: AssetId,
    pub(crate) ty: AttackStepType,
    pub(crate) tags: Vec<String>,
    pub(crate) risk: Option<Risk>,
    pub(crate) ttc: Option<TtcExpr>,
    pub(crate) requires: Option<StepsGroup>,
    pub(crate) reaches: Option<StepsGroup>,
}

impl AttackStep {
    pub fn name(&self) -> &str { &self.name }

    pub fn meta(&self) -> &Meta { &self.meta }

    pub fn owner(&self) -> AssetId { self.owner }

    pub fn ty(&self) -> AttackStepType { self.ty }

    /// Tags declared locally on this step; does not include inherited tags.
    /// Use [`crate::model::Lang::effective_tags`] for the inherited view.
    pub fn local_tags(&self) -> &[String] { &self.tags }

    pub fn local_risk(&self) -> Option<Risk> { self.risk }

    pub fn local_ttc(&self) -> Option<&TtcExpr> { self.ttc.as_ref() }

    pub fn local_requires(&self) -> Option<&StepsGroup> { self.requires.as_ref() }

    pub fn local_reaches(&self) -> Option<&StepsGroup> { self.reaches.as_ref() }
}

#[derive(Clone, Debug)]
pub struct Asset {
    pub(crate) name: String,
    pub(crate) meta: Meta,
    pub(crate) category: CategoryId,
    pub(crate) is_abstract: bool,
    pub(crate) super_asset: Option<AssetId>,
    pub(crate) variables: Vec<VariableId>,
    pub(crate) attack_steps: Vec<crate::ids::AttackStepId>,
    pub(crate) fields: Vec<FieldId>,
    pub(crate) svg_icon: Option<Vec<u8>>,
    pub(crate) png_icon: Option<Vec<u8>>,
}

impl Asset {
    pub fn name(&self) -> &str { &self.name }

    pub fn meta(&self) -> &Meta { &self.meta }

    pub fn category(&self) -> CategoryId { self.category }

    pub fn is_abstract(&self) -> bool { self.is_abstract }

    pub fn super_asset(&self) -> Option<AssetId> { self.super_asset }

    /// Local variables only; see `Lang` for inherited lookup.
    pub fn local_variables(&self) -> &[VariableId] { &self.variables }

    /// Local attack steps only; see `Lang` for inherited lookup and the
    /// effective (inheritance-closed) step set.
    pub fn local_attack_steps(&self) -> &[crate::ids::AttackStepId] { &self.attack_steps }

    /// Local fields only; see `Lang` for inherited lookup.
    pub fn local_fields(&self) -> &[FieldId] { &self.fields }

    pub fn local_svg_icon(&self) -> Option<&[u8]> { self.svg_icon.as_deref() }

    pub fn local_png_icon(&self) -> Option<&[u8]> { self.png_icon.as_deref() }
}
