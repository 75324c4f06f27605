// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! By-name attack-step builder.

use crate::error::LangError;
use crate::ident::check_identifier;
use crate::meta::{Meta, MetaBuilder};
use crate::model::entities::AttackStepType;
use crate::risk::Risk;
use crate::stepexpr::StepExprBuilder;
use crate::ttc::TtcExprBuilder;

/// A `requires` or `reaches` list, still by-name.
#[derive(Clone, Debug, Default)]
pub struct StepsGroupBuilder {
    pub(crate) overrides: bool,
    pub(crate) expressions: Vec<StepExprBuilder>,
}

impl StepsGroupBuilder {
    pub fn new(overrides: bool) -> Self { StepsGroupBuilder { overrides, expressions: Vec::new() } }

    pub fn push(&mut self, expr: StepExprBuilder) -> &mut Self {
        self.expressions.push(expr);
        self
    }
}

#[derive(Clone, Debug)]
pub struct AttackStepBuilder {
    pub(crate) name: String,
    pub(crate) meta: MetaBuilder,
    pub(crate) ty: AttackStepType,
    pub(crate) tags: Vec<String>,
    pub(crate) risk: Option<Risk>,
    pub(crate) ttc: Option<TtcExprBuilder>,
    pub(crate) requires: Option<StepsGroupBuilder>,
    pub(crate) reaches: Option<StepsGroupBuilder>,
}

impl AttackStepBuilder {
    pub fn new(name: impl Into<String>, ty: AttackStepType) -> Result<Self, LangError> {
        let name = name.into();
        check_identifier(&name)?;
        Ok(AttackStepBuilder {
            name,
            meta: MetaBuilder::new(),
            ty,
            tags: Vec::new(),
            risk: None,
            ttc: None,
            requires: None,
            reaches: None,
        })
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn add_meta(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<&mut Self, LangError> {
        self.meta.add_entry(key, value)?;
        Ok(self)
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) -> Result<&mut Self, LangError> {
        let tag = tag.into();
        check_identifier(&tag)?;
        self.tags.push(tag);
        Ok(self)
    }

    pub fn set_risk(&mut self, risk: Risk) -> &mut Self {
        self.risk = Some(risk);
        self
    }

    pub fn set_ttc(&mut self, ttc: TtcExprBuilder) -> &mut Self {
        self.ttc = Some(ttc);
        self
    }

    pub fn set_requires(&mut self, requires: StepsGroupBuilder) -> &mut Self {
        self.requires = Some(requires);
        self
    }

    pub fn set_reaches(&mut self, reaches: StepsGroupBuilder) -> &mut Self {
        self.reaches = Some(reaches);
        self
    }

    pub(crate) fn build_meta(&self) -> Meta { self.meta.clone().build() }
}
