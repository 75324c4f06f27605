// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! By-name asset builder.

use crate::builder::attack_step::AttackStepBuilder;
use crate::error::{EntityKind, LangError};
use crate::ident::check_identifier;
use crate::meta::{Meta, MetaBuilder};
use crate::stepexpr::StepExprBuilder;

#[derive(Clone, Debug)]
pub struct VariableBuilder {
    pub(crate) name: String,
    pub(crate) expr: StepExprBuilder,
}

#[derive(Clone, Debug)]
pub struct AssetBuilder {
    pub(crate) name: String,
    pub(crate) meta: MetaBuilder,
    pub(crate) category: String,
    pub(crate) is_abstract: bool,
    pub(crate) super_asset: Option<String>,
    pub(crate) variables: Vec<VariableBuilder>,
    pub(crate) attack_steps: Vec<AttackStepBuilder>,
    pub(crate) svg_icon: Option<Vec<u8>>,
    pub(crate) png_icon: Option<Vec<u8>>,
}

impl AssetBuilder {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Result<Self, LangError> {
        let name = name.into();
        check_identifier(&name)?;
        let category = category.into();
        check_identifier(&category)?;
        Ok(AssetBuilder {
            name,
            meta: MetaBuilder::new(),
            category,
            is_abstract: false,
            super_asset: None,
            variables: Vec::new(),
            attack_steps: Vec::new(),
            svg_icon: None,
            png_icon: None,
        })
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn category(&self) -> &str { &self.category }

    pub fn add_meta(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<&mut Self, LangError> {
        self.meta.add_entry(key, value)?;
        Ok(self)
    }

    pub fn set_abstract(&mut self, is_abstract: bool) -> &mut Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn set_super_asset(&mut self, name: impl Into<String>) -> Result<&mut Self, LangError> {
        let name = name.into();
        check_identifier(&name)?;
        self.super_asset = Some(name);
        Ok(self)
    }

    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        expr: StepExprBuilder,
    ) -> Result<&mut Self, LangError> {
        let name = name.into();
        check_identifier(&name)?;
        if self.variables.iter().any(|v| v.name == name) {
            return Err(LangError::DuplicateName(EntityKind::Variable, name));
        }
        self.variables.push(VariableBuilder { name, expr });
        Ok(self)
    }

    pub fn add_attack_step(&mut self, step: AttackStepBuilder) -> Result<&mut Self, LangError> {
        if self.attack_steps.iter().any(|s| s.name == step.name) {
            return Err(LangError::DuplicateName(EntityKind::AttackStep, step.name));
        }
        self.attack_steps.push(step);
        Ok(self)
    }

    pub fn set_svg_icon(&mut self, bytes: Vec<u8>) -> &mut Self {
        self.svg_icon = Some(bytes);
        self
    }

    pub fn set_png_icon(&mut self, bytes: Vec<u8>) -> &mut Self {
        self.png_icon = Some(bytes);
        self
    }

    pub(crate) fn build_meta(&self) -> Meta { self.meta.clone().build() }
}
