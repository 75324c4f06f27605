// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! The top-level by-name builder.
//!
//! `LangBuilder` only ever collects unresolved, by-name descriptions; it
//! never touches an arena index. [`LangBuilder::build`] is the single
//! atomic transition into the immutable [`crate::model::Lang`] graph — it
//! either returns a fully validated model or a typed error, never a partial
//! one (`spec.md` §9).

use crate::builder::association::AssociationBuilder;
use crate::builder::asset::AssetBuilder;
use crate::builder::category::CategoryBuilder;
use crate::error::{EntityKind, LangError};
use crate::meta::MetaBuilder;
use crate::model::Lang;

#[derive(Clone, Debug, Default)]
pub struct LangBuilder {
    pub(crate) defines: MetaBuilder,
    pub(crate) categories: Vec<CategoryBuilder>,
    pub(crate) assets: Vec<AssetBuilder>,
    pub(crate) associations: Vec<AssociationBuilder>,
    pub(crate) license: Option<String>,
    pub(crate) notice: Option<String>,
}

impl LangBuilder {
    pub fn new() -> Self { Self::default() }

    /// Sets a `defines` entry. `id` and `version` are required to be
    /// present by the time [`Self::build`] is called.
    pub fn add_define(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<&mut Self, LangError> {
        self.defines.add_entry(key, value)?;
        Ok(self)
    }

    pub fn add_category(&mut self, category: CategoryBuilder) -> Result<&mut Self, LangError> {
        if self.categories.iter().any(|c| c.name() == category.name()) {
            return Err(LangError::DuplicateName(EntityKind::Category, category.name().to_string()));
        }
        self.categories.push(category);
        Ok(self)
    }

    pub fn add_asset(&mut self, asset: AssetBuilder) -> Result<&mut Self, LangError> {
        if self.assets.iter().any(|a| a.name() == asset.name()) {
            return Err(LangError::DuplicateName(EntityKind::Asset, asset.name().to_string()));
        }
        self.assets.push(asset);
        Ok(self)
    }

    pub fn add_association(&mut self, association: AssociationBuilder) -> &mut Self {
        self.associations.push(association);
        self
    }

    pub fn set_license(&mut self, text: impl Into<String>) -> &mut Self {
        self.license = Some(text.into());
        self
    }

    pub fn set_notice(&mut self, text: impl Into<String>) -> &mut Self {
        self.notice = Some(text.into());
        self
    }

    /// Consumes the builder, producing a fully linked, immutable [`Lang`].
    /// On failure the caller's builder data is simply dropped; nothing
    /// about this call mutates shared state.
    pub fn build(self) -> Result<Lang, LangError> { crate::resolver::resolve(self) }
}
