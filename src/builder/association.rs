// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! By-name association builder.
//!
//! An association names two endpoints, each a `(asset, field, multiplicity)`
//! triple; the resolver creates the two [`crate::model::Field`]s and
//! cross-links them (`spec.md` §3).

use crate::error::LangError;
use crate::ident::check_identifier;
use crate::meta::{Meta, MetaBuilder};
use crate::multiplicity::Multiplicity;

#[derive(Clone, Debug)]
pub struct AssociationBuilder {
    pub(crate) name: String,
    pub(crate) meta: MetaBuilder,
    pub(crate) left_asset: String,
    pub(crate) left_field: String,
    pub(crate) left_mult: Multiplicity,
    pub(crate) right_asset: String,
    pub(crate) right_field: String,
    pub(crate) right_mult: Multiplicity,
}

impl AssociationBuilder {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        left_asset: impl Into<String>,
        left_field: impl Into<String>,
        left_mult: Multiplicity,
        right_asset: impl Into<String>,
        right_field: impl Into<String>,
        right_mult: Multiplicity,
    ) -> Result<Self, LangError> {
        let name = name.into();
        check_identifier(&name)?;
        let left_asset = left_asset.into();
        check_identifier(&left_asset)?;
        let left_field = left_field.into();
        check_identifier(&left_field)?;
        let right_asset = right_asset.into();
        check_identifier(&right_asset)?;
        let right_field = right_field.into();
        check_identifier(&right_field)?;

        Ok(AssociationBuilder {
            name,
            meta: MetaBuilder::new(),
            left_asset,
            left_field,
            left_mult,
            right_asset,
            right_field,
            right_mult,
        })
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn add_meta(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<&mut Self, LangError> {
        self.meta.add_entry(key, value)?;
        Ok(self)
    }

    pub(crate) fn build_meta(&self) -> Meta { self.meta.clone().build() }
}
