// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! By-name category builder.

use crate::error::LangError;
use crate::ident::check_identifier;
use crate::meta::{Meta, MetaBuilder};

#[derive(Clone, Debug)]
pub struct CategoryBuilder {
    pub(crate) name: String,
    pub(crate) meta: MetaBuilder,
}

impl CategoryBuilder {
    pub fn new(name: impl Into<String>) -> Result<Self, LangError> {
        let name = name.into();
        check_identifier(&name)?;
        Ok(CategoryBuilder { name, meta: MetaBuilder::new() })
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn add_meta(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<&mut Self, LangError> {
        self.meta.add_entry(key, value)?;
        Ok(self)
    }

    pub(crate) fn build_meta(&self) -> Meta { self.meta.clone().build() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_name() {
        assert!(CategoryBuilder::new("1bad").is_err());
    }

    #[test]
    fn accepts_meta() {
        let mut b = CategoryBuilder::new("Net").unwrap();
        b.add_meta("owner", "security-team").unwrap();
        assert_eq!(b.build_meta().get("owner"), Some("security-team"));
    }
}
