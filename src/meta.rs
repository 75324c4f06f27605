// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! Ordered identifier→string metadata maps.

use indexmap::IndexMap;

use crate::error::{EntityKind, LangError};
use crate::ident::check_identifier;

/// Mutable, order-preserving builder for a [`Meta`] map.
#[derive(Clone, Debug, Default)]
pub struct MetaBuilder {
    entries: IndexMap<String, String>,
}

impl MetaBuilder {
    pub fn new() -> Self { Self::default() }

    /// Adds `key => value`, validating `key` as an identifier.
    ///
    /// Returns [`LangError::DuplicateName`] if `key` was already added.
    pub fn add_entry(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, LangError> {
        let key = key.into();
        check_identifier(&key)?;
        if self.entries.contains_key(&key) {
            return Err(LangError::DuplicateName(EntityKind::MetaKey, key));
        }
        self.entries.insert(key, value.into());
        Ok(self)
    }

    pub fn build(self) -> Meta { Meta(self.entries) }
}

/// Immutable, order-preserving identifier→string map.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Meta(IndexMap<String, String>);

impl Meta {
    pub fn empty() -> Self { Meta(IndexMap::new()) }

    pub fn get(&self, key: &str) -> Option<&str> { self.0.get(key).map(String::as_str) }

    pub fn contains_key(&self, key: &str) -> bool { self.0.contains_key(key) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'a> IntoIterator for &'a Meta {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter { Box::new(self.iter()) }
}
