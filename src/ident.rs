// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! Identifier validation.
//!
//! Every name in a Lang — category, asset, field, association, attack step,
//! variable, meta key, tag, defines key, TTC distribution name — is an
//! [`Identifier`]: a nonempty string matching `^[A-Za-z_][A-Za-z0-9_]*$`.

use std::fmt;
use std::ops::Deref;

use crate::error::LangError;

/// Returns `true` if `s` is a well-formed identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates `s` as an identifier, raising [`LangError::InvalidIdentifier`]
/// on failure.
pub fn check_identifier(s: &str) -> Result<(), LangError> {
    if is_identifier(s) {
        Ok(())
    } else {
        Err(LangError::InvalidIdentifier(s.to_owned()))
    }
}

/// A validated, nonempty, `^[A-Za-z_][A-Za-z0-9_]*$` name.
///
/// Constructing an `Identifier` always goes through [`Identifier::new`],
/// which is the only fallible entry point; once constructed the value is
/// known-good for the lifetime of the program.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Result<Self, LangError> {
        let s = s.into();
        check_identifier(&s)?;
        Ok(Identifier(s))
    }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn into_string(self) -> String { self.0 }
}

impl Deref for Identifier {
    type Target = str;
    fn deref(&self) -> &str { &self.0 }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str { &self.0 }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool { self.0 == other }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool { self.0 == *other }
}
