// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// Written in 2024 by the mal-langspec contributors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! Crate-wide error type.
//!
//! Every failure mode named in the design — builder-time identifier
//! rejection, resolver-time semantic errors, JSON schema violations and
//! archive I/O problems — surfaces as a variant of [`LangError`]. A failed
//! [`crate::builder::LangBuilder::build`] never returns a partial graph.

use std::fmt;

/// The kind of entity a [`LangError::DuplicateName`] or
/// [`LangError::UnknownReference`] refers to.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[non_exhaustive]
pub enum EntityKind {
    Category,
    Asset,
    Association,
    Field,
    Variable,
    AttackStep,
    Distribution,
    MetaKey,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Category => "category",
            EntityKind::Asset => "asset",
            EntityKind::Association => "association",
            EntityKind::Field => "field",
            EntityKind::Variable => "variable",
            EntityKind::AttackStep => "attack step",
            EntityKind::Distribution => "distribution",
            EntityKind::MetaKey => "meta key",
        };
        f.write_str(s)
    }
}

/// Every error this crate can raise.
#[derive(Debug, Display, Error, From)]
#[display(doc_comments)]
pub enum LangError {
    /// invalid identifier `{0}`
    InvalidIdentifier(String),

    /// duplicate {0} named `{1}`
    DuplicateName(EntityKind, String),

    /// unresolved reference to {0} named `{1}`
    UnknownReference(EntityKind, String),

    /// cycle detected in the super-asset chain: {0}
    SuperAssetCycle(String),

    /// variable `{1}` on asset `{0}` cannot be resolved: it depends on a
    /// variable whose type is not yet known
    VariableCycle(String, String),

    /// no common super-asset exists between `{0}` and `{1}`
    NoCommonSuperAsset(String, String),

    /// `{0}` is not a subtype of `{1}`
    IncompatibleSubType(String, String),

    /// transitive() requires its inner expression's source and target asset
    /// to be identical
    TransitiveNonUniform,

    /// attack step `{0}` does not match the type declared by its super-step
    StepTypeMismatch(String),

    /// `requires` is only permitted on exist/notExist attack steps (found on
    /// `{0}`)
    RequiresOnNonExistenceStep(String),

    /// reaches element on `{0}` does not terminate in an attackStep(...) node
    ReachesNotTerminal(String),

    /// attackStep(...) node may only appear within a requires/reaches list
    /// (encountered while typing asset `{0}`)
    AttackStepOutsideStepsList(String),

    /// invalid arguments for distribution `{0}`
    InvalidDistributionArguments(String),

    /// schema violation at `{0}`: {1}
    SchemaViolation(String, String),

    /// archive does not contain a `langspec.json` entry
    ArchiveMissingLangSpec,

    #[from]
    #[display(inner)]
    Io(std::io::Error),

    #[cfg(feature = "archive")]
    #[from]
    #[display(inner)]
    Zip(zip::result::ZipError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LangError>;
