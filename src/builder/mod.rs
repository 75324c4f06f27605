// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! Mutable, by-name builders.
//!
//! A separate world from the immutable model (`spec.md` §9): builders only
//! collect unresolved-by-name descriptions and validate what they can
//! eagerly (identifiers, local duplicate names). Everything that requires
//! the rest of the graph — super-asset links, step-expression typing,
//! override/merge — is the resolver's job.

pub mod asset;
pub mod association;
pub mod attack_step;
pub mod category;
pub mod lang;

pub use asset::{AssetBuilder, VariableBuilder};
pub use association::AssociationBuilder;
pub use attack_step::{AttackStepBuilder, StepsGroupBuilder};
pub use category::CategoryBuilder;
pub use lang::LangBuilder;
