// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! The immutable, finalized object graph.

pub mod entities;
pub mod lang;

pub use entities::{Asset, Association, AttackStep, AttackStepType, Category, Field, StepsGroup, Variable};
pub use lang::Lang;
