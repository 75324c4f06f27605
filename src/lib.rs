// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

#![recursion_limit = "256"]
// Coding conventions
#![deny(non_upper_case_globals, non_camel_case_types, non_snake_case, unused_mut, unused_imports, dead_code)]

//! `mal-langspec`: the in-memory object model, resolver/linker, and
//! bidirectional JSON/archive codec for a MAL-family threat-modeling
//! language descriptor (a "Lang").
//!
//! A Lang is built one of two ways:
//! - Programmatically, through [`builder::LangBuilder`] and its per-entity
//!   builders, finished off by [`builder::LangBuilder::build`].
//! - By parsing a `langspec.json` document ([`json::from_str`]) or a `.mar`
//!   archive ([`archive::read`], with the `archive` feature).
//!
//! Either path produces the same immutable [`model::Lang`] graph: a set of
//! categories, assets (with inheritance, fields, associations, variables
//! and attack steps), step expressions that navigate the asset graph, and
//! time-to-compromise expressions evaluated against a closed distribution
//! catalog.

#[macro_use]
extern crate amplify;

#[cfg(feature = "archive")]
pub mod archive;
pub mod builder;
pub mod error;
pub mod ident;
pub mod ids;
pub mod json;
pub mod meta;
pub mod model;
pub mod multiplicity;
mod resolver;
pub mod risk;
pub mod stepexpr;
pub mod ttc;

pub use builder::LangBuilder;
pub use error::LangError;
pub use model::Lang;
