// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! Stable arena indices.
//!
//! `Lang` is the sole owner of every entity; everything else refers to
//! entities by one of these newtype indices rather than by shared pointers
//! (design note in `spec.md` §9).

macro_rules! arena_id {
    ($name:ident) => {
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize { self.0 as usize }
        }
    };
}

arena_id!(CategoryId);
arena_id!(AssetId);
arena_id!(FieldId);
arena_id!(AssocId);
arena_id!(VariableId);
arena_id!(AttackStepId);
