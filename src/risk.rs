// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! CIA risk flags attached to an attack step.

/// Confidentiality / Integrity / Availability impact flags.
///
/// Encoded in JSON as an array containing the subset of
/// `"confidentiality"`, `"integrity"`, `"availability"` that are set, always
/// in that fixed order regardless of how the document listed them (see
/// `spec.md` §4.1).
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct Risk {
    pub confidentiality: bool,
    pub integrity: bool,
    pub availability: bool,
}

impl Risk {
    pub const NONE: Risk = Risk { confidentiality: false, integrity: false, availability: false };

    pub fn new(confidentiality: bool, integrity: bool, availability: bool) -> Self {
        Risk { confidentiality, integrity, availability }
    }

    /// The canonical `[C, I, A]`-ordered list of set tags.
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::with_capacity(3);
        if self.confidentiality {
            tags.push("confidentiality");
        }
        if self.integrity {
            tags.push("integrity");
        }
        if self.availability {
            tags.push("availability");
        }
        tags
    }

    /// Parses the array-of-tags JSON encoding, accepting any order and
    /// tolerating duplicates.
    pub fn from_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Self {
        let mut risk = Risk::NONE;
        for tag in tags {
            match tag {
                "confidentiality" => risk.confidentiality = true,
                "integrity" => risk.integrity = true,
                "availability" => risk.availability = true,
                _ => {}
            }
        }
        risk
    }
}
