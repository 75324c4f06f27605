// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! `.mar` archive round-trip with icon bytes and license/notice text,
//! carried outside the `langspec.json` schema itself.

use std::io::Cursor;

use langspec::builder::{AssetBuilder, CategoryBuilder, LangBuilder};
use langspec::{archive, Lang};

fn lang_with_icon_and_license() -> Lang {
    let mut b = LangBuilder::new();
    b.add_define("id", "org.example.archive").unwrap();
    b.add_define("version", "1.0.0").unwrap();
    b.add_category(CategoryBuilder::new("Network").unwrap()).unwrap();

    let mut host = AssetBuilder::new("Host", "Network").unwrap();
    host.set_svg_icon(b"0123456789".to_vec());
    b.add_asset(host).unwrap();

    b.set_license("Apache-2.0");
    b.set_notice("Copyright Example Corp");
    b.build().unwrap()
}

#[test]
fn archive_round_trip_preserves_icon_and_license_outside_schema() {
    let lang = lang_with_icon_and_license();

    let mut buf = Cursor::new(Vec::new());
    archive::write(&lang, &mut buf).unwrap();
    buf.set_position(0);

    let read_back = archive::read(buf).unwrap();
    let host = read_back.get_asset("Host").unwrap();
    assert_eq!(host.local_svg_icon(), Some(b"0123456789".as_slice()));
    assert_eq!(read_back.license(), Some("Apache-2.0"));
    assert_eq!(read_back.notice(), Some("Copyright Example Corp"));

    // Neither the icon bytes nor the license/notice text are present in the
    // embedded langspec.json document itself.
    let langspec_text = langspec::json::to_string_pretty(&read_back).unwrap();
    assert!(!langspec_text.contains("0123456789"));
    assert!(!langspec_text.contains("Apache-2.0"));
    assert!(!langspec_text.contains("license"));
}

#[test]
fn archive_without_icons_or_license_round_trips_empty() {
    let mut b = LangBuilder::new();
    b.add_define("id", "org.example.archive.bare").unwrap();
    b.add_define("version", "1.0.0").unwrap();
    b.add_category(CategoryBuilder::new("Network").unwrap()).unwrap();
    b.add_asset(AssetBuilder::new("Host", "Network").unwrap()).unwrap();
    let lang = b.build().unwrap();

    let mut buf = Cursor::new(Vec::new());
    archive::write(&lang, &mut buf).unwrap();
    buf.set_position(0);

    let read_back = archive::read(buf).unwrap();
    assert_eq!(read_back.get_asset("Host").unwrap().local_svg_icon(), None);
    assert_eq!(read_back.license(), None);
    assert_eq!(read_back.notice(), None);
}
