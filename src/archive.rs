// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! `.mar` zip archive codec (`spec.md` §4.7).
//!
//! The archive wraps `langspec.json` together with per-asset icon bytes and
//! optional `LICENSE`/`NOTICE` text, none of which the JSON schema itself
//! carries (`spec.md` §6). Reading and writing a stream is synchronous and
//! does not keep the stream alive beyond the call (`spec.md` §5).

use std::io::{Read, Seek, Write};

use log::{debug, trace, warn};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::LangError;
use crate::ident::is_identifier;
use crate::json;

const LANGSPEC_ENTRY: &str = "langspec.json";
const ICONS_DIR: &str = "icons/";
const LICENSE_ENTRY: &str = "LICENSE";
const NOTICE_ENTRY: &str = "NOTICE";

/// Reads a `.mar` archive from `reader`, producing a fully resolved [`crate::model::Lang`].
///
/// Unknown zip entries are ignored. A missing `langspec.json` entry is
/// fatal ([`LangError::ArchiveMissingLangSpec`]). An icon entry whose base
/// name is not a valid identifier is ignored rather than rejected, since it
/// cannot correspond to any asset.
pub fn read<R: Read + Seek>(reader: R) -> Result<crate::model::Lang, LangError> {
    let mut zip = ZipArchive::new(reader)?;

    let mut langspec: Option<String> = None;
    let mut svg_icons: std::collections::HashMap<String, Vec<u8>> = std::collections::HashMap::new();
    let mut png_icons: std::collections::HashMap<String, Vec<u8>> = std::collections::HashMap::new();
    let mut license: Option<String> = None;
    let mut notice: Option<String> = None;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let name = entry.name().to_string();
        trace!("archive entry: {name}");

        if name == LANGSPEC_ENTRY {
            let mut buf = String::new();
            entry.read_to_string(&mut buf)?;
            langspec = Some(buf);
        } else if let Some(rest) = name.strip_prefix(ICONS_DIR) {
            if let Some(asset_name) = rest.strip_suffix(".svg") {
                if is_identifier(asset_name) {
                    let mut buf = Vec::new();
                    entry.read_to_end(&mut buf)?;
                    svg_icons.insert(asset_name.to_string(), buf);
                } else {
                    warn!("ignoring icon entry with non-identifier name: {name}");
                }
            } else if let Some(asset_name) = rest.strip_suffix(".png") {
                if is_identifier(asset_name) {
                    let mut buf = Vec::new();
                    entry.read_to_end(&mut buf)?;
                    png_icons.insert(asset_name.to_string(), buf);
                } else {
                    warn!("ignoring icon entry with non-identifier name: {name}");
                }
            }
        } else if name == LICENSE_ENTRY {
            let mut buf = String::new();
            entry.read_to_string(&mut buf)?;
            license = Some(buf);
        } else if name == NOTICE_ENTRY {
            let mut buf = String::new();
            entry.read_to_string(&mut buf)?;
            notice = Some(buf);
        }
    }

    let langspec = langspec.ok_or(LangError::ArchiveMissingLangSpec)?;
    let mut builder = json::from_value(&serde_json::from_str(&langspec).map_err(|e| {
        LangError::SchemaViolation("$".to_string(), e.to_string())
    })?)?;

    for asset in builder.assets.iter_mut() {
        if let Some(bytes) = svg_icons.remove(&asset.name) {
            asset.set_svg_icon(bytes);
        }
        if let Some(bytes) = png_icons.remove(&asset.name) {
            asset.set_png_icon(bytes);
        }
    }
    if let Some(license) = license {
        builder.set_license(license);
    }
    if let Some(notice) = notice {
        builder.set_notice(notice);
    }

    debug!("read archive: {} unmatched svg icon(s), {} unmatched png icon(s)", svg_icons.len(), png_icons.len());
    builder.build()
}

/// Writes `lang` to `writer` as a `.mar` archive: `langspec.json`, an
/// `icons/` directory entry, each asset's *local* icon bytes, then
/// `LICENSE`/`NOTICE` if present (`spec.md` §4.7).
pub fn write<W: Write + Seek>(lang: &crate::model::Lang, writer: W) -> Result<(), LangError> {
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file(LANGSPEC_ENTRY, options)?;
    zip.write_all(json::to_string_pretty(lang)?.as_bytes())?;

    zip.add_directory(ICONS_DIR, options)?;
    for asset in lang.assets() {
        if let Some(bytes) = asset.local_svg_icon() {
            zip.start_file(format!("{ICONS_DIR}{}.svg", asset.name()), options)?;
            zip.write_all(bytes)?;
        }
        if let Some(bytes) = asset.local_png_icon() {
            zip.start_file(format!("{ICONS_DIR}{}.png", asset.name()), options)?;
            zip.write_all(bytes)?;
        }
    }

    if let Some(license) = lang.license() {
        zip.start_file(LICENSE_ENTRY, options)?;
        zip.write_all(license.as_bytes())?;
    }
    if let Some(notice) = lang.notice() {
        zip.start_file(NOTICE_ENTRY, options)?;
        zip.write_all(notice.as_bytes())?;
    }

    zip.finish()?;
    debug!("wrote archive: {} asset(s)", lang.assets().len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::builder::{AssetBuilder, CategoryBuilder, LangBuilder};

    fn sample_lang() -> crate::model::Lang {
        let mut b = LangBuilder::new();
        b.add_define("id", "org.example.lang").unwrap();
        b.add_define("version", "1.0.0").unwrap();
        b.add_category(CategoryBuilder::new("Network").unwrap()).unwrap();
        let mut host = AssetBuilder::new("Host", "Network").unwrap();
        host.set_svg_icon(b"<svg/>".to_vec());
        b.add_asset(host).unwrap();
        b.set_license("Apache-2.0".to_string());
        b.build().unwrap()
    }

    #[test]
    fn round_trips_langspec_and_icon() {
        let lang = sample_lang();
        let mut buf = Cursor::new(Vec::new());
        write(&lang, &mut buf).unwrap();

        buf.set_position(0);
        let read_back = read(buf).unwrap();
        let asset = read_back.get_asset("Host").unwrap();
        assert_eq!(asset.local_svg_icon(), Some(b"<svg/>".as_slice()));
        assert_eq!(read_back.license(), Some("Apache-2.0"));
    }

    #[test]
    fn missing_langspec_entry_is_fatal() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buf);
            zip.start_file("NOTICE", FileOptions::default()).unwrap();
            zip.write_all(b"hello").unwrap();
            zip.finish().unwrap();
        }
        buf.set_position(0);
        let err = read(buf).unwrap_err();
        assert!(matches!(err, LangError::ArchiveMissingLangSpec));
    }

    #[test]
    fn icon_with_non_identifier_name_is_ignored() {
        let lang = sample_lang();
        let mut buf = Cursor::new(Vec::new());
        write(&lang, &mut buf).unwrap();

        // Append a bogus icon entry directly, bypassing the writer.
        buf.set_position(0);
        let mut archive = ZipArchive::new(buf).unwrap();
        let mut rewritten = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut rewritten);
            for i in 0..archive.len() {
                zip.raw_copy_file(archive.by_index(i).unwrap()).unwrap();
            }
            zip.start_file("icons/not-an-identifier.svg", FileOptions::default()).unwrap();
            zip.write_all(b"<svg/>").unwrap();
            zip.finish().unwrap();
        }

        rewritten.set_position(0);
        let read_back = read(rewritten).unwrap();
        assert_eq!(read_back.assets().len(), 1);
    }
}
