//! Reading and updating the `ComicInfo.xml` entry of `.cbz` archives.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::ArchiveError;

/// Name of the metadata entry inside a comic archive.
pub const COMICINFO_ENTRY: &str = "ComicInfo.xml";

/// Whether the archive at `path` already holds a `ComicInfo.xml` entry.
pub fn has_comicinfo(path: &Path) -> Result<bool, ArchiveError> {
    let archive = ZipArchive::new(File::open(path)?)?;
    Ok(archive.index_for_name(COMICINFO_ENTRY).is_some())
}

/// Read the embedded `ComicInfo.xml`, if present.
pub fn read_comicinfo(path: &Path) -> Result<Option<String>, ArchiveError> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let mut entry = match archive.by_name(COMICINFO_ENTRY) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut contents = String::new();
    entry.read_to_string(&mut contents)?;
    Ok(Some(contents))
}

/// Read the `Web` element of the embedded record: the catalog page the
/// archive was tagged from.
pub fn read_web_url(path: &Path) -> Result<Option<String>, ArchiveError> {
    match read_comicinfo(path)? {
        Some(xml) => web_url_from_xml(&xml),
        None => Ok(None),
    }
}

/// Extract the text of the top-level `Web` element from a ComicInfo document.
pub fn web_url_from_xml(xml: &str) -> Result<Option<String>, ArchiveError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut in_web = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                depth += 1;
                in_web = depth == 2 && e.name().as_ref() == b"Web";
            }
            Event::Text(ref e) => {
                if in_web {
                    let text = e.unescape()?.into_owned();
                    return Ok(Some(text).filter(|t| !t.is_empty()));
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                in_web = false;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(None)
}

/// Append `xml` as `ComicInfo.xml` to the archive at `path`.
///
/// Archives that already carry an entry are left untouched and an
/// [`ArchiveError::AlreadyTagged`] is returned.
pub fn embed_comicinfo(path: &Path, xml: &str) -> Result<(), ArchiveError> {
    if has_comicinfo(path)? {
        return Err(ArchiveError::AlreadyTagged(COMICINFO_ENTRY.to_string()));
    }

    let file = OpenOptions::new().read(true).write(true).open(path)?;
    let mut writer = ZipWriter::new_append(file)?;
    writer.start_file(COMICINFO_ENTRY, SimpleFileOptions::default())?;
    writer.write_all(xml.as_bytes())?;
    writer.finish()?;

    log::debug!("Embedded {COMICINFO_ENTRY} into {}", path.display());
    Ok(())
}

#[cfg(test)]
#[path = "tests/archive_tests.rs"]
mod tests;
