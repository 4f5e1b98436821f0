//! ComicInfo.xml serialization for album records.
//!
//! [`to_xml`] maps an [`AlbumRecord`] through the field table in [`fields`],
//! writes it under a `ComicInfo` root and validates the result against the
//! schema table in [`schema`]. A document that fails validation is never
//! returned.

pub mod error;
pub mod fields;
pub mod schema;
pub mod writer;

pub use error::ComicInfoError;
pub use schema::{Violation, validate};

use bdtag_core::AlbumRecord;

/// Serialize and validate `record`.
pub fn to_xml(record: &AlbumRecord) -> Result<String, ComicInfoError> {
    let fields = fields::collect_fields(fields::ALBUM_FIELDS, record);
    let xml = writer::write_document(schema::ROOT_ELEMENT, &fields)?;

    if let Err(e) = schema::validate(&xml) {
        log::debug!("Rejected ComicInfo for {record}:\n{xml}");
        return Err(e);
    }
    Ok(xml)
}

#[cfg(test)]
#[path = "tests/comicinfo_tests.rs"]
mod tests;
