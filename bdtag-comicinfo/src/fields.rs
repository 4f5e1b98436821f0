//! Field-to-element mapping for ComicInfo documents.
//!
//! Each record type has an explicit table listing every one of its fields in
//! document order. A field's element name is its snake_case name turned into
//! PascalCase unless the table carries an override. Fields marked
//! [`Mapping::Excluded`] feed other fields earlier in the pipeline but are
//! never written.

use std::borrow::Cow;

use bdtag_core::{AlbumRecord, ContributorRole, Page};

/// A value ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i32),
    Long(i64),
    Decimal(f64),
    Bool(bool),
    /// Repeated child elements, each an item named `element` whose own
    /// fields become attributes.
    Items {
        element: &'static str,
        items: Vec<Vec<Field>>,
    },
}

impl Value {
    fn text(s: &str) -> Self {
        Self::Text(s.to_string())
    }

    /// Lexical form used in element content and attribute values.
    pub fn lexical(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Int(n) => Cow::Owned(n.to_string()),
            Self::Long(n) => Cow::Owned(n.to_string()),
            Self::Decimal(d) => Cow::Owned(format!("{d:.1}")),
            Self::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Self::Items { .. } => Cow::Borrowed(""),
        }
    }
}

/// A named value, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub element: Cow<'static, str>,
    pub value: Value,
}

/// How a record field reaches the document.
pub enum Mapping<T> {
    Element(fn(&T) -> Value),
    Excluded,
}

/// One row of a mapping table.
pub struct FieldSpec<T> {
    /// Field name, snake_case.
    pub name: &'static str,
    /// Element name used instead of the PascalCase default.
    pub rename: Option<&'static str>,
    pub mapping: Mapping<T>,
}

impl<T> FieldSpec<T> {
    const fn element(name: &'static str, get: fn(&T) -> Value) -> Self {
        Self {
            name,
            rename: None,
            mapping: Mapping::Element(get),
        }
    }

    const fn renamed(name: &'static str, rename: &'static str, get: fn(&T) -> Value) -> Self {
        Self {
            name,
            rename: Some(rename),
            mapping: Mapping::Element(get),
        }
    }

    const fn excluded(name: &'static str) -> Self {
        Self {
            name,
            rename: None,
            mapping: Mapping::Excluded,
        }
    }

    pub fn element_name(&self) -> Cow<'static, str> {
        match self.rename {
            Some(rename) => Cow::Borrowed(rename),
            None => Cow::Owned(to_pascal_case(self.name)),
        }
    }
}

/// `"alternate_series"` becomes `"AlternateSeries"`. Each segment is
/// capitalized with the rest lowercased; an empty segment becomes `_`.
pub fn to_pascal_case(name: &str) -> String {
    name.split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => "_".to_string(),
            }
        })
        .collect()
}

/// Evaluate a mapping table against `record`, skipping excluded fields.
pub fn collect_fields<T>(table: &[FieldSpec<T>], record: &T) -> Vec<Field> {
    table
        .iter()
        .filter_map(|spec| match spec.mapping {
            Mapping::Element(get) => Some(Field {
                element: spec.element_name(),
                value: get(record),
            }),
            Mapping::Excluded => None,
        })
        .collect()
}

/// Every [`AlbumRecord`] field, in ComicInfo order.
pub static ALBUM_FIELDS: &[FieldSpec<AlbumRecord>] = &[
    FieldSpec::excluded("url"),
    FieldSpec::element("title", |r: &AlbumRecord| Value::text(&r.title)),
    FieldSpec::element("series", |r: &AlbumRecord| Value::text(&r.series)),
    FieldSpec::element("number", |r: &AlbumRecord| Value::text(&r.number)),
    FieldSpec::element("count", |r: &AlbumRecord| Value::Int(r.count)),
    FieldSpec::element("volume", |r: &AlbumRecord| Value::Int(r.volume)),
    FieldSpec::element("alternate_series", |r: &AlbumRecord| Value::text(&r.alternate_series)),
    FieldSpec::element("alternate_number", |r: &AlbumRecord| Value::text(&r.alternate_number)),
    FieldSpec::element("alternate_count", |r: &AlbumRecord| Value::Int(r.alternate_count)),
    FieldSpec::element("summary", |r: &AlbumRecord| Value::text(&r.summary)),
    FieldSpec::element("notes", |r: &AlbumRecord| Value::text(&r.notes)),
    FieldSpec::element("year", |r: &AlbumRecord| Value::Int(r.year)),
    FieldSpec::element("month", |r: &AlbumRecord| Value::Int(r.month)),
    FieldSpec::element("day", |r: &AlbumRecord| Value::Int(r.day)),
    FieldSpec::excluded("writers"),
    FieldSpec::excluded("pencillers"),
    FieldSpec::excluded("inkers"),
    FieldSpec::excluded("colorists"),
    FieldSpec::excluded("letterers"),
    FieldSpec::excluded("cover_artists"),
    FieldSpec::excluded("editors"),
    FieldSpec::element("writer", |r: &AlbumRecord| Value::Text(r.credits(ContributorRole::Writer))),
    FieldSpec::element("penciller", |r: &AlbumRecord| Value::Text(r.credits(ContributorRole::Penciller))),
    FieldSpec::element("inker", |r: &AlbumRecord| Value::Text(r.credits(ContributorRole::Inker))),
    FieldSpec::element("colorist", |r: &AlbumRecord| Value::Text(r.credits(ContributorRole::Colorist))),
    FieldSpec::element("letterer", |r: &AlbumRecord| Value::Text(r.credits(ContributorRole::Letterer))),
    FieldSpec::element("cover_artist", |r: &AlbumRecord| Value::Text(r.credits(ContributorRole::CoverArtist))),
    FieldSpec::element("editor", |r: &AlbumRecord| Value::Text(r.credits(ContributorRole::Editor))),
    FieldSpec::element("publisher", |r: &AlbumRecord| Value::text(&r.publisher)),
    FieldSpec::element("imprint", |r: &AlbumRecord| Value::text(&r.imprint)),
    FieldSpec::element("genre", |r: &AlbumRecord| Value::text(&r.genre)),
    FieldSpec::element("web", |r: &AlbumRecord| Value::text(&r.web)),
    FieldSpec::element("page_count", |r: &AlbumRecord| Value::Int(r.page_count)),
    FieldSpec::renamed("language_iso", "LanguageISO", |r: &AlbumRecord| Value::text(&r.language_iso)),
    FieldSpec::element("format", |r: &AlbumRecord| Value::text(&r.format)),
    FieldSpec::element("black_and_white", |r: &AlbumRecord| Value::text(r.black_and_white.as_str())),
    FieldSpec::element("manga", |r: &AlbumRecord| Value::text(r.manga.as_str())),
    FieldSpec::element("characters", |r: &AlbumRecord| Value::text(&r.characters)),
    FieldSpec::element("teams", |r: &AlbumRecord| Value::text(&r.teams)),
    FieldSpec::element("locations", |r: &AlbumRecord| Value::text(&r.locations)),
    FieldSpec::element("scan_information", |r: &AlbumRecord| Value::text(&r.scan_information)),
    FieldSpec::element("story_arc", |r: &AlbumRecord| Value::text(&r.story_arc)),
    FieldSpec::element("series_group", |r: &AlbumRecord| Value::text(&r.series_group)),
    FieldSpec::element("age_rating", |r: &AlbumRecord| Value::text(r.age_rating.as_str())),
    FieldSpec::element("pages", |r: &AlbumRecord| Value::Items {
        element: "Page",
        items: r.pages.iter().map(|p| collect_fields(PAGE_FIELDS, p)).collect(),
    }),
    FieldSpec::element("community_rating", |r: &AlbumRecord| Value::Decimal(r.community_rating)),
    FieldSpec::element("main_character_or_team", |r: &AlbumRecord| Value::text(&r.main_character_or_team)),
    FieldSpec::element("review", |r: &AlbumRecord| Value::text(&r.review)),
    FieldSpec::excluded("collection"),
    FieldSpec::excluded("isbn"),
    FieldSpec::excluded("barcode"),
];

/// Every [`Page`] field, written as attributes of a `Page` element.
pub static PAGE_FIELDS: &[FieldSpec<Page>] = &[
    FieldSpec::element("image", |p: &Page| Value::Int(p.image)),
    FieldSpec::element("type", |p: &Page| Value::text(p.page_type.as_str())),
    FieldSpec::element("double_page", |p: &Page| Value::Bool(p.double_page)),
    FieldSpec::element("image_size", |p: &Page| Value::Long(p.image_size)),
    FieldSpec::element("key", |p: &Page| Value::text(&p.key)),
    FieldSpec::element("bookmark", |p: &Page| Value::text(&p.bookmark)),
    FieldSpec::element("image_width", |p: &Page| Value::Int(p.image_width)),
    FieldSpec::element("image_height", |p: &Page| Value::Int(p.image_height)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("title"), "Title");
        assert_eq!(to_pascal_case("alternate_series"), "AlternateSeries");
        assert_eq!(to_pascal_case("language_iso"), "LanguageIso");
        assert_eq!(to_pascal_case("_private"), "_Private");
    }

    #[test]
    fn test_only_language_is_renamed() {
        let renamed: Vec<_> = ALBUM_FIELDS
            .iter()
            .filter_map(|spec| spec.rename.map(|r| (spec.name, r)))
            .collect();
        assert_eq!(renamed, vec![("language_iso", "LanguageISO")]);
    }

    #[test]
    fn test_excluded_fields_are_not_collected() {
        let mut record = AlbumRecord::new("https://example.org/album");
        record.isbn = "978-2-205-05575-2".to_string();
        let fields = collect_fields(ALBUM_FIELDS, &record);
        let names: Vec<&str> = fields.iter().map(|f| f.element.as_ref()).collect();

        assert!(!names.contains(&"Url"));
        assert!(!names.contains(&"Isbn"));
        assert!(!names.contains(&"Writers"));
        assert!(names.contains(&"Writer"));
        assert_eq!(names.first(), Some(&"Title"));
        assert_eq!(names.last(), Some(&"Review"));
    }

    #[test]
    fn test_web_mirrors_source_url() {
        let record = AlbumRecord::new("https://example.org/album");
        let fields = collect_fields(ALBUM_FIELDS, &record);
        let web = fields.iter().find(|f| f.element == "Web").unwrap();
        assert_eq!(web.value, Value::Text("https://example.org/album".to_string()));
    }

    #[test]
    fn test_page_fields() {
        let mut page = Page::new(3);
        page.double_page = true;
        let fields = collect_fields(PAGE_FIELDS, &page);
        let pairs: Vec<(String, String)> = fields
            .iter()
            .map(|f| (f.element.to_string(), f.value.lexical().into_owned()))
            .collect();

        assert_eq!(pairs[0], ("Image".to_string(), "3".to_string()));
        assert_eq!(pairs[1], ("Type".to_string(), "Story".to_string()));
        assert_eq!(pairs[2], ("DoublePage".to_string(), "true".to_string()));
        assert_eq!(pairs[7], ("ImageHeight".to_string(), "-1".to_string()));
    }

    #[test]
    fn test_decimal_lexical_form() {
        assert_eq!(Value::Decimal(0.0).lexical(), "0.0");
        assert_eq!(Value::Decimal(4.3).lexical(), "4.3");
        assert_eq!(Value::Decimal(3.96).lexical(), "4.0");
    }
}
