//! ComicInfo v2.0 schema, as a static rule table, and a validator that checks
//! serialized documents against it.
//!
//! The validator covers what the schema constrains for this document shape:
//! the root element, element names, their order and multiplicity, the
//! lexical type and range of every simple element, and the `Page` items of
//! `Pages` with their attributes.

use std::fmt;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::ComicInfoError;

pub const ROOT_ELEMENT: &str = "ComicInfo";

const YES_NO: &[&str] = &["Unknown", "No", "Yes"];
const MANGA: &[&str] = &["Unknown", "No", "Yes", "YesAndRightToLeft"];
const AGE_RATING: &[&str] = &[
    "Unknown",
    "Adults Only 18+",
    "Early Childhood",
    "Everyone",
    "Everyone 10+",
    "G",
    "Kids to Adults",
    "M",
    "MA15+",
    "Mature 17+",
    "PG",
    "R18+",
    "Rating Pending",
    "Teen",
    "X18+",
];
const PAGE_TYPE: &[&str] = &[
    "FrontCover",
    "InnerCover",
    "Roundup",
    "Story",
    "Advertisement",
    "Editorial",
    "Letters",
    "Preview",
    "BackCover",
    "Other",
    "Deleted",
];

/// Lexical type of an element or attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kind {
    String,
    /// `xs:int` with optional inclusive bounds.
    Int { min: Option<i64>, max: Option<i64> },
    /// `xs:long`.
    Long,
    /// `xs:decimal` with inclusive bounds and a maximum number of fraction digits.
    Decimal { min: f64, max: f64, fraction_digits: usize },
    Boolean,
    Enum(&'static [&'static str]),
    /// Sequence of `Page` elements.
    PageList,
}

const INT: Kind = Kind::Int { min: None, max: None };

/// One child element of the root, in sequence order. All are optional.
#[derive(Debug, Clone, Copy)]
pub struct ElementRule {
    pub name: &'static str,
    pub kind: Kind,
}

const fn rule(name: &'static str, kind: Kind) -> ElementRule {
    ElementRule { name, kind }
}

/// Children of `ComicInfo`, in the order the schema's sequence requires.
pub static COMIC_INFO_ELEMENTS: &[ElementRule] = &[
    rule("Title", Kind::String),
    rule("Series", Kind::String),
    rule("Number", Kind::String),
    rule("Count", INT),
    rule("Volume", INT),
    rule("AlternateSeries", Kind::String),
    rule("AlternateNumber", Kind::String),
    rule("AlternateCount", INT),
    rule("Summary", Kind::String),
    rule("Notes", Kind::String),
    rule("Year", INT),
    rule("Month", Kind::Int { min: Some(-1), max: Some(12) }),
    rule("Day", Kind::Int { min: Some(-1), max: Some(31) }),
    rule("Writer", Kind::String),
    rule("Penciller", Kind::String),
    rule("Inker", Kind::String),
    rule("Colorist", Kind::String),
    rule("Letterer", Kind::String),
    rule("CoverArtist", Kind::String),
    rule("Editor", Kind::String),
    rule("Publisher", Kind::String),
    rule("Imprint", Kind::String),
    rule("Genre", Kind::String),
    rule("Web", Kind::String),
    rule("PageCount", INT),
    rule("LanguageISO", Kind::String),
    rule("Format", Kind::String),
    rule("BlackAndWhite", Kind::Enum(YES_NO)),
    rule("Manga", Kind::Enum(MANGA)),
    rule("Characters", Kind::String),
    rule("Teams", Kind::String),
    rule("Locations", Kind::String),
    rule("ScanInformation", Kind::String),
    rule("StoryArc", Kind::String),
    rule("SeriesGroup", Kind::String),
    rule("AgeRating", Kind::Enum(AGE_RATING)),
    rule("Pages", Kind::PageList),
    rule(
        "CommunityRating",
        Kind::Decimal {
            min: 0.0,
            max: 5.0,
            fraction_digits: 1,
        },
    ),
    rule("MainCharacterOrTeam", Kind::String),
    rule("Review", Kind::String),
];

pub const PAGE_ELEMENT: &str = "Page";

/// An attribute of `Page`.
#[derive(Debug, Clone, Copy)]
pub struct AttributeRule {
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
}

const fn attribute(name: &'static str, kind: Kind, required: bool) -> AttributeRule {
    AttributeRule { name, kind, required }
}

pub static PAGE_ATTRIBUTES: &[AttributeRule] = &[
    attribute("Image", INT, true),
    attribute("Type", Kind::Enum(PAGE_TYPE), false),
    attribute("DoublePage", Kind::Boolean, false),
    attribute("ImageSize", Kind::Long, false),
    attribute("Key", Kind::String, false),
    attribute("Bookmark", Kind::String, false),
    attribute("ImageWidth", INT, false),
    attribute("ImageHeight", INT, false),
];

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Element path, e.g. `ComicInfo/Month` or `ComicInfo/Pages/Page[2]@Image`.
    pub path: String,
    pub message: String,
}

impl Violation {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Check a lexical value against a simple kind.
pub fn check_value(kind: Kind, value: &str) -> Result<(), String> {
    match kind {
        Kind::String | Kind::PageList => Ok(()),
        Kind::Int { min, max } => {
            let n: i32 = value
                .parse()
                .map_err(|_| format!("{value:?} is not a valid int"))?;
            check_bounds(i64::from(n), min, max)
        }
        Kind::Long => value
            .parse::<i64>()
            .map(|_| ())
            .map_err(|_| format!("{value:?} is not a valid long")),
        Kind::Decimal {
            min,
            max,
            fraction_digits,
        } => {
            if !is_decimal_lexical(value) {
                return Err(format!("{value:?} is not a valid decimal"));
            }
            let digits = value.split_once('.').map(|(_, f)| f.len()).unwrap_or(0);
            if digits > fraction_digits {
                return Err(format!("{value:?} has more than {fraction_digits} fraction digit(s)"));
            }
            let d: f64 = value
                .parse()
                .map_err(|_| format!("{value:?} is not a valid decimal"))?;
            if d < min || d > max {
                return Err(format!("{value} is outside {min}..={max}"));
            }
            Ok(())
        }
        Kind::Boolean => match value {
            "true" | "false" | "1" | "0" => Ok(()),
            _ => Err(format!("{value:?} is not a valid boolean")),
        },
        Kind::Enum(allowed) => {
            if allowed.contains(&value) {
                Ok(())
            } else {
                Err(format!("{value:?} is not one of the allowed values"))
            }
        }
    }
}

fn check_bounds(n: i64, min: Option<i64>, max: Option<i64>) -> Result<(), String> {
    if min.is_some_and(|m| n < m) || max.is_some_and(|m| n > m) {
        let lo = min.map(|m| m.to_string()).unwrap_or_default();
        let hi = max.map(|m| m.to_string()).unwrap_or_default();
        return Err(format!("{n} is outside {lo}..={hi}"));
    }
    Ok(())
}

/// `[+-]? digits [. digits]`, with at least one digit overall.
fn is_decimal_lexical(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    !(int_part.is_empty() && frac_part.is_empty())
        && int_part.chars().all(|c| c.is_ascii_digit())
        && frac_part.chars().all(|c| c.is_ascii_digit())
}

/// Where the reader currently is inside the document.
enum Frame {
    /// Inside a simple root child, accumulating its text.
    Simple { rule: ElementRule, text: String },
    /// Inside `Pages`.
    Pages,
    /// Inside a `Page` element.
    Page,
    /// Inside an element already reported as invalid.
    Ignored,
}

struct Validator {
    violations: Vec<Violation>,
    /// Index in `COMIC_INFO_ELEMENTS` of the last root child seen.
    last_index: Option<usize>,
    page_count: usize,
}

impl Validator {
    fn report(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation::new(path, message));
    }

    /// Handle a child of the root; returns the frame to push for it.
    fn open_root_child(&mut self, name: &str) -> Frame {
        let path = format!("{ROOT_ELEMENT}/{name}");
        let Some(index) = COMIC_INFO_ELEMENTS.iter().position(|r| r.name == name) else {
            self.report(path, "unexpected element");
            return Frame::Ignored;
        };

        if let Some(last) = self.last_index {
            if index == last {
                self.report(&path, "element appears more than once");
            } else if index < last {
                let previous = COMIC_INFO_ELEMENTS[last].name;
                self.report(&path, format!("element must come before {previous}"));
            }
        }
        self.last_index = Some(self.last_index.map_or(index, |last| last.max(index)));

        let rule = COMIC_INFO_ELEMENTS[index];
        match rule.kind {
            Kind::PageList => Frame::Pages,
            _ => Frame::Simple {
                rule,
                text: String::new(),
            },
        }
    }

    fn close_simple(&mut self, rule: ElementRule, text: &str) {
        if let Err(message) = check_value(rule.kind, text) {
            self.report(format!("{ROOT_ELEMENT}/{}", rule.name), message);
        }
    }

    fn check_page(&mut self, e: &BytesStart<'_>) -> Result<(), ComicInfoError> {
        self.page_count += 1;
        let path = format!("{ROOT_ELEMENT}/Pages/{PAGE_ELEMENT}[{}]", self.page_count);
        let mut seen = Vec::new();

        for attr in e.attributes() {
            let attr = attr.map_err(|err| ComicInfoError::xml(err.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|err| ComicInfoError::xml(err.to_string()))?;

            match PAGE_ATTRIBUTES.iter().find(|a| a.name == key) {
                Some(rule) => {
                    if let Err(message) = check_value(rule.kind, value.trim()) {
                        self.report(format!("{path}@{key}"), message);
                    }
                    seen.push(rule.name);
                }
                None => self.report(format!("{path}@{key}"), "unexpected attribute"),
            }
        }

        for rule in PAGE_ATTRIBUTES.iter().filter(|a| a.required) {
            if !seen.contains(&rule.name) {
                self.report(format!("{path}@{}", rule.name), "required attribute missing");
            }
        }
        Ok(())
    }
}

/// Validate a serialized document. Every violation found is reported.
pub fn validate(xml: &str) -> Result<(), ComicInfoError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut validator = Validator {
        violations: Vec::new(),
        last_index: None,
        page_count: 0,
    };
    // Open elements below the root.
    let mut stack: Vec<Frame> = Vec::new();
    let mut root_seen = false;
    let mut root_open = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ComicInfoError::xml(e.to_string()))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

                if !root_open {
                    if root_seen {
                        validator.report(&name, "content after the root element");
                    } else if name != ROOT_ELEMENT {
                        validator.report(&name, format!("root element must be {ROOT_ELEMENT}"));
                    }
                    root_seen = true;
                    root_open = !is_empty && name == ROOT_ELEMENT;
                    if !is_empty && name != ROOT_ELEMENT {
                        // Skip the whole foreign tree.
                        stack.push(Frame::Ignored);
                        root_open = true;
                    }
                    continue;
                }

                let frame = match stack.last() {
                    None => validator.open_root_child(&name),
                    Some(Frame::Pages) => {
                        if name == PAGE_ELEMENT {
                            validator.check_page(e)?;
                            Frame::Page
                        } else {
                            let path = format!("{ROOT_ELEMENT}/Pages/{name}");
                            validator.report(path, "unexpected element");
                            Frame::Ignored
                        }
                    }
                    Some(Frame::Simple { rule, .. }) => {
                        let path = format!("{ROOT_ELEMENT}/{}/{name}", rule.name);
                        validator.report(path, "unexpected child element");
                        Frame::Ignored
                    }
                    Some(Frame::Page) => {
                        let path = format!("{ROOT_ELEMENT}/Pages/{PAGE_ELEMENT}/{name}");
                        validator.report(path, "unexpected child element");
                        Frame::Ignored
                    }
                    Some(Frame::Ignored) => Frame::Ignored,
                };

                if is_empty {
                    if let Frame::Simple { rule, .. } = frame {
                        validator.close_simple(rule, "");
                    }
                } else {
                    stack.push(frame);
                }
            }
            Event::Text(ref e) => {
                let text = e.unescape().map_err(|err| ComicInfoError::xml(err.to_string()))?;
                match stack.last_mut() {
                    Some(Frame::Simple { text: buffer, .. }) => buffer.push_str(&text),
                    Some(Frame::Ignored) => {}
                    Some(Frame::Pages) => {
                        validator.report(format!("{ROOT_ELEMENT}/Pages"), "unexpected text")
                    }
                    Some(Frame::Page) => {
                        validator.report(format!("{ROOT_ELEMENT}/Pages/{PAGE_ELEMENT}"), "unexpected text")
                    }
                    None if root_open => validator.report(ROOT_ELEMENT, "unexpected text"),
                    None => {}
                }
            }
            Event::CData(ref e) => {
                if let Some(Frame::Simple { text, .. }) = stack.last_mut() {
                    text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(_) => match stack.pop() {
                Some(Frame::Simple { rule, text }) => validator.close_simple(rule, text.trim()),
                Some(_) => {}
                None => root_open = false,
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen {
        validator.report(ROOT_ELEMENT, "document has no root element");
    }

    if validator.violations.is_empty() {
        Ok(())
    } else {
        Err(ComicInfoError::SchemaValidation(validator.violations))
    }
}

#[cfg(test)]
#[path = "tests/schema_tests.rs"]
mod tests;
