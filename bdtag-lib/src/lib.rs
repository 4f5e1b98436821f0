//! Network-free side of bdtag: file-name heuristics, title normalization,
//! library scanning, archive access and settings.

pub mod archive;
pub mod error;
pub mod name_parser;
pub mod normalize;
pub mod scanner;
pub mod settings;

pub use error::{ArchiveError, SettingsError};
pub use name_parser::{parse_file, parse_file_name};
pub use normalize::{fold_accents, revert_determiner, search_key};
pub use scanner::{ScanOptions, scan_comics};
pub use settings::Settings;
