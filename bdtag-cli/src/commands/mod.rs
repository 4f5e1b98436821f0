pub(crate) mod config;
pub(crate) mod links;
pub(crate) mod parse;
pub(crate) mod search;
pub(crate) mod tag;
