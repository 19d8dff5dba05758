mod regulatory_file;

pub use regulatory_file::{RegulatoryFileRow, RegulatoryFileStatus};
