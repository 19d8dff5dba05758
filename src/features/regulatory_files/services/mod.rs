mod regulatory_file_service;

pub use regulatory_file_service::RegulatoryFileService;
