mod grouping_service;

pub use grouping_service::GroupingService;
