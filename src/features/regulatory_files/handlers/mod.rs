pub mod regulatory_file_handler;
