pub mod grouping_handler;
