pub mod establishment_handler;
