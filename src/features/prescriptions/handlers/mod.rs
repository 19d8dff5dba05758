pub mod prescription_handler;
