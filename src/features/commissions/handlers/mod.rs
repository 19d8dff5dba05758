pub mod commission_handler;
