pub mod request_wizard;
