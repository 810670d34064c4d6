pub mod history;
pub mod providers;
pub mod request_builder;
