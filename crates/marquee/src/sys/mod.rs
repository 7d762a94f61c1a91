pub mod request;
pub mod runtime;
pub mod server;
