pub mod payload;
pub mod response;
pub mod server;
