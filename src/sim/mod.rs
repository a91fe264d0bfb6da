pub mod dataset;
pub mod server;
pub mod session;
