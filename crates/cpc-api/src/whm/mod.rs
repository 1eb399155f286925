//! Host-level WHM services, called as the server's own user.

pub mod account;
pub mod dns;

pub use account::Account;
pub use dns::Dns;
