//! Services that only exist as host-manager pages under `/scripts2/`. They
//! need a server configured in [`crate::ApiMode::Whostmgr`].

pub mod ssl;

pub use ssl::Ssl;
