//! Lodestar guides authenticated robot clients to the origin of a 2D
//! integer grid over a sentinel-framed TCP protocol. The `net` modules own
//! the transport-facing pieces (byte buffering, framing with recharge
//! interposition, the wire vocabulary); `auth`, `robot`, `nav` and
//! `session` implement the protocol proper; `config` and `logging` carry
//! the service infrastructure.

pub mod auth;
pub mod config;
pub mod logging;
pub mod nav;
pub mod net;
pub mod robot;
pub mod session;
