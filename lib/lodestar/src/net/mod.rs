//! Per-connection networking: the read-side byte FIFO, sentinel framing
//! with recharge interposition, the wire vocabulary and the shared error
//! plumbing.

pub mod buffer;
pub mod channel;
pub mod shared;
pub mod wire;
