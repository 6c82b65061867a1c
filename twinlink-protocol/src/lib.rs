//! twinlink-protocol: Wire definitions for client-backend communication
//!
//! This crate defines the textual call grammar sent to the simulation
//! backend and the reply schemas read back from it. Requests are single
//! newline-terminated lines shaped as `<receiver>.<method>(<args>)`; replies
//! are newline-terminated JSON documents, newline-terminated raw text, or
//! fixed-length binary pixel frames whose size is implied by context.
//!
//! The grammar is deliberately minimal and closed: it is not a general
//! serialization format, and new operations may only add method/argument
//! shapes consistent with it.

pub mod reply;
pub mod request;
pub mod types;

// Re-export main types at crate root
pub use reply::{parse_end_effector_id, DecodeError, RayReply, SelectReply};
pub use request::Request;
pub use types::{Vec3, DEPTH_BYTES_PER_PIXEL, RGBA_BYTES_PER_PIXEL};
