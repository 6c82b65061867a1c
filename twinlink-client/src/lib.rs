//! twinlink-client: session layer for an out-of-process simulation backend
//!
//! A [`Session`] spawns the backend executable, connects to the Unix-domain
//! socket the backend creates for the loaded scene, and drives it through a
//! narrow line-oriented call protocol. Higher-level facades ([`Editor`],
//! [`Workflow`]) and object proxies ([`ActiveObject`], [`ObjectHandle`])
//! all write through the session's single transport.
//!
//! The protocol is strictly half-duplex: every operation takes
//! `&mut Session` (directly or through a facade), so exactly one request is
//! ever in flight and replies correlate by stream order alone.

pub mod backend;
pub mod editor;
pub mod link;
pub mod objects;
pub mod session;
pub mod workflow;

// Re-export main types at crate root
pub use editor::Editor;
pub use objects::{
    ActiveObject, CameraDetail, ObjectDetail, ObjectHandle, PlacerDetail, RobotDetail, Texture,
};
pub use session::{Session, SessionConfig};
pub use workflow::Workflow;

// Re-export the protocol and error surface callers interact with
pub use twinlink_protocol::{RayReply, Vec3};
pub use twinlink_utils::{Result, TwinError};
