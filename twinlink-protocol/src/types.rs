//! Shared value types for the backend protocol

/// 3-component vector (position, rotation, center)
pub type Vec3 = [f64; 3];

/// Bytes per pixel in a color frame (RGBA)
pub const RGBA_BYTES_PER_PIXEL: usize = 4;

/// Bytes per pixel in a depth frame
pub const DEPTH_BYTES_PER_PIXEL: usize = 3;
