//! Incoming reply schemas
//!
//! Replies that carry structure are single newline-terminated JSON
//! documents. The object-selection reply is dispatched on its `kind` field
//! into a closed set of profiles; a kind outside that set is a decode error
//! rather than a silently absent proxy.

use serde::Deserialize;

use crate::types::Vec3;

/// Reply decode error
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed JSON reply: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed confirmation reply: {0:?}")]
    Confirmation(String),
}

/// Fields common to every object profile
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectCommon {
    /// Stable backend-assigned identifier
    pub name: String,
    /// Base asset reference
    pub base: String,
    pub pos: Vec3,
    pub rot: Vec3,
}

/// Reply to `editor.select(<name>)`, dispatched on the `kind` field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind")]
pub enum SelectReply {
    Robot {
        #[serde(flatten)]
        common: ObjectCommon,
        end_effector: String,
    },
    Camera3D {
        #[serde(flatten)]
        common: ObjectCommon,
        image_size: [u32; 2],
        fov: f64,
        forcal: f64,
    },
    Placer {
        #[serde(flatten)]
        common: ObjectCommon,
        center: Vec3,
        interval: f64,
        amount: i64,
        workpiece: String,
    },
    /// No specialized profile; mirrored as a plain active object
    Packer {
        #[serde(flatten)]
        common: ObjectCommon,
    },
}

impl SelectReply {
    /// Parse one JSON reply line
    pub fn parse(line: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(line)?)
    }

    /// The backend's kind label for this profile
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Robot { .. } => "Robot",
            Self::Camera3D { .. } => "Camera3D",
            Self::Placer { .. } => "Placer",
            Self::Packer { .. } => "Packer",
        }
    }

    pub fn common(&self) -> &ObjectCommon {
        match self {
            Self::Robot { common, .. }
            | Self::Camera3D { common, .. }
            | Self::Placer { common, .. }
            | Self::Packer { common } => common,
        }
    }
}

/// Reply to `editor.ray(x,y)`: the hit object and world position
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RayReply {
    pub name: String,
    pub pos: Vec3,
}

impl RayReply {
    /// Parse one JSON reply line
    pub fn parse(line: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Parse the confirmation line of `set_end_effector`: the backend-assigned
/// numeric end-effector id
pub fn parse_end_effector_id(line: &str) -> Result<i64, DecodeError> {
    line.trim()
        .parse()
        .map_err(|_| DecodeError::Confirmation(line.to_string()))
}
