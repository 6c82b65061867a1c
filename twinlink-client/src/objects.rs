//! Client-side mirrors of backend-side named entities
//!
//! An [`ActiveObject`] is a registry-owned value keyed by its stable name.
//! Re-selecting a known name merges the fresh reply into the existing entry
//! instead of replacing it, so the registry never hands out a second
//! identity for one backend entity. Local fields are never mutated
//! speculatively: they reflect the last acknowledged backend state.

use twinlink_protocol::{
    parse_end_effector_id, Request, SelectReply, Vec3, DEPTH_BYTES_PER_PIXEL,
    RGBA_BYTES_PER_PIXEL,
};
use twinlink_utils::{Result, TwinError};

use crate::session::Session;

/// Read-only snapshot view onto a caller-owned pixel buffer
///
/// Valid only until the next render call on the owning session or camera;
/// the borrow makes that a compile-time rule rather than a convention.
#[derive(Debug)]
pub struct Texture<'a> {
    pub width: u32,
    pub height: u32,
    /// RGBA color pixels, `width * height * 4` bytes
    pub rgba: &'a [u8],
    /// Depth pixels, `width * height * 3` bytes; cameras only
    pub depth: Option<&'a [u8]>,
}

/// Robot specialization state
#[derive(Debug, Clone, PartialEq)]
pub struct RobotDetail {
    pub(crate) end_effector: String,
    /// Backend-assigned numeric id, captured from the `set_end_effector`
    /// confirmation
    pub(crate) end_effector_id: Option<i64>,
}

impl RobotDetail {
    pub fn end_effector(&self) -> &str {
        &self.end_effector
    }

    pub fn end_effector_id(&self) -> Option<i64> {
        self.end_effector_id
    }
}

/// Camera specialization state, including its own pixel buffers
#[derive(Debug, Clone, PartialEq)]
pub struct CameraDetail {
    pub(crate) image_size: [u32; 2],
    pub(crate) fov: f64,
    pub(crate) forcal: f64,
    pub(crate) rgba_pixels: Vec<u8>,
    pub(crate) depth_pixels: Vec<u8>,
}

impl CameraDetail {
    fn new(image_size: [u32; 2], fov: f64, forcal: f64) -> Self {
        let pixels = image_size[0] as usize * image_size[1] as usize;
        Self {
            image_size,
            fov,
            forcal,
            rgba_pixels: vec![0; pixels * RGBA_BYTES_PER_PIXEL],
            depth_pixels: vec![0; pixels * DEPTH_BYTES_PER_PIXEL],
        }
    }

    pub fn image_size(&self) -> [u32; 2] {
        self.image_size
    }

    pub fn fov(&self) -> f64 {
        self.fov
    }

    pub fn forcal(&self) -> f64 {
        self.forcal
    }
}

/// Placer specialization state
#[derive(Debug, Clone, PartialEq)]
pub struct PlacerDetail {
    pub(crate) center: Vec3,
    pub(crate) interval: f64,
    pub(crate) amount: i64,
    pub(crate) workpiece: String,
}

impl PlacerDetail {
    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn workpiece(&self) -> &str {
        &self.workpiece
    }
}

/// Closed set of object specializations
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectDetail {
    /// No specialized state (e.g. packers)
    Plain,
    Robot(RobotDetail),
    Camera(CameraDetail),
    Placer(PlacerDetail),
}

/// One backend entity's last-confirmed state
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveObject {
    pub(crate) name: String,
    pub(crate) kind: String,
    pub(crate) base: String,
    pub(crate) pos: Vec3,
    pub(crate) rot: Vec3,
    pub(crate) detail: ObjectDetail,
}

impl ActiveObject {
    pub(crate) fn from_reply(reply: SelectReply) -> Self {
        let kind = reply.kind().to_string();
        match reply {
            SelectReply::Robot {
                common,
                end_effector,
            } => Self {
                name: common.name,
                kind,
                base: common.base,
                pos: common.pos,
                rot: common.rot,
                detail: ObjectDetail::Robot(RobotDetail {
                    end_effector,
                    end_effector_id: None,
                }),
            },
            SelectReply::Camera3D {
                common,
                image_size,
                fov,
                forcal,
            } => Self {
                name: common.name,
                kind,
                base: common.base,
                pos: common.pos,
                rot: common.rot,
                detail: ObjectDetail::Camera(CameraDetail::new(image_size, fov, forcal)),
            },
            SelectReply::Placer {
                common,
                center,
                interval,
                amount,
                workpiece,
            } => Self {
                name: common.name,
                kind,
                base: common.base,
                pos: common.pos,
                rot: common.rot,
                detail: ObjectDetail::Placer(PlacerDetail {
                    center,
                    interval,
                    amount,
                    workpiece,
                }),
            },
            SelectReply::Packer { common } => Self {
                name: common.name,
                kind,
                base: common.base,
                pos: common.pos,
                rot: common.rot,
                detail: ObjectDetail::Plain,
            },
        }
    }

    /// Field-merge a fresh select reply into this entry
    ///
    /// The entry keeps its registry identity. State the reply does not
    /// carry (the acknowledged end-effector id) survives a same-kind
    /// refresh.
    pub(crate) fn merge_from(&mut self, reply: SelectReply) {
        let prior_id = match &self.detail {
            ObjectDetail::Robot(robot) => robot.end_effector_id,
            _ => None,
        };

        *self = Self::from_reply(reply);

        if let (ObjectDetail::Robot(robot), Some(id)) = (&mut self.detail, prior_id) {
            robot.end_effector_id = Some(id);
        }
    }

    /// Stable backend-assigned identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backend kind label (`Robot`, `Camera3D`, `Placer`, `Packer`)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Base asset reference
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn pos(&self) -> Vec3 {
        self.pos
    }

    pub fn rot(&self) -> Vec3 {
        self.rot
    }

    pub fn detail(&self) -> &ObjectDetail {
        &self.detail
    }

    pub fn as_robot(&self) -> Option<&RobotDetail> {
        match &self.detail {
            ObjectDetail::Robot(robot) => Some(robot),
            _ => None,
        }
    }

    pub fn as_camera(&self) -> Option<&CameraDetail> {
        match &self.detail {
            ObjectDetail::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn as_placer(&self) -> Option<&PlacerDetail> {
        match &self.detail {
            ObjectDetail::Placer(placer) => Some(placer),
            _ => None,
        }
    }
}

/// Object-addressed operations on one registry entry
///
/// Borrows the session, so the half-duplex discipline holds for
/// object-addressed calls too.
pub struct ObjectHandle<'a> {
    session: &'a mut Session,
    name: String,
}

impl<'a> ObjectHandle<'a> {
    pub(crate) fn new(session: &'a mut Session, name: String) -> Self {
        Self { session, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn object(&self) -> &ActiveObject {
        // The handle is only created for a present registry entry, and the
        // registry cannot change while the handle borrows the session.
        &self.session.objects[&self.name]
    }

    fn object_mut(&mut self) -> &mut ActiveObject {
        self.session
            .objects
            .get_mut(&self.name)
            .expect("handle outlived its registry entry")
    }

    fn expect_robot(&self) -> Result<()> {
        match self.object().detail {
            ObjectDetail::Robot(_) => Ok(()),
            _ => Err(TwinError::WrongKind {
                name: self.name.clone(),
                expected: "Robot",
            }),
        }
    }

    fn expect_placer(&self) -> Result<()> {
        match self.object().detail {
            ObjectDetail::Placer(_) => Ok(()),
            _ => Err(TwinError::WrongKind {
                name: self.name.clone(),
                expected: "Placer",
            }),
        }
    }

    /// Replace the base asset; the local field updates only after the
    /// backend's confirmation line
    pub async fn set_base(&mut self, path: &str) -> Result<()> {
        let link = self.session.link_mut()?;
        link.send(&Request::SetBase {
            name: self.name.clone(),
            path: path.to_string(),
        })
        .await?;
        let ack = link.read_text_line().await?;
        tracing::debug!(name = %self.name, ack = %ack, "set_base acknowledged");

        self.object_mut().base = path.to_string();
        Ok(())
    }

    /// Replace a robot's end effector; captures the backend-assigned
    /// numeric id from the confirmation line
    pub async fn set_end_effector(&mut self, path: &str) -> Result<()> {
        self.expect_robot()?;

        let link = self.session.link_mut()?;
        link.send(&Request::SetEndEffector {
            name: self.name.clone(),
            path: path.to_string(),
        })
        .await?;
        let ack = link.read_text_line().await?;
        let id = parse_end_effector_id(&ack).map_err(|e| TwinError::decode(e.to_string()))?;
        tracing::debug!(name = %self.name, id, "set_end_effector acknowledged");

        if let ObjectDetail::Robot(robot) = &mut self.object_mut().detail {
            robot.end_effector = path.to_string();
            robot.end_effector_id = Some(id);
        }
        Ok(())
    }

    /// Drive a robot's end-effector digital output (pick up / release)
    pub async fn digital_output(&mut self, pickup: bool) -> Result<()> {
        self.expect_robot()?;
        self.session
            .send(Request::DigitalOutput {
                name: self.name.clone(),
                pickup,
            })
            .await
    }

    /// Render a camera to its own buffers: one color frame, then one depth
    /// frame, both sized from the camera's image dimensions
    pub async fn render_to_texture(&mut self) -> Result<Texture<'_>> {
        let link = self.session.link.as_mut().ok_or(TwinError::NotConnected)?;
        let object = self
            .session
            .objects
            .get_mut(&self.name)
            .expect("handle outlived its registry entry");
        let camera = match &mut object.detail {
            ObjectDetail::Camera(camera) => camera,
            _ => {
                return Err(TwinError::WrongKind {
                    name: self.name.clone(),
                    expected: "Camera3D",
                })
            }
        };

        link.send(&Request::ObjectRender {
            name: self.name.clone(),
        })
        .await?;
        link.read_frame(&mut camera.rgba_pixels).await?;
        link.read_frame(&mut camera.depth_pixels).await?;

        Ok(Texture {
            width: camera.image_size[0],
            height: camera.image_size[1],
            rgba: &camera.rgba_pixels,
            depth: Some(&camera.depth_pixels),
        })
    }

    /// Assign a placer's workpiece asset (one-way; the mirror updates on
    /// the next select)
    pub async fn set_workpiece(&mut self, base: &str) -> Result<()> {
        self.expect_placer()?;
        self.session
            .send(Request::SetWorkpiece {
                name: self.name.clone(),
                base: base.to_string(),
            })
            .await
    }

    /// Assign a placer's workpiece texture image (one-way)
    pub async fn set_workpiece_texture(&mut self, path: &str) -> Result<()> {
        self.expect_placer()?;
        self.session
            .send(Request::SetWorkpieceTexture {
                name: self.name.clone(),
                path: path.to_string(),
            })
            .await
    }

    /// Assign a placer's center position (one-way)
    pub async fn set_center(&mut self, center: Vec3) -> Result<()> {
        self.expect_placer()?;
        self.session
            .send(Request::SetCenter {
                name: self.name.clone(),
                center,
            })
            .await
    }

    /// Assign a placer's item amount (one-way)
    pub async fn set_amount(&mut self, amount: i64) -> Result<()> {
        self.expect_placer()?;
        self.session
            .send(Request::SetAmount {
                name: self.name.clone(),
                amount,
            })
            .await
    }

    /// Assign a placer's placement interval in seconds (one-way)
    pub async fn set_interval(&mut self, seconds: f64) -> Result<()> {
        self.expect_placer()?;
        self.session
            .send(Request::SetInterval {
                name: self.name.clone(),
                seconds,
            })
            .await
    }

    // Extension points the current backend does not implement. They are
    // declared so the call surface is stable, and fail explicitly instead
    // of pretending to succeed.

    /// Number of robot joints (unsupported extension point)
    pub fn joint_count(&self) -> Result<usize> {
        Err(TwinError::Unsupported("joint_count"))
    }

    /// Robot joint position by index (unsupported extension point)
    pub fn joint_position(&self, _joint: usize) -> Result<f64> {
        Err(TwinError::Unsupported("joint_position"))
    }

    /// Set a robot joint position (unsupported extension point)
    pub fn set_joint_position(&mut self, _joint: usize, _value: f64) -> Result<()> {
        Err(TwinError::Unsupported("set_joint_position"))
    }

    /// Robot end-effector pose getters/setters (unsupported extension points)
    pub fn end_effector_pos(&self) -> Result<Vec3> {
        Err(TwinError::Unsupported("end_effector_pos"))
    }

    pub fn set_end_effector_pos(&mut self, _pos: Vec3) -> Result<()> {
        Err(TwinError::Unsupported("set_end_effector_pos"))
    }

    pub fn end_effector_rot(&self) -> Result<Vec3> {
        Err(TwinError::Unsupported("end_effector_rot"))
    }

    pub fn set_end_effector_rot(&mut self, _rot: Vec3) -> Result<()> {
        Err(TwinError::Unsupported("set_end_effector_rot"))
    }

    /// Robot home pose (unsupported extension points)
    pub fn set_home(&mut self) -> Result<()> {
        Err(TwinError::Unsupported("set_home"))
    }

    pub fn home(&mut self) -> Result<()> {
        Err(TwinError::Unsupported("home"))
    }

    /// Robot motion speed (unsupported extension point)
    pub fn set_speed(&mut self, _value: f64) -> Result<()> {
        Err(TwinError::Unsupported("set_speed"))
    }

    /// Robot conveyor tracking (unsupported extension point)
    pub fn track(&mut self, _enable: bool) -> Result<()> {
        Err(TwinError::Unsupported("track"))
    }

    /// Camera intrinsic calibration (unsupported extension point)
    pub fn set_calibration(&mut self, _params: &str) -> Result<()> {
        Err(TwinError::Unsupported("set_calibration"))
    }

    /// Placer workpiece scale range (unsupported extension point)
    pub fn set_scale_factor(&mut self, _max: f64, _min: f64) -> Result<()> {
        Err(TwinError::Unsupported("set_scale_factor"))
    }

    /// Placer placement mode (unsupported extension point)
    pub fn set_place_mode(&mut self, _mode: &str) -> Result<()> {
        Err(TwinError::Unsupported("set_place_mode"))
    }
}
