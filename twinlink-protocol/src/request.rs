//! Outgoing request grammar
//!
//! Every backend call is a single line of text shaped as
//! `<receiver>.<method>(<args>)` or `<receiver>.<field> = <value>`, where the
//! receiver is a bare `scene`/`editor`/`workflow` keyword or an indexed
//! lookup `scene.active_objs_by_name[<name>]`. Literal encoding rules:
//!
//! - booleans render as `True` / `False`
//! - numbers render in their natural decimal form
//! - object names used as dictionary keys are interpolated unquoted
//! - string parameters (paths, script source) are single-quoted
//! - 3-vectors render as a bracketed comma list `[x,y,z]`
//!
//! `Display` produces the exact wire line without the trailing newline; the
//! transport appends it.

use std::fmt;

use crate::types::Vec3;

/// A single backend call
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    // === Scene ===
    /// Render the scene viewport to the session pixel buffer
    Render,

    /// Start or stop the simulation
    Play(bool),

    /// Orbit the scene camera
    Rotate { x: f64, y: f64 },

    /// Pan the scene camera
    Pan { x: f64, y: f64 },

    /// Zoom the scene camera
    Zoom { factor: f64 },

    // === Editor ===
    /// Select a named object, refreshing its client-side mirror
    Select { name: String },

    /// Hit-test a viewport coordinate
    Ray { x: f64, y: f64 },

    /// Move a named object to a world position
    MoveObject { name: String, pos: Vec3 },

    /// Persist the scene backend-side
    Save,

    // === Object-addressed ===
    /// Replace an object's base asset
    SetBase { name: String, path: String },

    /// Replace a robot's end-effector asset
    SetEndEffector { name: String, path: String },

    /// Drive a robot's end-effector digital output
    DigitalOutput { name: String, pickup: bool },

    /// Render a camera object to its own pixel buffers
    ObjectRender { name: String },

    /// Assign a placer's workpiece asset
    SetWorkpiece { name: String, base: String },

    /// Assign a placer's workpiece texture image
    SetWorkpieceTexture { name: String, path: String },

    /// Assign a placer's center position
    SetCenter { name: String, center: Vec3 },

    /// Assign a placer's item amount
    SetAmount { name: String, amount: i64 },

    /// Assign a placer's placement interval in seconds
    SetInterval { name: String, seconds: f64 },

    // === Workflow ===
    /// Replace the workflow script source
    WorkflowSet { src: String },

    /// Fetch the workflow script source
    WorkflowGet,

    /// Start the workflow script
    WorkflowStart,

    /// Stop the workflow script
    WorkflowStop,

    /// Fetch the workflow's active-object node listing
    WorkflowNodes,
}

/// Boolean literal per backend convention
fn py_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

/// Bracketed comma list for a 3-vector
struct VecLit(Vec3);

impl fmt::Display for VecLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.0[0], self.0[1], self.0[2])
    }
}

/// Object-addressed receiver path; the name is a dictionary key and stays
/// unquoted
struct ObjPath<'a>(&'a str);

impl fmt::Display for ObjPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene.active_objs_by_name[{}]", self.0)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render => write!(f, "scene.rtt()"),
            Self::Play(run) => write!(f, "scene.play({})", py_bool(*run)),
            Self::Rotate { x, y } => write!(f, "scene.rotate({},{})", x, y),
            Self::Pan { x, y } => write!(f, "scene.pan({},{})", x, y),
            Self::Zoom { factor } => write!(f, "scene.zoom({})", factor),

            Self::Select { name } => write!(f, "editor.select({})", name),
            Self::Ray { x, y } => write!(f, "editor.ray({},{})", x, y),
            Self::MoveObject { name, pos } => {
                write!(f, "editor.move('{}',{})", name, VecLit(*pos))
            }
            Self::Save => write!(f, "editor.save()"),

            Self::SetBase { name, path } => {
                write!(f, "{}.set_base('{}')", ObjPath(name), path)
            }
            Self::SetEndEffector { name, path } => {
                write!(f, "{}.set_end_effector('{}')", ObjPath(name), path)
            }
            Self::DigitalOutput { name, pickup } => {
                write!(f, "{}.end_effector_obj.do({})", ObjPath(name), py_bool(*pickup))
            }
            Self::ObjectRender { name } => write!(f, "{}.rtt()", ObjPath(name)),
            Self::SetWorkpiece { name, base } => {
                write!(f, "{}.workpiece = '{}'", ObjPath(name), base)
            }
            Self::SetWorkpieceTexture { name, path } => {
                write!(f, "{}.workpiece_texture = '{}'", ObjPath(name), path)
            }
            Self::SetCenter { name, center } => {
                write!(f, "{}.center = {}", ObjPath(name), VecLit(*center))
            }
            Self::SetAmount { name, amount } => {
                write!(f, "{}.amount = {}", ObjPath(name), amount)
            }
            Self::SetInterval { name, seconds } => {
                write!(f, "{}.interval = {}", ObjPath(name), seconds)
            }

            Self::WorkflowSet { src } => write!(f, "workflow.set('{}')", src),
            Self::WorkflowGet => write!(f, "workflow.get()"),
            Self::WorkflowStart => write!(f, "workflow.start()"),
            Self::WorkflowStop => write!(f, "workflow.stop()"),
            Self::WorkflowNodes => write!(f, "workflow.get_active_obj_nodes()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_uses_python_boolean_literals() {
        assert_eq!(Request::Play(true).to_string(), "scene.play(True)");
        assert_eq!(Request::Play(false).to_string(), "scene.play(False)");
    }

    #[test]
    fn numbers_render_in_natural_decimal_form() {
        let req = Request::Ray { x: 10.5, y: 20.0 };
        assert_eq!(req.to_string(), "editor.ray(10.5,20)");

        let req = Request::Zoom { factor: 0.25 };
        assert_eq!(req.to_string(), "scene.zoom(0.25)");
    }

    #[test]
    fn select_interpolates_name_unquoted() {
        let req = Request::Select {
            name: "robot1".into(),
        };
        assert_eq!(req.to_string(), "editor.select(robot1)");
    }

    #[test]
    fn move_quotes_name_and_brackets_position() {
        let req = Request::MoveObject {
            name: "table".into(),
            pos: [1.0, 0.5, 0.0],
        };
        assert_eq!(req.to_string(), "editor.move('table',[1,0.5,0])");
    }

    #[test]
    fn object_receiver_key_is_unquoted_but_path_parameter_is_quoted() {
        let req = Request::SetBase {
            name: "robot1".into(),
            path: "ur5.obj".into(),
        };
        assert_eq!(
            req.to_string(),
            "scene.active_objs_by_name[robot1].set_base('ur5.obj')"
        );
    }

    #[test]
    fn end_effector_calls() {
        let req = Request::SetEndEffector {
            name: "robot1".into(),
            path: "gripper.obj".into(),
        };
        assert_eq!(
            req.to_string(),
            "scene.active_objs_by_name[robot1].set_end_effector('gripper.obj')"
        );

        let req = Request::DigitalOutput {
            name: "robot1".into(),
            pickup: true,
        };
        assert_eq!(
            req.to_string(),
            "scene.active_objs_by_name[robot1].end_effector_obj.do(True)"
        );
    }

    #[test]
    fn camera_render_addresses_the_object() {
        let req = Request::ObjectRender {
            name: "cam0".into(),
        };
        assert_eq!(req.to_string(), "scene.active_objs_by_name[cam0].rtt()");
    }

    #[test]
    fn placer_assignments() {
        let name = || "placer0".to_string();
        assert_eq!(
            Request::SetWorkpiece {
                name: name(),
                base: "bolt.obj".into()
            }
            .to_string(),
            "scene.active_objs_by_name[placer0].workpiece = 'bolt.obj'"
        );
        assert_eq!(
            Request::SetCenter {
                name: name(),
                center: [0.1, 0.2, 0.3]
            }
            .to_string(),
            "scene.active_objs_by_name[placer0].center = [0.1,0.2,0.3]"
        );
        assert_eq!(
            Request::SetAmount {
                name: name(),
                amount: 12
            }
            .to_string(),
            "scene.active_objs_by_name[placer0].amount = 12"
        );
        assert_eq!(
            Request::SetInterval {
                name: name(),
                seconds: 1.5
            }
            .to_string(),
            "scene.active_objs_by_name[placer0].interval = 1.5"
        );
    }

    #[test]
    fn workflow_calls() {
        assert_eq!(
            Request::WorkflowSet {
                src: "move_to(robot1, bin)".into()
            }
            .to_string(),
            "workflow.set('move_to(robot1, bin)')"
        );
        assert_eq!(Request::WorkflowGet.to_string(), "workflow.get()");
        assert_eq!(Request::WorkflowStart.to_string(), "workflow.start()");
        assert_eq!(Request::WorkflowStop.to_string(), "workflow.stop()");
        assert_eq!(
            Request::WorkflowNodes.to_string(),
            "workflow.get_active_obj_nodes()"
        );
    }

    #[test]
    fn encoding_is_format_stable() {
        // Same value encodes to the same line every time
        let req = Request::MoveObject {
            name: "crate7".into(),
            pos: [3.0, -1.25, 0.5],
        };
        assert_eq!(req.to_string(), req.clone().to_string());
        assert_eq!(req.to_string(), "editor.move('crate7',[3,-1.25,0.5])");
    }
}
