//! Editor facade: pick, move, select and scene persistence
//!
//! Session-scoped command group issuing `editor.*` calls through the
//! session's transport. `select` is also where the proxy registry gets
//! reconciled.

use std::collections::hash_map::Entry;

use twinlink_protocol::{RayReply, Request, SelectReply, Vec3};
use twinlink_utils::{Result, TwinError};

use crate::objects::ActiveObject;
use crate::session::Session;

/// Editor command group, borrowing its session
pub struct Editor<'a> {
    session: &'a mut Session,
}

impl<'a> Editor<'a> {
    pub(crate) fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    /// Select a named object and refresh its client-side mirror
    ///
    /// An already-known name is merged in place, keeping its registry
    /// identity; an unknown one is inserted. Returns the live proxy.
    pub async fn select(&mut self, name: &str) -> Result<&ActiveObject> {
        let link = self.session.link_mut()?;
        link.send(&Request::Select {
            name: name.to_string(),
        })
        .await?;
        let line = link.read_text_line().await?;
        let reply = SelectReply::parse(&line).map_err(|e| TwinError::decode(e.to_string()))?;

        match self.session.objects.entry(name.to_string()) {
            Entry::Occupied(mut entry) => entry.get_mut().merge_from(reply),
            Entry::Vacant(entry) => {
                entry.insert(ActiveObject::from_reply(reply));
            }
        }
        Ok(&self.session.objects[name])
    }

    /// Hit-test a viewport coordinate
    ///
    /// Returns the hit object's name and world position; the registry is
    /// not touched.
    pub async fn ray(&mut self, x: f64, y: f64) -> Result<RayReply> {
        let link = self.session.link_mut()?;
        link.send(&Request::Ray { x, y }).await?;
        let line = link.read_text_line().await?;
        RayReply::parse(&line).map_err(|e| TwinError::decode(e.to_string()))
    }

    /// Move a named object to a world position (one-way)
    pub async fn move_object(&mut self, name: &str, pos: Vec3) -> Result<()> {
        self.session
            .send(Request::MoveObject {
                name: name.to_string(),
                pos,
            })
            .await
    }

    /// Persist the scene backend-side (one-way)
    pub async fn save(&mut self) -> Result<()> {
        self.session.send(Request::Save).await
    }

    // Declared editor surface with no backend call in the current
    // protocol. Explicit failures, not silent no-ops.

    /// Add an object to the scene (unsupported extension point)
    pub fn add(&mut self, _base: &str, _pos: Vec3, _rot: Vec3, _scale: Vec3) -> Result<()> {
        Err(TwinError::Unsupported("add"))
    }

    /// Remove an object from the scene (unsupported extension point)
    pub fn remove(&mut self, _name: &str) -> Result<()> {
        Err(TwinError::Unsupported("remove"))
    }

    /// Reparent an object (unsupported extension point)
    pub fn set_parent(&mut self, _parent_name: &str, _child_name: &str) -> Result<()> {
        Err(TwinError::Unsupported("set_parent"))
    }

    /// Fade an object's opacity (unsupported extension point)
    pub fn transparentize(&mut self, _name: &str, _value: f64) -> Result<()> {
        Err(TwinError::Unsupported("transparentize"))
    }
}
