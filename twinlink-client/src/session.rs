//! Session: the single owning context for one backend connection
//!
//! A session owns the viewport geometry, the transport, the backend process
//! handle, and the object proxy registry. Everything that talks to the
//! backend does so through the session, one request at a time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use twinlink_protocol::{Request, RGBA_BYTES_PER_PIXEL};
use twinlink_utils::{paths, Result, TwinError};

use crate::backend::{self, Backend};
use crate::editor::Editor;
use crate::link::Link;
use crate::objects::{ActiveObject, ObjectHandle, Texture};
use crate::workflow::Workflow;

/// Session tuning knobs
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Explicit backend binary; discovered next to the executable or in
    /// PATH when unset
    pub backend_binary: Option<PathBuf>,
    /// Directory handed to the backend, where it creates the scene socket;
    /// defaults to the twinlink runtime directory
    pub work_dir: Option<PathBuf>,
    /// Bounded connection attempts after spawning the backend
    pub connect_attempts: u32,
    /// Delay before each connection attempt
    pub retry_delay: Duration,
    /// Optional bound on every reply read; unbounded when unset
    pub reply_timeout: Option<Duration>,
    /// How long teardown waits for the backend to exit after the kill
    pub shutdown_grace: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend_binary: None,
            work_dir: None,
            connect_attempts: 4,
            retry_delay: Duration::from_secs(1),
            reply_timeout: None,
            shutdown_grace: Duration::from_secs(2),
        }
    }
}

/// One backend connection, viewport, and proxy registry
pub struct Session {
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Viewport color buffer, reused across frame requests
    pub(crate) rgba_pixels: Vec<u8>,
    pub(crate) work_dir: PathBuf,
    pub(crate) config: SessionConfig,
    pub(crate) link: Option<Link>,
    pub(crate) backend: Option<Backend>,
    pub(crate) objects: HashMap<String, ActiveObject>,
}

impl Session {
    /// Create an unconnected session with a fixed viewport
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(width, height, SessionConfig::default())
    }

    /// Create an unconnected session with explicit configuration
    pub fn with_config(width: u32, height: u32, config: SessionConfig) -> Self {
        let work_dir = config.work_dir.clone().unwrap_or_else(paths::work_dir);
        Self {
            width,
            height,
            rgba_pixels: vec![0; width as usize * height as usize * RGBA_BYTES_PER_PIXEL],
            work_dir,
            config,
            link: None,
            backend: None,
            objects: HashMap::new(),
        }
    }

    /// Create a session and load a scene in one step
    pub async fn open(width: u32, height: u32, scene_path: impl AsRef<Path>) -> Result<Self> {
        let mut session = Self::new(width, height);
        session.load(scene_path).await?;
        Ok(session)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether a backend connection is currently established
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Start a backend for `scene_path` and connect to it
    ///
    /// An empty path is a no-op: no process is spawned and any prior
    /// connection is left untouched. Otherwise any previously running
    /// backend owned by this session is torn down first, then the new one
    /// is spawned and its socket dialed with bounded retry. On connect
    /// failure the transport is left closed; the spawned backend handle is
    /// retained so the next `load`/`close`/drop reaps it.
    pub async fn load(&mut self, scene_path: impl AsRef<Path>) -> Result<()> {
        let scene_path = scene_path.as_ref();
        if scene_path.as_os_str().is_empty() {
            return Ok(());
        }

        self.link = None;
        self.objects.clear();
        if let Some(backend) = self.backend.take() {
            backend.shutdown(self.config.shutdown_grace).await?;
        }

        paths::ensure_dir(&self.work_dir)?;

        let program = match &self.config.backend_binary {
            Some(path) => path.clone(),
            None => backend::find_backend_binary()?,
        };
        self.backend = Some(Backend::spawn(
            &program,
            scene_path,
            self.width,
            self.height,
            &self.work_dir,
        )?);

        let socket_path = paths::scene_socket_path(&self.work_dir, scene_path);
        let mut link = Link::connect(
            &socket_path,
            self.config.connect_attempts,
            self.config.retry_delay,
        )
        .await?;
        link.set_reply_timeout(self.config.reply_timeout);
        self.link = Some(link);

        tracing::info!(scene = %scene_path.display(), "Backend session ready");
        Ok(())
    }

    /// Render the viewport and return a borrowed view of the frame
    ///
    /// Reads exactly `width * height * 4` bytes into the session buffer.
    /// The returned [`Texture`] is a snapshot view, valid until the next
    /// render on this session.
    pub async fn render_to_texture(&mut self) -> Result<Texture<'_>> {
        let link = self.link.as_mut().ok_or(TwinError::NotConnected)?;
        link.send(&Request::Render).await?;
        link.read_frame(&mut self.rgba_pixels).await?;

        Ok(Texture {
            width: self.width,
            height: self.height,
            rgba: &self.rgba_pixels,
            depth: None,
        })
    }

    /// Start or stop the simulation
    pub async fn play(&mut self, run: bool) -> Result<()> {
        self.send(Request::Play(run)).await
    }

    /// Orbit the scene camera
    pub async fn rotate(&mut self, x: f64, y: f64) -> Result<()> {
        self.send(Request::Rotate { x, y }).await
    }

    /// Pan the scene camera
    pub async fn pan(&mut self, x: f64, y: f64) -> Result<()> {
        self.send(Request::Pan { x, y }).await
    }

    /// Zoom the scene camera
    pub async fn zoom(&mut self, factor: f64) -> Result<()> {
        self.send(Request::Zoom { factor }).await
    }

    /// Read-only snapshot of the proxy registry
    pub fn active_objects(&self) -> &HashMap<String, ActiveObject> {
        &self.objects
    }

    /// Handle for object-addressed operations on a known proxy
    pub fn object(&mut self, name: &str) -> Option<ObjectHandle<'_>> {
        if self.objects.contains_key(name) {
            Some(ObjectHandle::new(self, name.to_string()))
        } else {
            None
        }
    }

    /// Editor command group for this session
    pub fn editor(&mut self) -> Editor<'_> {
        Editor::new(self)
    }

    /// Workflow command group for this session
    pub fn workflow(&mut self) -> Workflow<'_> {
        Workflow::new(self)
    }

    /// Close the transport and tear the backend down
    ///
    /// Dropping the session instead still kills the backend (the child is
    /// spawned kill-on-drop) but skips the bounded exit wait.
    pub async fn close(&mut self) -> Result<()> {
        self.link = None;
        self.objects.clear();
        if let Some(backend) = self.backend.take() {
            backend.shutdown(self.config.shutdown_grace).await?;
        }
        Ok(())
    }

    /// One-way command: write only, no reply expected
    pub(crate) async fn send(&mut self, request: Request) -> Result<()> {
        self.link_mut()?.send(&request).await
    }

    pub(crate) fn link_mut(&mut self) -> Result<&mut Link> {
        self.link.as_mut().ok_or(TwinError::NotConnected)
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::{connected_session, read_request};
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn render_returns_exactly_one_viewport_frame() {
        let (mut session, mut server) = connected_session(4, 2).await;

        let backend = tokio::spawn(async move {
            assert_eq!(read_request(&mut server).await, "scene.rtt()");
            server.write_all(&[0xCD; 4 * 2 * 4]).await.unwrap();
            server
        });

        let texture = session.render_to_texture().await.unwrap();
        assert_eq!(texture.width, 4);
        assert_eq!(texture.height, 2);
        assert_eq!(texture.rgba.len(), 4 * 2 * 4);
        assert!(texture.rgba.iter().all(|&b| b == 0xCD));
        assert!(texture.depth.is_none());

        backend.await.unwrap();
    }

    #[tokio::test]
    async fn play_produces_the_exact_wire_line() {
        let (mut session, mut server) = connected_session(2, 2).await;

        session.play(true).await.unwrap();
        session.play(false).await.unwrap();

        assert_eq!(read_request(&mut server).await, "scene.play(True)");
        assert_eq!(read_request(&mut server).await, "scene.play(False)");
    }

    #[tokio::test]
    async fn view_commands_are_one_way() {
        let (mut session, mut server) = connected_session(2, 2).await;

        session.rotate(15.0, -7.5).await.unwrap();
        session.pan(3.0, 4.0).await.unwrap();
        session.zoom(1.25).await.unwrap();

        assert_eq!(read_request(&mut server).await, "scene.rotate(15,-7.5)");
        assert_eq!(read_request(&mut server).await, "scene.pan(3,4)");
        assert_eq!(read_request(&mut server).await, "scene.zoom(1.25)");
    }

    #[tokio::test]
    async fn operations_before_load_fail_fast() {
        let mut session = Session::new(640, 480);
        assert!(!session.is_connected());

        assert!(matches!(
            session.play(true).await,
            Err(TwinError::NotConnected)
        ));
        assert!(matches!(
            session.render_to_texture().await,
            Err(TwinError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn load_with_empty_path_is_a_noop() {
        let mut session = Session::new(640, 480);
        session.load("").await.unwrap();

        assert!(!session.is_connected());
        assert!(session.backend.is_none());
    }

    #[tokio::test]
    async fn exhausted_connect_retry_leaves_transport_closed() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            // A stand-in binary that starts fine but never creates a socket
            backend_binary: Some(PathBuf::from("sleep")),
            work_dir: Some(dir.path().to_path_buf()),
            connect_attempts: 2,
            retry_delay: Duration::from_millis(10),
            ..SessionConfig::default()
        };
        let mut session = Session::with_config(640, 480, config);

        let result = session.load("30").await;
        assert!(matches!(result, Err(TwinError::Connect { attempts: 2, .. })));
        assert!(!session.is_connected());
        // The spawned process handle is retained for reaping
        assert!(session.backend.is_some());

        // Subsequent operations fail immediately instead of hanging
        assert!(matches!(
            session.play(true).await,
            Err(TwinError::NotConnected)
        ));

        session.close().await.unwrap();
        assert!(session.backend.is_none());
    }

    #[tokio::test]
    async fn load_surfaces_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            backend_binary: Some(PathBuf::from("/nonexistent/digitaltwin")),
            work_dir: Some(dir.path().to_path_buf()),
            ..SessionConfig::default()
        };
        let mut session = Session::with_config(640, 480, config);

        assert!(matches!(
            session.load("scene.json").await,
            Err(TwinError::Spawn(_))
        ));
        assert!(!session.is_connected());
        assert!(session.backend.is_none());
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let mut session = Session::new(2, 2);
        session.close().await.unwrap();
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn registry_starts_empty() {
        let (mut session, _server) = connected_session(2, 2).await;
        assert!(session.active_objects().is_empty());
        assert!(session.object("robot1").is_none());
    }
}
