//! Workflow facade: backend-side script control
//!
//! All state (script source, run flag) lives backend-side; this side is a
//! fixed `workflow.*` command group with no local state beyond the session
//! borrow.

use twinlink_protocol::Request;
use twinlink_utils::Result;

use crate::session::Session;

/// Workflow command group, borrowing its session
pub struct Workflow<'a> {
    session: &'a mut Session,
}

impl<'a> Workflow<'a> {
    pub(crate) fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    /// Replace the workflow script source (one-way)
    pub async fn set(&mut self, src: &str) -> Result<()> {
        self.session
            .send(Request::WorkflowSet {
                src: src.to_string(),
            })
            .await
    }

    /// Fetch the workflow script source, verbatim
    pub async fn get(&mut self) -> Result<String> {
        let link = self.session.link_mut()?;
        link.send(&Request::WorkflowGet).await?;
        link.read_text_line().await
    }

    /// Start the workflow script (one-way)
    pub async fn start(&mut self) -> Result<()> {
        self.session.send(Request::WorkflowStart).await
    }

    /// Stop the workflow script (one-way)
    pub async fn stop(&mut self) -> Result<()> {
        self.session.send(Request::WorkflowStop).await
    }

    /// Fetch the active-object node listing, verbatim
    pub async fn active_obj_nodes(&mut self) -> Result<String> {
        let link = self.session.link_mut()?;
        link.send(&Request::WorkflowNodes).await?;
        link.read_text_line().await
    }
}

#[cfg(test)]
mod tests {
    use crate::session::testutil::{connected_session, read_request};
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn set_start_stop_are_one_way() {
        let (mut session, mut server) = connected_session(2, 2).await;

        {
            let mut workflow = session.workflow();
            workflow.set("move_to(robot1, bin)").await.unwrap();
            workflow.start().await.unwrap();
            workflow.stop().await.unwrap();
        }

        assert_eq!(
            read_request(&mut server).await,
            "workflow.set('move_to(robot1, bin)')"
        );
        assert_eq!(read_request(&mut server).await, "workflow.start()");
        assert_eq!(read_request(&mut server).await, "workflow.stop()");
    }

    #[tokio::test]
    async fn get_returns_the_script_verbatim() {
        let (mut session, mut server) = connected_session(2, 2).await;

        let backend = tokio::spawn(async move {
            assert_eq!(read_request(&mut server).await, "workflow.get()");
            // Raw text, not JSON; returned without interpretation
            server
                .write_all(b"move_to(robot1, bin) # not json\n")
                .await
                .unwrap();
            server
        });

        let src = session.workflow().get().await.unwrap();
        assert_eq!(src, "move_to(robot1, bin) # not json");

        backend.await.unwrap();
    }

    #[tokio::test]
    async fn node_listing_round_trips_as_raw_text() {
        let (mut session, mut server) = connected_session(2, 2).await;

        let backend = tokio::spawn(async move {
            assert_eq!(
                read_request(&mut server).await,
                "workflow.get_active_obj_nodes()"
            );
            server.write_all(b"robot1;cam0;placer0\n").await.unwrap();
            server
        });

        let nodes = session.workflow().active_obj_nodes().await.unwrap();
        assert_eq!(nodes, "robot1;cam0;placer0");

        backend.await.unwrap();
    }
}
