//! Event wiring between a page (or CLI) and the chart controller.
//!
//! The host turns button presses and layout notifications into controller
//! calls. Nothing it does can fail outward: every error is logged and the
//! controller is left in whatever consistent state it reached.

use super::controller::{ChartController, RenderTicket};
use super::export::DownloadSink;
use super::renderer::{Renderer, RendererLoader};
use crate::error::Result;
use crate::table::TableSource;
use tracing::{debug, warn};

/// Something the user or the page did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The page's run button: redraw, or extract and build.
    Run,
    /// The chart's open/close control.
    Toggle,
    /// The chart's save control.
    Save,
    /// Layout has settled after the chart was re-opened.
    LayoutSettled,
    /// The chart area changed size (width, height in pixels).
    Resize(u32, u32),
}

/// Routes [`HostEvent`]s to a [`ChartController`].
pub struct ChartHost<S, R: Renderer, D> {
    source: S,
    controller: ChartController<R>,
    sink: D,
    pending: Option<RenderTicket>,
}

impl<S, R, D> ChartHost<S, R, D>
where
    S: TableSource,
    R: Renderer,
    D: DownloadSink,
{
    /// Wire a table source, controller and download sink together.
    pub fn new(source: S, controller: ChartController<R>, sink: D) -> Self {
        Self {
            source,
            controller,
            sink,
            pending: None,
        }
    }

    /// Load the renderer, then build the chart from the table.
    ///
    /// Returns whether a chart is showing afterwards.
    pub async fn start<L>(&mut self, loader: L) -> bool
    where
        L: RendererLoader<Renderer = R>,
    {
        if let Err(e) = self.controller.ensure_renderer(loader).await {
            warn!(error = %e, "chart renderer failed to load");
            return false;
        }
        self.dispatch(HostEvent::Run)
    }

    /// Handle one event. Returns whether it succeeded.
    pub fn dispatch(&mut self, event: HostEvent) -> bool {
        match self.handle(event) {
            Ok(()) => true,
            Err(e) => {
                warn!(?event, error = %e, "chart action failed");
                false
            }
        }
    }

    /// Handle one event and, when it scheduled a deferred render, yield to
    /// the runtime once so layout can settle, then draw.
    pub async fn dispatch_and_settle(&mut self, event: HostEvent) -> bool {
        let ok = self.dispatch(event);
        if self.pending.is_some() {
            tokio::task::yield_now().await;
            return self.dispatch(HostEvent::LayoutSettled);
        }
        ok
    }

    fn handle(&mut self, event: HostEvent) -> Result<()> {
        match event {
            HostEvent::Run => {
                self.pending = None;
                let ticket = self.controller.rebuild_on_demand(&self.source)?;
                self.pending = ticket;
                Ok(())
            }
            HostEvent::Toggle => {
                self.pending = self.controller.toggle()?;
                Ok(())
            }
            HostEvent::Save => {
                let export = self.controller.export()?;
                self.sink.deliver(export)
            }
            HostEvent::Resize(width, height) => {
                self.controller.resize(width, height)?;
                if self.controller.instance().is_some() {
                    self.pending = None;
                }
                Ok(())
            }
            HostEvent::LayoutSettled => match self.pending.take() {
                Some(ticket) => self.controller.layout_settled(ticket).map(|_| ()),
                None => {
                    debug!("layout settled with no render pending");
                    Ok(())
                }
            },
        }
    }

    /// Whether a deferred render is waiting for layout.
    #[must_use]
    pub fn has_pending_render(&self) -> bool {
        self.pending.is_some()
    }

    /// The controller.
    pub fn controller(&self) -> &ChartController<R> {
        &self.controller
    }

    /// The download sink.
    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Mutable access to the download sink.
    pub fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }

    /// Split into source, controller and sink.
    pub fn into_parts(self) -> (S, ChartController<R>, D) {
        (self.source, self.controller, self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::controller::ChartState;
    use crate::chart::export::Export;
    use crate::chart::renderer::{FramebufferRenderer, Preloaded};
    use crate::config::ChartConfig;
    use crate::table::DelimitedTable;
    use tokio::sync::oneshot;

    const TABLE: &str = "T,Irish,British\ns,40,36\nAverage,40,36\n";

    fn config() -> ChartConfig {
        ChartConfig {
            width: 200,
            height: 150,
            ..ChartConfig::default()
        }
    }

    fn host() -> ChartHost<DelimitedTable, FramebufferRenderer, Vec<Export>> {
        ChartHost::new(DelimitedTable::from_text(TABLE), ChartController::new(config()), Vec::new())
    }

    #[tokio::test]
    async fn test_start_builds_chart() {
        let mut host = host();
        assert!(host.start(Preloaded(FramebufferRenderer)).await);
        assert_eq!(host.controller().state(), ChartState::Visible);
    }

    #[tokio::test]
    async fn test_start_with_failed_loader() {
        let mut host = host();
        let (tx, rx) = oneshot::channel::<FramebufferRenderer>();
        drop(tx);

        assert!(!host.start(rx).await);
        assert!(!host.controller().renderer_ready());
    }

    #[test]
    fn test_events_before_renderer_are_reported() {
        let mut host = host();
        assert!(!host.dispatch(HostEvent::Run));
        assert!(!host.dispatch(HostEvent::Toggle));
        assert!(!host.dispatch(HostEvent::Save));
        assert!(host.dispatch(HostEvent::LayoutSettled));
        assert_eq!(host.controller().state(), ChartState::Absent);
    }

    #[tokio::test]
    async fn test_save_delivers_png() {
        let mut host = host();
        host.start(Preloaded(FramebufferRenderer)).await;

        assert!(host.dispatch(HostEvent::Save));
        let saved = &host.sink()[0];
        assert_eq!(saved.filename, "ancestry-chart.png");
        assert!(saved.data_url().starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_toggle_round_trip_through_host() {
        let mut host = host();
        host.start(Preloaded(FramebufferRenderer)).await;

        assert!(host.dispatch_and_settle(HostEvent::Toggle).await);
        assert_eq!(host.controller().state(), ChartState::Hidden);
        assert!(!host.dispatch(HostEvent::Save), "nothing to save while hidden");

        assert!(host.dispatch_and_settle(HostEvent::Toggle).await);
        assert!(!host.has_pending_render());
        assert_eq!(host.controller().state(), ChartState::Visible);
        assert!(host.controller().instance().is_some());
    }

    #[tokio::test]
    async fn test_run_reopens_hidden_chart_after_layout() {
        let mut host = host();
        host.start(Preloaded(FramebufferRenderer)).await;
        host.dispatch(HostEvent::Toggle);

        assert!(host.dispatch(HostEvent::Run));
        assert!(host.has_pending_render());
        assert!(host.controller().instance().is_none());

        assert!(host.dispatch(HostEvent::LayoutSettled));
        assert!(host.controller().instance().is_some());
    }

    #[tokio::test]
    async fn test_resize_event_redraws_at_new_size() {
        let mut host = host();
        host.start(Preloaded(FramebufferRenderer)).await;

        assert!(host.dispatch(HostEvent::Resize(320, 240)));
        let surface = host.controller().section().unwrap().surface();
        assert_eq!(surface.framebuffer().unwrap().width(), 320);

        assert!(host.dispatch(HostEvent::Save));
        assert_eq!(host.sink().len(), 1);

        assert!(!host.dispatch(HostEvent::Resize(0, 240)));
        assert_eq!(host.controller().state(), ChartState::Visible);
    }

    #[tokio::test]
    async fn test_run_supersedes_pending_render() {
        let mut host = host();
        host.start(Preloaded(FramebufferRenderer)).await;
        host.dispatch(HostEvent::Toggle);
        host.dispatch(HostEvent::Toggle);
        assert!(host.has_pending_render());

        assert!(host.dispatch(HostEvent::Run));
        assert!(!host.has_pending_render());
        assert!(host.controller().instance().is_some());
    }
}
