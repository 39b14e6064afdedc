//! Directory watching — react to new captures as they land on disk.

use std::future::Future;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::capture::is_capture_image;
use crate::client::RoastClient;
use crate::persona::RoastPersona;
use crate::types::{RoastError, RoastOutcome, RoastResult};

/// Handler invoked once per newly created image. Implementations must be
/// safe to call repeatedly; the watcher awaits each call inline, so
/// processing is strictly serialized in arrival order.
#[async_trait]
pub trait ImageSink: Send + Sync {
    async fn handle(&self, path: &Path) -> RoastResult<()>;
}

/// Production sink: roast the image and write the text beside it.
pub struct RoastSink {
    client: RoastClient,
    persona: RoastPersona,
    echo: bool,
}

impl RoastSink {
    pub fn new(client: RoastClient, persona: RoastPersona) -> Self {
        Self {
            client,
            persona,
            echo: false,
        }
    }

    /// Also print each roast to stdout, for interactive watch sessions.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

#[async_trait]
impl ImageSink for RoastSink {
    async fn handle(&self, path: &Path) -> RoastResult<()> {
        tracing::info!("Generating roast for {}", path.display());
        let outcome = RoastOutcome {
            image_path: path.to_path_buf(),
            text: self.client.roast_image(path, &self.persona).await,
        };

        if self.echo {
            println!("\nRoast result:\n{}", outcome.text);
        }

        let roast_file = outcome.sibling_path();
        tokio::fs::write(&roast_file, &outcome.text).await?;
        tracing::info!("Roast written to {}", roast_file.display());
        Ok(())
    }
}

/// Watches a single directory, non-recursively, and feeds newly created
/// capture images to an [`ImageSink`] one at a time.
pub struct DirectoryWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    dir: PathBuf,
}

impl DirectoryWatcher {
    /// Start watching `dir`, creating it first if absent.
    pub fn new(dir: &Path) -> RoastResult<Self> {
        std::fs::create_dir_all(dir)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                // Runs on the notify thread; the channel is unbounded so
                // this never blocks event delivery.
                let _ = tx.send(res);
            },
            notify::Config::default(),
        )
        .map_err(RoastError::Watch)?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(RoastError::Watch)?;

        tracing::info!("Watching for new images in {}", dir.display());

        Ok(Self {
            _watcher: watcher,
            rx,
            dir: dir.to_path_buf(),
        })
    }

    /// The watched directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Route one filesystem event: only create events for capture images
    /// reach the sink. A sink failure is logged and contained so one bad
    /// event cannot take the watch loop down. Returns the number of paths
    /// handled successfully.
    pub async fn dispatch<S: ImageSink + ?Sized>(event: &Event, sink: &S) -> usize {
        if !matches!(event.kind, EventKind::Create(_)) {
            return 0;
        }

        let mut handled = 0;
        for path in &event.paths {
            if !is_capture_image(path) {
                tracing::debug!("Ignoring non-capture path {}", path.display());
                continue;
            }
            tracing::info!("New image detected: {}", path.display());
            match sink.handle(path).await {
                Ok(()) => handled += 1,
                Err(e) => {
                    tracing::error!("Processing {} failed: {e}", path.display());
                }
            }
        }
        handled
    }

    /// Consume events until `shutdown` resolves. An in-flight sink call
    /// always completes before exit because dispatch is awaited inline.
    pub async fn run<S: ImageSink>(
        mut self,
        sink: &S,
        shutdown: impl Future<Output = ()>,
    ) -> RoastResult<()> {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Stopping watcher on {}", self.dir.display());
                    break;
                }
                event = self.rx.recv() => match event {
                    Some(Ok(event)) => {
                        Self::dispatch(&event, sink).await;
                    }
                    Some(Err(e)) => {
                        tracing::error!("Watch error: {e}");
                    }
                    None => break,
                },
            }
        }

        Ok(())
    }
}
