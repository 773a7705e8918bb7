//! Shared slot holding the loaded resolver for the server.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info};

use super::PointResolver;
use crate::borders::{BorderDataset, CodeOverrides, DatasetSource};
use crate::error::{BorderError, UnavailableCause};

/// Load state of the border dataset
#[derive(Clone)]
pub enum BorderState {
    Loading,
    Ready(Arc<PointResolver>),
    /// Last load failed; resolution stays disabled until a reload succeeds
    Unavailable(String),
}

impl BorderState {
    pub fn name(&self) -> &'static str {
        match self {
            BorderState::Loading => "loading",
            BorderState::Ready(_) => "ready",
            BorderState::Unavailable(_) => "unavailable",
        }
    }
}

/// Cloneable handle to the current border state.
///
/// Readers take a snapshot `Arc` and never hold the lock while resolving.
#[derive(Clone)]
pub struct BorderHandle {
    state: Arc<RwLock<BorderState>>,
}

impl Default for BorderHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl BorderHandle {
    /// Create a handle in the `Loading` state
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(BorderState::Loading)),
        }
    }

    /// Create a handle that is already ready
    pub fn ready(resolver: PointResolver) -> Self {
        Self {
            state: Arc::new(RwLock::new(BorderState::Ready(Arc::new(resolver)))),
        }
    }

    pub async fn state(&self) -> BorderState {
        self.state.read().await.clone()
    }

    /// Current resolver, if the dataset is loaded
    pub async fn resolver(&self) -> Option<Arc<PointResolver>> {
        match &*self.state.read().await {
            BorderState::Ready(resolver) => Some(Arc::clone(resolver)),
            _ => None,
        }
    }

    /// Load the dataset and swap it in.
    ///
    /// A ready handle keeps serving the previous dataset until the new one is
    /// in place. On failure the handle becomes `Unavailable`.
    pub async fn reload(
        &self,
        source: &DatasetSource,
        overrides: &CodeOverrides,
    ) -> Result<Arc<PointResolver>, BorderError> {
        match build_resolver(source, overrides).await {
            Ok(resolver) => {
                info!(
                    "Border dataset ready: {} features, {} matchable",
                    resolver.dataset().len(),
                    resolver.matchable()
                );
                *self.state.write().await = BorderState::Ready(Arc::clone(&resolver));
                Ok(resolver)
            }
            Err(e) => {
                let message = error_chain(&e);
                error!("Border dataset unavailable: {}", message);
                *self.state.write().await = BorderState::Unavailable(message);
                Err(e)
            }
        }
    }
}

async fn build_resolver(
    source: &DatasetSource,
    overrides: &CodeOverrides,
) -> Result<Arc<PointResolver>, BorderError> {
    let dataset = Arc::new(BorderDataset::load(source, overrides).await?);

    tokio::task::spawn_blocking(move || PointResolver::new(dataset))
        .await
        .map(Arc::new)
        .map_err(|e| {
            BorderError::unavailable(source.to_string(), UnavailableCause::Task(e.to_string()))
        })
}

/// `outer: inner: ...` message for user-facing reports
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
