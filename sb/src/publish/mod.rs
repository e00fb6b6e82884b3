//! Publishers: where the composed line goes
//!
//! Delivery is best effort. The Aggregator logs a failed publish and
//! carries on; the next update simply tries again.

mod error;
mod stdout;
mod xsetroot;

pub use error::PublishError;
pub use stdout::StdoutPublisher;
pub use xsetroot::XsetrootPublisher;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::PublisherKind;

/// Destination for the composed status line
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Deliver one composed line
    async fn publish(&self, text: &str) -> Result<(), PublishError>;
}

/// Build the publisher selected in the configuration
pub fn create_publisher(kind: PublisherKind) -> Arc<dyn Publisher> {
    match kind {
        PublisherKind::Xsetroot => Arc::new(XsetrootPublisher::new()),
        PublisherKind::Stdout => Arc::new(StdoutPublisher::new()),
    }
}
