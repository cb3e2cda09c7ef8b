//! Per-call configuration recorded on synthesized request heads.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tonic::metadata::MetadataMap;

/// Options applied to a single call.
///
/// The fake transport copies these onto the synthesized [`RequestHead`]
/// so that registered fakes can assert on them. It does not act on them:
/// deadlines and retries are the business of a real channel.
///
/// [`RequestHead`]: crate::RequestHead
#[derive(Clone, Debug, Default)]
pub struct CallOptions {
    metadata: MetadataMap,
    timeout: Option<Duration>,
    request_id_provider: RequestIdProvider,
}

impl CallOptions {
    /// Creates options with empty metadata, no timeout, and autogenerated
    /// request ids.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a reference to the custom call metadata.
    pub fn metadata(&self) -> &MetadataMap {
        &self.metadata
    }

    /// Get a mutable reference to the custom call metadata.
    pub fn metadata_mut(&mut self) -> &mut MetadataMap {
        &mut self.metadata
    }

    /// The configured timeout, if any. Never enforced by the fake.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Set a timeout. Recorded on the request head, never enforced.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    /// The strategy used to produce request ids.
    pub fn request_id_provider(&self) -> &RequestIdProvider {
        &self.request_id_provider
    }

    /// Set the strategy used to produce request ids.
    pub fn set_request_id_provider(&mut self, provider: RequestIdProvider) {
        self.request_id_provider = provider;
    }
}

/// Strategy for producing the request id attached to a synthesized
/// request head.
#[derive(Clone)]
pub enum RequestIdProvider {
    /// A fresh process-wide sequential id per call.
    Autogenerated,
    /// The same caller-supplied id for every call.
    Constant(String),
    /// A caller-supplied generator invoked once per call.
    Generator(Arc<dyn Fn() -> String + Send + Sync>),
}

impl RequestIdProvider {
    pub(crate) fn request_id(&self) -> String {
        match self {
            RequestIdProvider::Autogenerated => {
                static NEXT: AtomicU64 = AtomicU64::new(0);
                format!("fake-{}", NEXT.fetch_add(1, Ordering::Relaxed))
            }
            RequestIdProvider::Constant(id) => id.clone(),
            RequestIdProvider::Generator(generate) => generate(),
        }
    }
}

impl Default for RequestIdProvider {
    fn default() -> Self {
        RequestIdProvider::Autogenerated
    }
}

impl fmt::Debug for RequestIdProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestIdProvider::Autogenerated => f.write_str("Autogenerated"),
            RequestIdProvider::Constant(id) => f.debug_tuple("Constant").field(id).finish(),
            RequestIdProvider::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RequestIdProvider;
    use std::sync::Arc;

    #[test]
    fn autogenerated_ids_are_distinct() {
        let provider = RequestIdProvider::Autogenerated;
        assert_ne!(provider.request_id(), provider.request_id());
    }

    #[test]
    fn constant_ids_repeat() {
        let provider = RequestIdProvider::Constant("req-42".to_owned());
        assert_eq!(provider.request_id(), "req-42");
        assert_eq!(provider.request_id(), "req-42");
    }

    #[test]
    fn generator_runs_the_caller_strategy() {
        let provider = RequestIdProvider::Generator(Arc::new(|| "generated".to_owned()));
        assert_eq!(provider.request_id(), "generated");
    }
}
