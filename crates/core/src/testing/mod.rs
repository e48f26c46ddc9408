//! Testing utilities and mock implementations for E2E tests.
//!
//! Mock implementations of the external service traits, allowing pipeline
//! and dispatcher tests without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use scribe_core::testing::{MockBlobStore, MockProvider, MockTransformer};
//!
//! let provider = Arc::new(MockProvider::new());
//! provider.push_state(Ok(NotetakerState::MediaAvailable));
//! provider.set_events(vec![/* events */]);
//!
//! // Use in MediaPipeline / CalendarDispatcher...
//! ```

mod mock_blob_store;
mod mock_provider;
mod mock_transformer;

pub use mock_blob_store::MockBlobStore;
pub use mock_provider::MockProvider;
pub use mock_transformer::MockTransformer;
