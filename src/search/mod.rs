pub mod controller;
pub mod request;
pub mod sequencer;
pub mod traits;

mod tests;

pub use controller::{FetchState, ResultBatch, SearchController, SearchOutcome};
pub use request::{build_request, SearchRequest};
pub use sequencer::{SearchSequencer, SearchTicket};
pub use traits::SearchBackend;
