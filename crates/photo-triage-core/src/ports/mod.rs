//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the triage core and the
//! collaborators it does not own: upload delivery, scoring, progress display
//! and view rendering.

mod progress;
mod scorer;
mod upload_source;
mod view_output;

pub use progress::{NoProgress, ProgressEvent, ProgressSink};
pub use scorer::Scorer;
pub use upload_source::{UnreadableUpload, UploadSource};
pub use view_output::ViewOutput;
