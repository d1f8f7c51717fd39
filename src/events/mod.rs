pub mod dashboard;
pub mod editor;
pub mod feed;
pub mod filter;

pub use dashboard::{DashboardStats, DashboardSummary};
pub use editor::{EditorError, EventEditor, PendingUpload};
pub use feed::EventFeed;
pub use filter::{EventFilter, Selection};
