pub mod event;
pub mod notice;
pub mod profile;
pub mod registration;
pub mod user;

pub use event::{Club, Event, EventCategory, EventDraft, EventPatch};
pub use notice::{Notice, NoticeCategory, NoticeDraft};
pub use profile::{NotificationPreferences, ProfilePatch, UserProfile};
pub use registration::Registration;
pub use user::{AuthUser, UserRecord};
