pub mod bulk;
pub mod config;
pub mod form;
pub mod login;
pub mod roster;

pub use bulk::{BulkAction, BulkReport, Outcome};
pub use form::{SubmissionForm, SubmitLogic};
pub use login::LoginLogic;
pub use roster::{FeedStatus, RosterController};
