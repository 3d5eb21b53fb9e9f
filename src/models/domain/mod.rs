pub mod activity;
pub mod collection;
pub mod quiz;
pub mod session;
pub mod submission;

pub use activity::{Activity, ActivityType, Slide};
pub use collection::Collection;
pub use quiz::{PointType, Quiz, QuizAnswer, QuizLocationAnswer};
pub use session::{Participant, Session, SessionStatus};
pub use submission::Submission;
