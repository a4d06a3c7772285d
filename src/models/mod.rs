pub mod deadline;
pub mod outcome;
pub mod roster;

pub use deadline::{DeadlinePolicy, DeadlineRecord, DeadlineStatus};
pub use outcome::TestOutcome;
pub use roster::{Roster, RosterEntry};
