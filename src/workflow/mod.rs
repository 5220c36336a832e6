//! Multi-step processes: subject creation (create -> assign -> complete)
//! and the proposal review modal navigation.

mod review;
mod steps;

pub use review::{ReviewNavigator, ReviewView};
pub use steps::{ProcessResult, Step, WorkflowState};
