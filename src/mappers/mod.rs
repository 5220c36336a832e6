//! Total transforms between wire records and view models. Missing data is
//! defaulted, never reported.

mod format;
mod pea;
mod proposal;
mod subject;
mod user;

pub use format::{format_date_display, format_date_input, parse_date, parse_timestamp, NOT_SET, UNKNOWN_ROLE};
pub use pea::{pea_draft_from_analysis, pea_from_api, pea_payload_from_draft};
pub use proposal::{map_modal_to_api, map_proposal_to_modal, proposal_from_api};
pub use subject::{subject_from_api, transform_subject_form_to_payload, visible_subjects};
pub use user::{role_label, user_view_from_api};
