pub mod analysis;
pub mod assignment;
pub mod pea;
pub mod proposal;
pub mod subject;
pub mod user;

pub use assignment::{Assignment, AssignmentPayload, StudentCandidate};
pub use pea::{ApiPea, KeyConcept, Pea, PeaDraft, PeaPayload};
pub use proposal::{ApiProposal, ApprovalStatus, DifficultyLevel, ObjectiveType, Proposal, ProposalForm};
pub use subject::{ApiSubject, EnrollmentState, Journey, Subject, SubjectDraft, SubjectForm, SubjectPayload, TutorSelection};
pub use user::{ApiUser, Role, User, UserListMode, UserView};
