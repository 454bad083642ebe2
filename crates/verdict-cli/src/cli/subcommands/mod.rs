mod decision;
mod evidence;
mod feedback;
mod submission;
mod summary;

pub use decision::DecisionCommands;
pub use evidence::EvidenceCommands;
pub use feedback::FeedbackCommands;
pub use submission::SubmissionCommands;
pub use summary::SummaryCommands;
