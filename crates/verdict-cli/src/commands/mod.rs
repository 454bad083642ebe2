pub mod decision;
pub mod dispatch;
pub mod evidence;
pub mod feedback;
pub mod schema;
pub mod shared;
pub mod submission;
pub mod summary;
