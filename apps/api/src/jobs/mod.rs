// Job descriptions: recruiter-facing CRUD. Deletion is soft (is_active = false) so
// existing applications keep their reference.

pub mod handlers;
pub mod queries;
