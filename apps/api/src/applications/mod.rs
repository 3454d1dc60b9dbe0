// Applications: resume submission (extract → score → store → persist), listing,
// manual shortlist override, and recruiter statistics.

pub mod handlers;
pub mod queries;
pub mod stats;
pub mod submit;
