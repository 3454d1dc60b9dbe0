pub mod application;
pub mod job_description;
