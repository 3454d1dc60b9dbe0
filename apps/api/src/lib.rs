//! Resume shortlisting service: job-description CRUD, resume submission, and the
//! TF-IDF matching engine that scores each resume against its job description.

pub mod applications;
pub mod config;
pub mod db;
pub mod errors;
pub mod jobs;
pub mod matching;
pub mod models;
pub mod routes;
pub mod state;
pub mod storage;
