// PDF export: the HTTP handlers, the per-attempt pipeline, the retry policy
// around it and optional S3 persistence of finished files.

pub mod handlers;
pub mod retry;
pub mod service;
pub mod storage;
