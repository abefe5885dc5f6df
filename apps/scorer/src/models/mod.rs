pub mod jd;
pub mod report;
pub mod resume;
