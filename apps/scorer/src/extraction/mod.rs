pub mod document;
pub mod jd;
pub mod normalize;
pub mod resume;
pub mod vocab;
