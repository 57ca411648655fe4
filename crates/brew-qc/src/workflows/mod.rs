pub mod ordering;
pub mod samples;
