pub mod clean;
pub mod compile;
