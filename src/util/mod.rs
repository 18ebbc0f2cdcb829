pub mod exec;
pub mod fs;
