pub mod check;
pub mod log;
