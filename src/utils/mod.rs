pub mod export;
pub mod math;
