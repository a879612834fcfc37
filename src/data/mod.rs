pub mod pages;
pub mod sample;
pub mod vision;
