#![forbid(unsafe_code)]

pub mod file;
pub mod repository;
