pub mod config;
pub mod controller;
pub mod criteria;
pub mod error;
pub mod form;
pub mod params;
pub mod repository;
pub mod response;

#[cfg(test)]
pub mod testing;
