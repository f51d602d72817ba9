pub mod bounds;
pub mod builder;
pub mod config;
pub mod constants;
pub mod document;
pub mod geo;
pub mod map;
