
mod error;
pub use error::*;
pub mod graph;
pub mod loader;
pub mod route;
pub mod travelling_salesman;
