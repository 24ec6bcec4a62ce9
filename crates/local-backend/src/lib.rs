pub mod backend;
mod paths;
mod registry;
mod transfer;

pub use backend::*;
