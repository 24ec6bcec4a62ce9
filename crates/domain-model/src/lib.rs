pub mod file_node;
pub mod upload;

pub use file_node::*;
pub use upload::*;
