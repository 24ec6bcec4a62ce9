pub mod transport;
pub mod ops;
pub mod tracker;

pub use transport::*;
pub use ops::*;
pub use tracker::*;
