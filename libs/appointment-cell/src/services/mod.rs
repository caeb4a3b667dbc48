pub mod booking;
pub mod lifecycle;
pub mod resolver;
pub mod stats;
