pub mod geometry;
pub mod map;
pub mod planning;
pub mod system;
