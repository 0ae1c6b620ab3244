pub mod geometry;
pub mod grid;
pub mod interaction;
pub mod schedule;
pub mod velocity;
