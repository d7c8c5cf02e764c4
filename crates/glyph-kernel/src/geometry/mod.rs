pub mod bbox;
pub mod point;
pub mod polygon;
pub mod segment;
pub mod vector;
