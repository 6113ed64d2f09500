mod color;
mod point;
mod vector;

pub use color::*;
pub use point::*;
pub use vector::*;
