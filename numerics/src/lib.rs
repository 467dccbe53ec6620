mod matrix;
pub use matrix::*;

mod vector;
pub use vector::*;
