pub mod freehand;
pub mod shape;
