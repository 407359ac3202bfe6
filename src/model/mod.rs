pub mod frame;
pub mod sketch;
pub mod stroke;
