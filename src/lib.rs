pub mod admission;
pub mod evaluation;
pub mod filters;
pub mod frame;
pub mod geometry;
pub mod io;
pub mod rotation;
pub mod session;
