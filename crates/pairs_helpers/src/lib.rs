mod app;
pub use app::*;

pub mod overlay;
pub mod restart;
