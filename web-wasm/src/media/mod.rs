//! カメラと撮影

pub mod camera;
pub mod capture;
