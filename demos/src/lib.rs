pub mod app_setup_options;
pub mod follow_camera;
pub mod levels_setup;
