pub mod control_button;
pub mod video_view;
