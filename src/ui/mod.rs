pub mod app;
pub mod control_panel;
pub mod display_board;
