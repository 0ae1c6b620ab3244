pub mod app;
pub mod control_panel;
pub mod grid_view;
pub mod status_bar;
pub mod theme;
