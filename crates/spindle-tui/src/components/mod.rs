pub mod header;
pub mod help_overlay;
pub mod hero;
pub mod track_info;
pub mod track_list;
pub mod turntable;
