pub mod global_config;
pub mod local_config;
pub mod parallel_launch;
