pub mod config;
pub mod day;
pub mod import;
pub mod notify;
pub mod personal;
pub mod remote;
pub mod session;
pub mod sync;
pub mod task;
pub mod view;
