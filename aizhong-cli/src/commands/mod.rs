pub mod fetch;
pub mod status;
pub mod watch;

pub use fetch::handle_fetch_command;
pub use status::handle_status_command;
pub use watch::handle_watch_command;
