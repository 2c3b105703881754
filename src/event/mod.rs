mod level;
mod location;
mod log_event;

// Re-exporting all public structures
pub use level::Level;
pub use location::LocationInfo;
pub use log_event::{process_start_time, LogEvent};
