pub mod environment;
pub mod guidance;
pub mod launch_stages;
pub mod mission;
pub mod staging;
