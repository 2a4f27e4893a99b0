pub mod generation;
pub mod poller;
pub mod publisher;
pub mod worker;
