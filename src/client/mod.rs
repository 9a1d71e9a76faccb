pub mod forms;
pub mod http;
pub mod poller;
pub mod session;
pub mod state;
pub mod views;
