pub mod catalog;
pub mod client;
pub mod draw;
pub mod error;
pub mod form;
pub mod networking;
pub mod protocol;
pub mod state;
