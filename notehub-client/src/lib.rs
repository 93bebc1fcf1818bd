pub mod api;
pub mod api_client;
pub mod cache;
pub mod error;
pub mod router;
pub mod session;
pub mod settings;
pub mod utils;
pub mod view;

mod hub;

pub use error::ApiError;
pub use hub::NoteHub;
