mod http;
pub mod messages;
pub mod seek;
mod seek_id;
mod state;
mod ws_handler;

pub use http::{get_seek, list_seeks};
pub use state::{DEFAULT_RATING, LobbyError, LobbyState, Pairing};
pub use ws_handler::handle_connection;
