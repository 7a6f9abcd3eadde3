use super::messages::ServerMessage;
use super::seek::{Seek, Viewer, annotate_and_sort, find};
use super::seek_id::fresh_seek_id;
use crate::repository::RatingRepository;
use dashmap::DashMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, info};

pub const DEFAULT_RATING: u32 = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyError {
    SeekNotFound,
    /// Cancelling a seek that belongs to someone else
    NotOwner,
    /// Joining a seek the caller created
    OwnSeek,
    /// The connection is no longer registered
    NotConnected,
}

impl fmt::Display for LobbyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LobbyError::SeekNotFound => f.write_str("seek not found"),
            LobbyError::NotOwner => f.write_str("cannot cancel another player's seek"),
            LobbyError::OwnSeek => f.write_str("cannot join your own seek"),
            LobbyError::NotConnected => f.write_str("connection is closed"),
        }
    }
}

impl std::error::Error for LobbyError {}

impl From<LobbyError> for ServerMessage {
    fn from(err: LobbyError) -> Self {
        match err {
            LobbyError::SeekNotFound => ServerMessage::SeekNotFound,
            other => ServerMessage::Error {
                message: other.to_string(),
            },
        }
    }
}

/// Two players brought together by accepting a seek
#[derive(Debug)]
pub struct Pairing {
    pub seek: Seek,
    pub owner_sri: String,
    pub owner: Option<String>,
    pub joiner: Option<String>,
}

struct Client {
    viewer: Option<Viewer>,
    tx: broadcast::Sender<ServerMessage>,
}

/// Open seeks in arrival order, plus the connection that created each one
#[derive(Default)]
struct Board {
    seeks: Vec<Seek>,
    creators: HashMap<String, String>, // seek_id -> sri
}

impl Board {
    fn owns(&self, seek: &Seek, sri: &str, viewer: Option<&Viewer>) -> bool {
        seek.is_owned_by(viewer) || self.creators.get(&seek.id).map(String::as_str) == Some(sri)
    }

    fn remove(&mut self, id: &str) -> Option<Seek> {
        let pos = self.seeks.iter().position(|s| s.id == id)?;
        self.creators.remove(id);
        Some(self.seeks.remove(pos))
    }
}

pub struct LobbyState {
    ratings: RatingRepository,
    default_rating: u32,
    board: Mutex<Board>,
    clients: DashMap<String, Client>, // sri -> client
}

impl LobbyState {
    pub fn new(ratings: RatingRepository, default_rating: Option<u32>) -> Self {
        Self {
            ratings,
            default_rating: default_rating.unwrap_or(DEFAULT_RATING),
            board: Mutex::new(Board::default()),
            clients: DashMap::new(),
        }
    }

    fn board(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn viewer_of(&self, sri: &str) -> Option<Viewer> {
        self.clients.get(sri).and_then(|c| c.viewer.clone())
    }

    pub fn connect(&self, sri: &str, tx: broadcast::Sender<ServerMessage>) {
        debug!(sri, "Registering lobby client");
        self.clients
            .insert(sri.to_string(), Client { viewer: None, tx });
    }

    /// Set who is looking through this connection. Empty names count as anonymous.
    pub fn identify(&self, sri: &str, username: Option<String>) -> Option<Viewer> {
        let viewer = username.filter(|u| !u.is_empty()).map(Viewer::new);
        if let Some(mut client) = self.clients.get_mut(sri) {
            client.viewer = viewer.clone();
        }
        info!(sri, username = ?viewer.as_ref().map(|v| &v.username), "Lobby client identified");
        viewer
    }

    /// The lobby list as `viewer` should see it
    pub fn seeks_for(&self, viewer: Option<&Viewer>) -> Vec<Seek> {
        let mut seeks = self.board().seeks.clone();
        annotate_and_sort(&mut seeks, viewer);
        seeks
    }

    pub fn seeks_for_client(&self, sri: &str) -> Vec<Seek> {
        self.seeks_for(self.viewer_of(sri).as_ref())
    }

    pub fn find_seek(&self, id: &str) -> Option<Seek> {
        find(&self.board().seeks, id).cloned()
    }

    /// Open a seek for the client's viewer, replacing any seek they already have open.
    pub async fn add_seek(&self, sri: &str) -> Result<Seek, LobbyError> {
        let viewer = self.viewer_of(sri);

        let rating = match &viewer {
            Some(v) => self.ratings.get_rating(&v.username).await,
            None => None,
        }
        .unwrap_or(self.default_rating);

        let mut board = self.board();

        // Under the board lock: disconnect sweeps the board after dropping the client.
        if !self.clients.contains_key(sri) {
            return Err(LobbyError::NotConnected);
        }

        let replaced: Vec<String> = board
            .seeks
            .iter()
            .filter(|s| board.owns(s, sri, viewer.as_ref()))
            .map(|s| s.id.clone())
            .collect();
        for id in &replaced {
            debug!(sri, seek_id = id, "Replacing previous seek");
            board.remove(id);
        }

        let id = fresh_seek_id(|id| find(&board.seeks, id).is_some());
        let seek = Seek::new(id, viewer.map(|v| v.username), rating);
        board.creators.insert(seek.id.clone(), sri.to_string());
        board.seeks.push(seek.clone());

        info!(sri, seek_id = seek.id, username = ?seek.username, rating, "Seek created");
        Ok(seek)
    }

    pub fn cancel_seek(&self, sri: &str, id: &str) -> Result<Seek, LobbyError> {
        let viewer = self.viewer_of(sri);
        let mut board = self.board();

        let seek = find(&board.seeks, id).ok_or(LobbyError::SeekNotFound)?;
        if !board.owns(seek, sri, viewer.as_ref()) {
            return Err(LobbyError::NotOwner);
        }

        let seek = board.remove(id).ok_or(LobbyError::SeekNotFound)?;
        info!(sri, seek_id = id, "Seek cancelled");
        Ok(seek)
    }

    pub fn join_seek(&self, sri: &str, id: &str) -> Result<Pairing, LobbyError> {
        let viewer = self.viewer_of(sri);
        let mut board = self.board();

        if !self.clients.contains_key(sri) {
            return Err(LobbyError::NotConnected);
        }

        let seek = find(&board.seeks, id).ok_or(LobbyError::SeekNotFound)?;
        if board.owns(seek, sri, viewer.as_ref()) {
            return Err(LobbyError::OwnSeek);
        }

        let owner_sri = board
            .creators
            .get(id)
            .cloned()
            .ok_or(LobbyError::SeekNotFound)?;
        let seek = board.remove(id).ok_or(LobbyError::SeekNotFound)?;

        info!(sri, seek_id = id, owner = ?seek.username, "Seek accepted");
        Ok(Pairing {
            owner: seek.username.clone(),
            joiner: viewer.map(|v| v.username),
            owner_sri,
            seek,
        })
    }

    /// Forget the client and every seek it created
    pub fn disconnect(&self, sri: &str) {
        info!(sri, "Lobby client disconnected");
        self.clients.remove(sri);

        let mut board = self.board();
        let orphaned: Vec<String> = board
            .creators
            .iter()
            .filter(|(_, creator)| creator.as_str() == sri)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &orphaned {
            debug!(sri, seek_id = id, "Dropping seek of disconnected client");
            board.remove(id);
        }
    }

    pub fn send_to(&self, sri: &str, msg: ServerMessage) {
        let Some(client) = self.clients.get(sri) else {
            debug!(sri, "No such lobby client");
            return;
        };
        let _ = client.tx.send(msg);
    }

    /// Push every client its own view of the lobby
    pub fn publish(&self) {
        let seeks = self.board().seeks.clone();
        debug!(seeks = seeks.len(), clients = self.clients.len(), "Publishing lobby");

        for client in self.clients.iter() {
            let mut view = seeks.clone();
            annotate_and_sort(&mut view, client.viewer.as_ref());
            let _ = client.tx.send(ServerMessage::Seeks { seeks: view });
        }
    }
}
