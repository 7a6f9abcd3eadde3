use serde::{Deserialize, Serialize};

/// What the viewer can do with a seek in the lobby list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeekAction {
    #[default]
    JoinSeek,
    CancelSeek,
}

/// An open request to play, waiting for an opponent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seek {
    pub id: String,
    pub username: Option<String>,
    pub rating: u32,
    #[serde(default)]
    pub action: SeekAction,
}

impl Seek {
    pub fn new(id: impl Into<String>, username: Option<String>, rating: u32) -> Self {
        Self {
            id: id.into(),
            username,
            rating,
            action: SeekAction::default(),
        }
    }

    pub fn is_owned_by(&self, viewer: Option<&Viewer>) -> bool {
        match (viewer, &self.username) {
            (Some(viewer), Some(username)) => viewer.username == *username,
            _ => false,
        }
    }
}

/// The identified user looking at the lobby. Anonymous visitors have none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub username: String,
}

impl Viewer {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Label every seek for `viewer`, then order by rating.
pub fn annotate_and_sort(seeks: &mut [Seek], viewer: Option<&Viewer>) {
    for seek in seeks.iter_mut() {
        seek.action = if seek.is_owned_by(viewer) {
            SeekAction::CancelSeek
        } else {
            SeekAction::JoinSeek
        };
    }
    sort(seeks);
}

/// Highest rating first. Equal ratings keep their insertion order.
pub fn sort(seeks: &mut [Seek]) {
    seeks.sort_by(|a, b| b.rating.cmp(&a.rating));
}

pub fn find<'a>(seeks: &'a [Seek], id: &str) -> Option<&'a Seek> {
    seeks.iter().find(|s| s.id == id)
}
