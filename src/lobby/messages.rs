use super::seek::Seek;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Identify the viewer; `None` or an empty name means anonymous
    Hello {
        #[serde(default)]
        username: Option<String>,
    },
    AddSeek,
    CancelSeek {
        id: String,
    },
    JoinSeek {
        id: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full lobby list, annotated for the receiving viewer
    Seeks {
        seeks: Vec<Seek>,
    },
    SeekCreated {
        seek: Seek,
    },
    Paired {
        seek_id: String,
        opponent: Option<String>,
    },
    SeekNotFound,
    Error {
        message: String,
    },
}
