/**
 * Socket Event Contract
 *
 * Every WebSocket text frame carries one event encoded as a JSON array whose
 * first element is the event name and whose remaining elements are the
 * arguments:
 *
 * ```text
 * server -> client   ["notes", {"<id>": {"id": "<id>", "title": "x"}}]
 * server -> client   ["error", "create failed"]
 * client -> server   ["createNote", {"title": "x"}]
 * client -> server   ["updateNote", "<id>", {"title": "y"}]
 * client -> server   ["deleteNote", "<id>"]
 * ```
 */
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::shared::error::SharedError;
use crate::shared::note::{Fields, NoteId, Snapshot};

/// Event names on the wire
pub mod names {
    /// Full snapshot, server to client
    pub const NOTES: &str = "notes";
    /// Scoped failure notice, server to client
    pub const ERROR: &str = "error";
    /// Create request, client to server
    pub const CREATE_NOTE: &str = "createNote";
    /// Partial update request, client to server
    pub const UPDATE_NOTE: &str = "updateNote";
    /// Delete request, client to server
    pub const DELETE_NOTE: &str = "deleteNote";
}

/// Fixed payloads of the `error` event
pub mod messages {
    /// A `createNote` request failed
    pub const CREATE_FAILED: &str = "create failed";
    /// An `updateNote` request failed
    pub const UPDATE_FAILED: &str = "update failed";
    /// A `deleteNote` request failed
    pub const DELETE_FAILED: &str = "delete failed";
    /// The snapshot for a new connection could not be loaded
    pub const FETCH_FAILED: &str = "fetch failed";
    /// The frame did not decode into a known event
    pub const INVALID_EVENT: &str = "invalid event";
}

/// Event sent by a client
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Create a note with the given fields
    CreateNote {
        /// Fields of the new note
        fields: Fields,
    },
    /// Merge fields into an existing note
    UpdateNote {
        /// Target note
        id: NoteId,
        /// Fields to overwrite
        fields: Fields,
    },
    /// Delete a note
    DeleteNote {
        /// Target note
        id: NoteId,
    },
}

impl ClientEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::CreateNote { .. } => names::CREATE_NOTE,
            ClientEvent::UpdateNote { .. } => names::UPDATE_NOTE,
            ClientEvent::DeleteNote { .. } => names::DELETE_NOTE,
        }
    }

    /// Payload of the `error` event sent back when this request fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            ClientEvent::CreateNote { .. } => messages::CREATE_FAILED,
            ClientEvent::UpdateNote { .. } => messages::UPDATE_FAILED,
            ClientEvent::DeleteNote { .. } => messages::DELETE_FAILED,
        }
    }

    /// Decode a text frame
    pub fn from_frame(text: &str) -> Result<Self, SharedError> {
        let (name, args) = split_frame(text)?;
        match name.as_str() {
            names::CREATE_NOTE => {
                let [fields] = take_args::<1>(&name, args)?;
                Ok(ClientEvent::CreateNote {
                    fields: decode_arg(&name, "fields", fields)?,
                })
            }
            names::UPDATE_NOTE => {
                let [id, fields] = take_args::<2>(&name, args)?;
                Ok(ClientEvent::UpdateNote {
                    id: decode_arg(&name, "id", id)?,
                    fields: decode_arg(&name, "fields", fields)?,
                })
            }
            names::DELETE_NOTE => {
                let [id] = take_args::<1>(&name, args)?;
                Ok(ClientEvent::DeleteNote {
                    id: decode_arg(&name, "id", id)?,
                })
            }
            other => Err(SharedError::protocol(format!("unknown event '{}'", other))),
        }
    }

    /// Encode as a text frame
    pub fn to_frame(&self) -> Result<String, SharedError> {
        let value = match self {
            ClientEvent::CreateNote { fields } => {
                serde_json::json!([names::CREATE_NOTE, fields])
            }
            ClientEvent::UpdateNote { id, fields } => {
                serde_json::json!([names::UPDATE_NOTE, id, fields])
            }
            ClientEvent::DeleteNote { id } => serde_json::json!([names::DELETE_NOTE, id]),
        };
        Ok(serde_json::to_string(&value)?)
    }
}

/// Event sent by the server
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Full snapshot of the collection
    Notes(Snapshot),
    /// Failure notice for the receiving socket only
    Error(String),
}

impl ServerEvent {
    /// Create an error event
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error(message.into())
    }

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Notes(_) => names::NOTES,
            ServerEvent::Error(_) => names::ERROR,
        }
    }

    /// Encode as a text frame
    pub fn to_frame(&self) -> Result<String, SharedError> {
        let value = match self {
            ServerEvent::Notes(snapshot) => serde_json::json!([names::NOTES, snapshot]),
            ServerEvent::Error(message) => serde_json::json!([names::ERROR, message]),
        };
        Ok(serde_json::to_string(&value)?)
    }

    /// Decode a text frame
    pub fn from_frame(text: &str) -> Result<Self, SharedError> {
        let (name, args) = split_frame(text)?;
        match name.as_str() {
            names::NOTES => {
                let [snapshot] = take_args::<1>(&name, args)?;
                Ok(ServerEvent::Notes(decode_arg(&name, "snapshot", snapshot)?))
            }
            names::ERROR => {
                let [message] = take_args::<1>(&name, args)?;
                Ok(ServerEvent::Error(decode_arg(&name, "message", message)?))
            }
            other => Err(SharedError::protocol(format!("unknown event '{}'", other))),
        }
    }
}

fn split_frame(text: &str) -> Result<(String, Vec<Value>), SharedError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(mut items) = value else {
        return Err(SharedError::protocol("frame is not a JSON array"));
    };
    if items.is_empty() {
        return Err(SharedError::protocol("frame has no event name"));
    }
    match items.remove(0) {
        Value::String(name) => Ok((name, items)),
        _ => Err(SharedError::protocol("event name is not a string")),
    }
}

fn take_args<const N: usize>(name: &str, args: Vec<Value>) -> Result<[Value; N], SharedError> {
    let count = args.len();
    args.try_into().map_err(|_| {
        SharedError::protocol(format!(
            "'{}' takes {} argument(s), got {}",
            name, N, count
        ))
    })
}

fn decode_arg<T: DeserializeOwned>(event: &str, arg: &str, value: Value) -> Result<T, SharedError> {
    serde_json::from_value(value)
        .map_err(|e| SharedError::protocol(format!("bad '{}' for '{}': {}", arg, event, e)))
}
