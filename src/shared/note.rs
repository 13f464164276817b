/**
 * Note Data Model
 *
 * A note is a store-assigned id plus an open set of named fields. The field
 * set is shaped by the collection schema on the server, so on the wire a note
 * is a flat JSON object: `{"id": "...", "title": "...", "x": 10}`.
 *
 * A snapshot is every note in the collection keyed by id. It is rebuilt from
 * the store for every broadcast and never cached.
 */
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier assigned by the store when a note is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Generate a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for NoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for NoteId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A single field value.
///
/// The set of kinds is closed: scalars and lists of scalars.
/// Nested objects do not decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit null, clears a field
    Null,
    /// Boolean value
    Bool(bool),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Text value
    Text(String),
    /// List of values
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Name of the value kind, used in validation messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Integer(_) | FieldValue::Float(_) => "number",
            FieldValue::Text(_) => "text",
            FieldValue::List(_) => "list",
        }
    }

    /// Whether the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Named fields of a note, or a partial patch of them.
pub type Fields = BTreeMap<String, FieldValue>;

/// A persisted note.
///
/// # Example
/// ```rust
/// use notehub::shared::{Fields, Note, NoteId};
///
/// let mut fields = Fields::new();
/// fields.insert("title".to_string(), "groceries".into());
/// let note = Note::new(NoteId::new(), fields);
///
/// let json = serde_json::to_value(&note).unwrap();
/// assert_eq!(json["title"], "groceries");
/// assert_eq!(json["id"], note.id.to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned id
    pub id: NoteId,
    /// Schema-defined fields, flattened next to `id` on the wire
    #[serde(flatten)]
    pub fields: Fields,
}

impl Note {
    /// Create a note from an id and its fields
    pub fn new(id: NoteId, fields: Fields) -> Self {
        Self { id, fields }
    }

    /// Merge a partial patch into this note.
    ///
    /// Only the keys present in `patch` are overwritten; every other field is
    /// left as it was.
    pub fn merge(&mut self, patch: Fields) {
        self.fields.extend(patch);
    }

    /// Look up a single field
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Every note in the collection, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<NoteId, Note>);

impl Snapshot {
    /// Empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the snapshot holds no notes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a note by id
    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.0.get(id)
    }

    /// Whether a note with this id is present
    pub fn contains(&self, id: &NoteId) -> bool {
        self.0.contains_key(id)
    }

    /// Insert or replace a note
    pub fn insert(&mut self, note: Note) -> Option<Note> {
        self.0.insert(note.id, note)
    }

    /// Remove a note by id
    pub fn remove(&mut self, id: &NoteId) -> Option<Note> {
        self.0.remove(id)
    }

    /// Iterate over notes in id order
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.0.values()
    }
}

impl FromIterator<Note> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Note>>(iter: I) -> Self {
        Self(iter.into_iter().map(|note| (note.id, note)).collect())
    }
}

impl IntoIterator for Snapshot {
    type Item = (NoteId, Note);
    type IntoIter = std::collections::btree_map::IntoIter<NoteId, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
