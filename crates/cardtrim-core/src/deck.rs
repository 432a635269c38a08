//! Flashcard deck documents.
//!
//! A deck is a JSON object whose `cards` array holds card objects. Only the
//! `pronunciation` field of a card is ever touched; everything else,
//! including key order, passes through as parsed.
//!
//! Numbers are kept as their source text, so integers wider than 64 bits
//! and floats like `1.50` are written back exactly as they were read.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::DeckShapeError;

/// Field holding the card list.
pub const CARDS_FIELD: &str = "cards";

/// Card field that gets shortened.
pub const PRONUNCIATION_FIELD: &str = "pronunciation";

/// A JSON value that keeps object key order and the source text of numbers.
#[derive(Debug, Clone)]
pub enum Node {
    /// `null`
    Null,
    /// `true` or `false`
    Bool(bool),
    /// A number, exactly as written in the input.
    Number(Box<RawValue>),
    /// A string.
    String(String),
    /// An array.
    Array(Vec<Node>),
    /// An object.
    Object(Object),
}

impl Node {
    fn from_raw(raw: Box<RawValue>) -> serde_json::Result<Self> {
        let first = raw.get().as_bytes().first().copied();
        Ok(match first {
            Some(b'{') => Self::Object(serde_json::from_str(raw.get())?),
            Some(b'[') => Self::Array(serde_json::from_str(raw.get())?),
            Some(b'"') => Self::String(serde_json::from_str(raw.get())?),
            Some(b't' | b'f') => Self::Bool(serde_json::from_str(raw.get())?),
            Some(b'n') => Self::Null,
            _ => Self::Number(raw),
        })
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a.get() == b.get(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(de::Error::custom)
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(raw) => raw.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => items.serialize(serializer),
            Self::Object(object) => object.serialize(serializer),
        }
    }
}

/// JSON object members in input order.
///
/// A repeated key keeps its first position and its last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object(Vec<(String, Node)>);

impl Object {
    fn get(&self, key: &str) -> Option<&Node> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.0.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn insert(&mut self, key: String, value: Node) {
        match self.get_mut(&key) {
            Some(slot) => *slot = value,
            None => self.0.push((key, value)),
        }
    }
}

impl Serialize for Object {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ObjectVisitor;

        impl<'de> Visitor<'de> for ObjectVisitor {
            type Value = Object;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Object, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut object = Object::default();
                while let Some((key, value)) = access.next_entry::<String, Node>()? {
                    object.insert(key, value);
                }
                Ok(object)
            }
        }

        deserializer.deserialize_map(ObjectVisitor)
    }
}

/// A parsed flashcard deck.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    root: Object,
}

impl Deck {
    /// Wrap a parsed JSON document, checking that it has the shape of a deck.
    ///
    /// A missing `cards` field is an empty deck. A `pronunciation` may be a
    /// string, `null`, or absent.
    pub fn from_node(node: Node) -> Result<Self, DeckShapeError> {
        let Node::Object(root) = node else {
            return Err(DeckShapeError::NotAnObject);
        };

        match root.get(CARDS_FIELD) {
            None => {}
            Some(Node::Array(cards)) => {
                for (index, card) in cards.iter().enumerate() {
                    let Node::Object(card) = card else {
                        return Err(DeckShapeError::CardNotObject { index });
                    };
                    match card.get(PRONUNCIATION_FIELD) {
                        None | Some(Node::Null | Node::String(_)) => {}
                        Some(_) => return Err(DeckShapeError::PronunciationNotString { index }),
                    }
                }
            }
            Some(_) => return Err(DeckShapeError::CardsNotArray),
        }

        Ok(Self { root })
    }

    /// Number of cards in the deck.
    pub fn card_count(&self) -> usize {
        match self.root.get(CARDS_FIELD) {
            Some(Node::Array(cards)) => cards.len(),
            _ => 0,
        }
    }

    /// Pronunciation of every card, in order. Absent or null values read as `""`.
    #[cfg(test)]
    pub(crate) fn pronunciations(&self) -> Vec<&str> {
        let Some(Node::Array(cards)) = self.root.get(CARDS_FIELD) else {
            return Vec::new();
        };
        cards
            .iter()
            .filter_map(|card| match card {
                Node::Object(card) => Some(
                    card.get(PRONUNCIATION_FIELD)
                        .and_then(Node::as_str)
                        .unwrap_or_default(),
                ),
                _ => None,
            })
            .collect()
    }

    /// Apply `rewrite` to each card's pronunciation.
    ///
    /// `rewrite` receives the current value (`""` when absent) and returns
    /// a replacement, or `None` to leave the card alone. Returns how many
    /// cards were replaced.
    pub fn rewrite_pronunciations<F>(&mut self, mut rewrite: F) -> usize
    where
        F: FnMut(&str) -> Option<String>,
    {
        let Some(Node::Array(cards)) = self.root.get_mut(CARDS_FIELD) else {
            return 0;
        };

        let mut replaced = 0;
        for card in cards.iter_mut() {
            let Node::Object(card) = card else { continue };
            let current = card
                .get(PRONUNCIATION_FIELD)
                .and_then(Node::as_str)
                .unwrap_or_default();
            if let Some(new) = rewrite(current) {
                card.insert(PRONUNCIATION_FIELD.to_string(), Node::String(new));
                replaced += 1;
            }
        }
        replaced
    }

    /// Serialize with two-space indentation and literal non-ASCII text.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.root)
    }
}
