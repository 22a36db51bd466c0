//! Entity metadata codec for real-time game network packets.
//!
//! Each entity carries a small set of typed properties keyed by a 5-bit
//! index. This crate encodes that set into the tagged-value stream sent
//! on the wire and decodes it back.

pub mod dictionary;
pub mod entry;
pub mod item;

pub use dictionary::{DictionaryError, MetadataDictionary, MAX_INDEX, SENTINEL};
pub use entry::{EntryError, EntryTag, MetadataEntry, MetadataValue, ENTRY_TYPES};
pub use item::{BlockCoordinates, Item};
