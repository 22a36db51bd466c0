use std::{
    fmt::Display,
    io::{ErrorKind, Read, Write},
};

use thiserror::Error;
use tracing::{debug, trace, warn};

pub use crate::entry::SENTINEL;
use crate::entry::{EntryError, EntryTag, MetadataEntry, INDEX_MASK};

/// Largest index that survives the 5-bit key packing.
pub const MAX_INDEX: u8 = INDEX_MASK;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("No metadata entry at index {0}")]
    KeyNotFound(u8),
    #[error("Metadata stream ended before the terminator")]
    UnterminatedStream,
    #[error("Metadata stream ended inside the {tag:?} payload at index {index}")]
    MalformedStream { index: u8, tag: EntryTag },
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Entry error: {0}")]
    EntryError(#[from] EntryError),
}

/// Keyed metadata of a single entity, as sent with entity packets.
///
/// Iteration follows assignment order; replacing a key keeps its position.
/// Equality compares the (key, value) pairs and ignores order.
///
/// # Examples
/// ```
/// use entity_metadata::{Item, MetadataDictionary, MetadataEntry};
///
/// let mut metadata = MetadataDictionary::new();
/// metadata.set(0, MetadataEntry::byte(3));
/// metadata.set(1, MetadataEntry::slot(Item::new(5, 1, 0)));
///
/// let bytes = metadata.to_bytes().unwrap();
/// assert_eq!(bytes, [0x00, 0x03, 0xA1, 0x00, 0x05, 0x01, 0x00, 0x00, 0x7F]);
///
/// let decoded = MetadataDictionary::from_bytes(&bytes).unwrap();
/// assert_eq!(decoded, metadata);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetadataDictionary {
    entries: Vec<(u8, MetadataEntry)>,
}

impl MetadataDictionary {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: u8) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: u8) -> Result<&MetadataEntry, DictionaryError> {
        self.position(key)
            .map(|i| &self.entries[i].1)
            .ok_or(DictionaryError::KeyNotFound(key))
    }

    pub fn get_mut(&mut self, key: u8) -> Result<&mut MetadataEntry, DictionaryError> {
        match self.position(key) {
            Some(i) => Ok(&mut self.entries[i].1),
            None => Err(DictionaryError::KeyNotFound(key)),
        }
    }

    /// Inserts or replaces the entry at `key`. `entry.index` is left as is.
    pub fn set(&mut self, key: u8, entry: MetadataEntry) {
        match self.position(key) {
            Some(i) => self.entries[i].1 = entry,
            None => self.entries.push((key, entry)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &MetadataEntry)> {
        self.entries.iter().map(|(key, entry)| (*key, entry))
    }

    /// Snapshot of the stored entries in iteration order.
    pub fn values(&self) -> Vec<MetadataEntry> {
        self.entries.iter().map(|(_, entry)| entry.clone()).collect()
    }

    pub fn encoded_len(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, entry)| entry.encoded_len())
            .sum::<usize>()
            + 1
    }

    /// Decodes entries until the terminator byte. Later entries overwrite
    /// earlier ones with the same index.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, DictionaryError> {
        let mut metadata = Self::new();

        loop {
            let mut buf = [0u8; 1];
            reader.read_exact(&mut buf).map_err(|e| match e.kind() {
                ErrorKind::UnexpectedEof => DictionaryError::UnterminatedStream,
                _ => e.into(),
            })?;

            let key = buf[0];
            if key == SENTINEL {
                break;
            }

            let tag = EntryTag::from_key_byte(key);
            let index = key & INDEX_MASK;

            let mut entry = MetadataEntry::from_stream(reader, tag).map_err(|e| match e {
                EntryError::IOError(io) if io.kind() == ErrorKind::UnexpectedEof => {
                    DictionaryError::MalformedStream { index, tag }
                }
                other => other.into(),
            })?;
            entry.index = index;

            trace!(index, tag = tag.friendly_name(), "decoded metadata entry");
            metadata.set(index, entry);
        }

        debug!(entries = metadata.len(), "decoded metadata dictionary");
        Ok(metadata)
    }

    /// Writes every entry under its key, then the terminator.
    ///
    /// Keys above 31 are truncated to their low 5 bits, as the protocol does.
    /// Every entry is checked before the first byte goes to `writer`.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), DictionaryError> {
        self.entries
            .iter()
            .try_for_each(|(key, entry)| entry.check(*key))?;

        for (key, entry) in &self.entries {
            let key = *key;
            if key > MAX_INDEX {
                warn!(
                    key,
                    truncated = key & INDEX_MASK,
                    "metadata index does not fit 5 bits"
                );
            }
            entry.write_to(writer, key)?;
            trace!(key, tag = entry.friendly_name(), "encoded metadata entry");
        }

        writer.write_all(&[SENTINEL])?;

        debug!(entries = self.len(), "encoded metadata dictionary");
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DictionaryError> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.write(&mut buf)?;
        Ok(buf)
    }

    pub fn from_bytes(mut bytes: &[u8]) -> Result<Self, DictionaryError> {
        Self::read(&mut bytes)
    }

    fn position(&self, key: u8) -> Option<usize> {
        self.entries.iter().position(|(k, _)| *k == key)
    }
}

impl PartialEq for MetadataDictionary {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, entry)| matches!(other.get(key), Ok(o) if o.value == entry.value))
    }
}

impl Display for MetadataDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (key, entry)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{}] {}", key, entry)?;
        }

        Ok(())
    }
}
