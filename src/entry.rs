use std::{
    fmt::Display,
    io::{Read, Write},
    string::FromUtf8Error,
};

use thiserror::Error;

use crate::item::{BlockCoordinates, Item};

/// Low 5 bits of a key byte carry the entry index.
pub const INDEX_MASK: u8 = 0x1F;
/// Terminates every metadata stream. No entry may encode this key byte.
pub const SENTINEL: u8 = 0x7F;
const TAG_SHIFT: u8 = 5;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryTag {
    Byte = 0,
    Short = 1,
    Int = 2,
    Float = 3,
    String = 4,
    Slot = 5,
    IntCoordinates = 6,
    Long = 7,
}

impl EntryTag {
    pub const ALL: [EntryTag; 8] = [
        EntryTag::Byte,
        EntryTag::Short,
        EntryTag::Int,
        EntryTag::Float,
        EntryTag::String,
        EntryTag::Slot,
        EntryTag::IntCoordinates,
        EntryTag::Long,
    ];

    /// Tag carried in the high 3 bits of a key byte. Every byte maps to a tag.
    pub const fn from_key_byte(key: u8) -> Self {
        Self::ALL[((key >> TAG_SHIFT) & 0x07) as usize]
    }

    pub const fn friendly_name(self) -> &'static str {
        match self {
            EntryTag::Byte => "byte",
            EntryTag::Short => "short",
            EntryTag::Int => "int",
            EntryTag::Float => "float",
            EntryTag::String => "string",
            EntryTag::Slot => "slot",
            EntryTag::IntCoordinates => "pos",
            EntryTag::Long => "long",
        }
    }
}

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Float entry at index {0} would encode as the terminator byte")]
    SentinelCollision(u8),
    #[error("String of {0} bytes does not fit a 16-bit length prefix")]
    StringTooLong(usize),
    #[error("String payload is not valid UTF-8: {0}")]
    InvalidString(#[from] FromUtf8Error),
}

/// Typed payload of a metadata entry. The tag follows from the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Byte(u8),
    Short(i16),
    Int(i32),
    Float(f32),
    String(String),
    Slot(Item),
    IntCoordinates(BlockCoordinates),
    Long(i64),
}

pub type CreateEntryValue = fn() -> MetadataValue;

fn empty_byte() -> MetadataValue {
    MetadataValue::Byte(0)
}

fn empty_short() -> MetadataValue {
    MetadataValue::Short(0)
}

fn empty_int() -> MetadataValue {
    MetadataValue::Int(0)
}

fn empty_float() -> MetadataValue {
    MetadataValue::Float(0.0)
}

fn empty_string() -> MetadataValue {
    MetadataValue::String(String::new())
}

fn empty_slot() -> MetadataValue {
    MetadataValue::Slot(Item::air())
}

fn empty_int_coordinates() -> MetadataValue {
    MetadataValue::IntCoordinates(BlockCoordinates::default())
}

fn empty_long() -> MetadataValue {
    MetadataValue::Long(0)
}

/// Constructors for empty payloads, indexed by tag value.
pub static ENTRY_TYPES: [CreateEntryValue; 8] = [
    empty_byte,            // 0
    empty_short,           // 1
    empty_int,             // 2
    empty_float,           // 3
    empty_string,          // 4
    empty_slot,            // 5
    empty_int_coordinates, // 6
    empty_long,            // 7
];

impl MetadataValue {
    pub fn empty(tag: EntryTag) -> Self {
        ENTRY_TYPES[tag as usize]()
    }

    pub const fn tag(&self) -> EntryTag {
        match self {
            MetadataValue::Byte(_) => EntryTag::Byte,
            MetadataValue::Short(_) => EntryTag::Short,
            MetadataValue::Int(_) => EntryTag::Int,
            MetadataValue::Float(_) => EntryTag::Float,
            MetadataValue::String(_) => EntryTag::String,
            MetadataValue::Slot(_) => EntryTag::Slot,
            MetadataValue::IntCoordinates(_) => EntryTag::IntCoordinates,
            MetadataValue::Long(_) => EntryTag::Long,
        }
    }

    pub fn payload_len(&self) -> usize {
        match self {
            MetadataValue::Byte(_) => 1,
            MetadataValue::Short(_) => 2,
            MetadataValue::Int(_) | MetadataValue::Float(_) => 4,
            MetadataValue::String(s) => 2 + s.len(),
            MetadataValue::Slot(_) => 5,
            MetadataValue::IntCoordinates(_) => 12,
            MetadataValue::Long(_) => 8,
        }
    }

    /// Fills this value from the stream, consuming exactly its payload.
    pub fn read_payload<R: Read>(&mut self, reader: &mut R) -> Result<(), EntryError> {
        match self {
            MetadataValue::Byte(v) => *v = u8::from_be_bytes(read_array(reader)?),
            MetadataValue::Short(v) => *v = i16::from_be_bytes(read_array(reader)?),
            MetadataValue::Int(v) => *v = i32::from_be_bytes(read_array(reader)?),
            MetadataValue::Float(v) => *v = f32::from_be_bytes(read_array(reader)?),
            MetadataValue::String(v) => {
                let len = u16::from_be_bytes(read_array(reader)?) as usize;
                let mut buf = vec![0u8; len];
                reader.read_exact(&mut buf)?;
                *v = String::from_utf8(buf)?;
            }
            MetadataValue::Slot(item) => {
                let id = i16::from_be_bytes(read_array(reader)?);
                let count = u8::from_be_bytes(read_array(reader)?);
                let metadata = i16::from_be_bytes(read_array(reader)?);
                *item = Item::new(id, count, metadata);
            }
            MetadataValue::IntCoordinates(pos) => {
                let x = i32::from_be_bytes(read_array(reader)?);
                let y = i32::from_be_bytes(read_array(reader)?);
                let z = i32::from_be_bytes(read_array(reader)?);
                *pos = BlockCoordinates::new(x, y, z);
            }
            MetadataValue::Long(v) => *v = i64::from_be_bytes(read_array(reader)?),
        }

        Ok(())
    }

    pub fn write_payload<W: Write>(&self, writer: &mut W) -> Result<(), EntryError> {
        match self {
            MetadataValue::Byte(v) => writer.write_all(&[*v])?,
            MetadataValue::Short(v) => writer.write_all(&v.to_be_bytes())?,
            MetadataValue::Int(v) => writer.write_all(&v.to_be_bytes())?,
            MetadataValue::Float(v) => writer.write_all(&v.to_be_bytes())?,
            MetadataValue::String(v) => {
                let len = u16::try_from(v.len()).map_err(|_| EntryError::StringTooLong(v.len()))?;
                writer.write_all(&len.to_be_bytes())?;
                writer.write_all(v.as_bytes())?;
            }
            MetadataValue::Slot(item) => {
                writer.write_all(&item.id.to_be_bytes())?;
                writer.write_all(&[item.count])?;
                writer.write_all(&item.metadata.to_be_bytes())?;
            }
            MetadataValue::IntCoordinates(pos) => {
                writer.write_all(&pos.x.to_be_bytes())?;
                writer.write_all(&pos.y.to_be_bytes())?;
                writer.write_all(&pos.z.to_be_bytes())?;
            }
            MetadataValue::Long(v) => writer.write_all(&v.to_be_bytes())?,
        }

        Ok(())
    }
}

impl Display for MetadataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataValue::Byte(v) => write!(f, "{}", v),
            MetadataValue::Short(v) => write!(f, "{}", v),
            MetadataValue::Int(v) => write!(f, "{}", v),
            MetadataValue::Float(v) => write!(f, "{}", v),
            MetadataValue::String(v) => write!(f, "{}", v),
            MetadataValue::Slot(item) => write!(f, "{}", item),
            MetadataValue::IntCoordinates(pos) => write!(f, "{}", pos),
            MetadataValue::Long(v) => write!(f, "{}", v),
        }
    }
}

impl From<u8> for MetadataValue {
    fn from(value: u8) -> Self {
        MetadataValue::Byte(value)
    }
}

impl From<i16> for MetadataValue {
    fn from(value: i16) -> Self {
        MetadataValue::Short(value)
    }
}

impl From<i32> for MetadataValue {
    fn from(value: i32) -> Self {
        MetadataValue::Int(value)
    }
}

impl From<f32> for MetadataValue {
    fn from(value: f32) -> Self {
        MetadataValue::Float(value)
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::String(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::String(value.to_owned())
    }
}

impl From<Item> for MetadataValue {
    fn from(value: Item) -> Self {
        MetadataValue::Slot(value)
    }
}

impl From<BlockCoordinates> for MetadataValue {
    fn from(value: BlockCoordinates) -> Self {
        MetadataValue::IntCoordinates(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Long(value)
    }
}

/// One typed property of an entity.
///
/// `index` is informational: decode sets it to the index read off the wire,
/// while encode always uses the key the entry is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataEntry {
    pub index: u8,
    pub value: MetadataValue,
}

impl MetadataEntry {
    pub fn new(value: impl Into<MetadataValue>) -> Self {
        Self {
            index: 0,
            value: value.into(),
        }
    }

    pub fn with_index(index: u8, value: impl Into<MetadataValue>) -> Self {
        Self {
            index,
            value: value.into(),
        }
    }

    pub fn byte(value: u8) -> Self {
        Self::new(value)
    }

    pub fn short(value: i16) -> Self {
        Self::new(value)
    }

    pub fn int(value: i32) -> Self {
        Self::new(value)
    }

    pub fn float(value: f32) -> Self {
        Self::new(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(MetadataValue::String(value.into()))
    }

    pub fn slot(item: Item) -> Self {
        Self::new(item)
    }

    pub fn int_coordinates(pos: BlockCoordinates) -> Self {
        Self::new(pos)
    }

    pub fn long(value: i64) -> Self {
        Self::new(value)
    }

    pub const fn tag(&self) -> EntryTag {
        self.value.tag()
    }

    pub const fn friendly_name(&self) -> &'static str {
        self.value.tag().friendly_name()
    }

    /// Packs the tag into the high 3 bits and `index & 0x1F` into the low 5.
    pub const fn key_byte(tag: EntryTag, index: u8) -> u8 {
        ((tag as u8) << TAG_SHIFT) | (index & INDEX_MASK)
    }

    pub fn encoded_len(&self) -> usize {
        1 + self.value.payload_len()
    }

    /// Fails if this entry cannot be written under `index`: a float whose
    /// index has low bits 31 packs to the terminator, and strings need a
    /// 16-bit length.
    pub fn check(&self, index: u8) -> Result<(), EntryError> {
        if Self::key_byte(self.tag(), index) == SENTINEL {
            return Err(EntryError::SentinelCollision(index));
        }
        if let MetadataValue::String(s) = &self.value {
            if s.len() > u16::MAX as usize {
                return Err(EntryError::StringTooLong(s.len()));
            }
        }

        Ok(())
    }

    /// Builds an empty entry for `tag` and reads its payload. The key byte
    /// must already have been consumed.
    pub fn from_stream<R: Read>(reader: &mut R, tag: EntryTag) -> Result<Self, EntryError> {
        let mut value = MetadataValue::empty(tag);
        value.read_payload(reader)?;

        Ok(Self { index: 0, value })
    }

    /// Writes the key byte and payload. Nothing is written if `check` fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, index: u8) -> Result<(), EntryError> {
        self.check(index)?;
        writer.write_all(&[Self::key_byte(self.tag(), index)])?;
        self.value.write_payload(writer)
    }
}

impl Display for MetadataEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) {}", self.friendly_name(), self.value)
    }
}

fn read_array<R: Read, const N: usize>(reader: &mut R) -> std::io::Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}
