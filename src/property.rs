//! Property Reader
//!
//! Fetches raw window properties and decodes them into typed values with an
//! explicit expected layout per property.

use thiserror::Error;
use tracing::{debug, warn};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{Atom, AtomEnum, ConnectionExt, Timestamp, Window};

/// Upper bound of 32-bit units requested per property
pub const MAX_PROPERTY_LENGTH: u32 = 65536;

/// Property data as returned by the server, before decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProperty {
    pub type_: Atom,
    pub format: u8,
    pub value: Vec<u8>,
}

impl RawProperty {
    /// Wrap reply parts, `None` when the property carries no data
    pub fn from_parts(type_: Atom, format: u8, value: Vec<u8>) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        Some(Self {
            type_,
            format,
            value,
        })
    }

    /// 32-bit items of the property, or `None` if the format is not 32
    pub fn value32(&self) -> Option<impl Iterator<Item = u32> + '_> {
        if self.format != 32 {
            return None;
        }
        Some(
            self.value
                .chunks_exact(4)
                .map(|chunk| u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])),
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected format 32, got {0}")]
    WrongFormat(u8),

    #[error("expected at least {expected} item(s), got {found}")]
    TooShort { expected: usize, found: usize },
}

/// A typed view of a property value
pub trait PropertyLayout: Sized {
    /// Property type requested from the server
    const TYPE: AtomEnum;

    fn decode(raw: &RawProperty) -> Result<Self, DecodeError>;
}

fn first_u32(raw: &RawProperty) -> Result<u32, DecodeError> {
    let mut items = raw.value32().ok_or(DecodeError::WrongFormat(raw.format))?;
    items.next().ok_or(DecodeError::TooShort {
        expected: 1,
        found: 0,
    })
}

/// `_NET_WM_USER_TIME`: one CARDINAL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserTime(pub Timestamp);

impl PropertyLayout for UserTime {
    const TYPE: AtomEnum = AtomEnum::CARDINAL;

    fn decode(raw: &RawProperty) -> Result<Self, DecodeError> {
        first_u32(raw).map(Self)
    }
}

/// `_NET_WM_PID`: one CARDINAL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessId(pub u32);

impl PropertyLayout for ProcessId {
    const TYPE: AtomEnum = AtomEnum::CARDINAL;

    fn decode(raw: &RawProperty) -> Result<Self, DecodeError> {
        first_u32(raw).map(Self)
    }
}

/// A single WINDOW, e.g. `_NET_ACTIVE_WINDOW`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRef(pub Window);

impl PropertyLayout for WindowRef {
    const TYPE: AtomEnum = AtomEnum::WINDOW;

    fn decode(raw: &RawProperty) -> Result<Self, DecodeError> {
        first_u32(raw).map(Self)
    }
}

/// An array of WINDOW, e.g. `_NET_CLIENT_LIST_STACKING`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowList(pub Vec<Window>);

impl PropertyLayout for WindowList {
    const TYPE: AtomEnum = AtomEnum::WINDOW;

    fn decode(raw: &RawProperty) -> Result<Self, DecodeError> {
        let items = raw.value32().ok_or(DecodeError::WrongFormat(raw.format))?;
        Ok(Self(items.collect()))
    }
}

/// Human readable atom name for diagnostics
pub fn atom_name<C: Connection>(conn: &C, atom: Atom) -> String {
    match conn.get_atom_name(atom).map(|cookie| cookie.reply()) {
        Ok(Ok(reply)) => String::from_utf8_lossy(&reply.name).into_owned(),
        _ => format!("#{}", atom),
    }
}

/// Log a failed property read, naming the property
pub fn explain_property_failure<C: Connection>(conn: &C, property: Atom, err: &dyn std::fmt::Display) {
    warn!("couldn't get property {}: {}", atom_name(conn, property), err);
}

/// Read a property of the expected type
///
/// Returns `None` when the property is unset or empty. Failures are logged and
/// also reported as `None`.
pub fn read_property<C: Connection>(
    conn: &C,
    window: Window,
    property: Atom,
    expected_type: AtomEnum,
) -> Option<RawProperty> {
    let reply = match conn
        .get_property(false, window, property, expected_type, 0, MAX_PROPERTY_LENGTH)
        .map(|cookie| cookie.reply())
    {
        Ok(Ok(reply)) => reply,
        Ok(Err(e)) => {
            explain_property_failure(conn, property, &e);
            return None;
        }
        Err(e) => {
            explain_property_failure(conn, property, &e);
            return None;
        }
    };

    RawProperty::from_parts(reply.type_, reply.format, reply.value)
}

/// Read and decode a property with the given layout
pub fn read_typed<C: Connection, L: PropertyLayout>(
    conn: &C,
    window: Window,
    property: Atom,
) -> Option<L> {
    let raw = read_property(conn, window, property, L::TYPE)?;
    match L::decode(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Discarding property {} on window {}: {}", atom_name(conn, property), window, e);
            None
        }
    }
}
