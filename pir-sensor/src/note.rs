//! Requests to and responses from the notecard gateway.
//!
//! Requests are small flat JSON objects. They are built in fixed capacity storage, so adding a
//! field can fail with [`Exhausted`] the same way an allocation would on the heap. They serialize
//! with `serde`; [`Request::to_slice`] writes the compact JSON with `serde-json-core`.

use core::fmt;

use heapless::Vec;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Fields a request or body can hold, besides the operation name and body.
pub const MAX_FIELDS: usize = 4;

/// Longest request `Display` can render.
pub const MAX_JSON_LEN: usize = 256;

/// Template placeholder declaring a field as a 32-bit signed integer.
pub const TINT32: i64 = 14;

/// A request or body ran out of room for another field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Exhausted;

impl<E> From<Exhausted> for crate::Error<E> {
    fn from(_: Exhausted) -> Self {
        crate::Error::Exhausted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Value {
    Int(i64),
    Str(&'static str),
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Str(s) => serializer.serialize_str(s),
        }
    }
}

type Fields = Vec<(&'static str, Value), MAX_FIELDS>;

fn push_field(fields: &mut Fields, name: &'static str, value: Value) -> Result<(), Exhausted> {
    if let Some(slot) = fields.iter_mut().find(|(n, _)| *n == name) {
        slot.1 = value;
        return Ok(());
    }
    fields.push((name, value)).map_err(|_| Exhausted)
}

fn find_field<'a>(fields: &'a Fields, name: &str) -> Option<&'a Value> {
    fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
}

fn serialize_fields<S: SerializeStruct>(st: &mut S, fields: &Fields) -> Result<(), S::Error> {
    fields
        .iter()
        .try_for_each(|&(name, ref value)| st.serialize_field(name, value))
}

/// The `body` object of a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Body {
    fields: Fields,
}

impl Body {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a numeric field, replacing an existing one with the same name.
    pub fn add_number(&mut self, name: &'static str, value: i64) -> Result<(), Exhausted> {
        push_field(&mut self.fields, name, Value::Int(value))
    }

    pub fn add_string(&mut self, name: &'static str, value: &'static str) -> Result<(), Exhausted> {
        push_field(&mut self.fields, name, Value::Str(value))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        find_field(&self.fields, name)
    }

    /// Changes a numeric field added earlier. Never takes a new slot, so it cannot run out of
    /// room; does nothing if `name` was never added.
    pub fn update_number(&mut self, name: &str, value: i64) {
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = Value::Int(value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Body {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("body", self.fields.len())?;
        serialize_fields(&mut st, &self.fields)?;
        st.end()
    }
}

/// An outbound request, addressed by its operation name such as `note.add`.
///
/// `Display` renders the compact JSON sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Request {
    op: &'static str,
    fields: Fields,
    body: Option<Body>,
}

impl Request {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            fields: Vec::new(),
            body: None,
        }
    }

    pub fn op(&self) -> &'static str {
        self.op
    }

    pub fn add_number(&mut self, name: &'static str, value: i64) -> Result<(), Exhausted> {
        push_field(&mut self.fields, name, Value::Int(value))
    }

    pub fn add_string(&mut self, name: &'static str, value: &'static str) -> Result<(), Exhausted> {
        push_field(&mut self.fields, name, Value::Str(value))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        find_field(&self.fields, name)
    }

    /// Correlation ID the gateway will echo back, if any.
    pub fn id(&self) -> Option<u32> {
        match self.get("id") {
            Some(Value::Int(id)) => u32::try_from(*id).ok(),
            _ => None,
        }
    }

    pub fn attach_body(&mut self, body: Body) {
        self.body = Some(body);
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Writes the compact JSON sent over the wire into `buf`, returning its length.
    pub fn to_slice(&self, buf: &mut [u8]) -> serde_json_core::ser::Result<usize> {
        serde_json_core::to_slice(self, buf)
    }
}

impl Serialize for Request {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + self.fields.len() + usize::from(self.body.is_some());
        let mut st = serializer.serialize_struct("request", len)?;
        st.serialize_field("req", self.op)?;
        serialize_fields(&mut st, &self.fields)?;
        if let Some(body) = &self.body {
            st.serialize_field("body", body)?;
        }
        st.end()
    }
}

/// Renders the same JSON as [`Request::to_slice`]. Fails for requests longer than
/// [`MAX_JSON_LEN`].
impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0; MAX_JSON_LEN];
        let len = self.to_slice(&mut buf).map_err(|_| fmt::Error)?;
        let json = core::str::from_utf8(&buf[..len]).map_err(|_| fmt::Error)?;
        f.write_str(json)
    }
}

/// The asynchronous messaging layer towards the gateway.
pub trait NoteTransport {
    type Error;

    /// Queues `request` without blocking. With `expect_response`, the response (or a timeout) is
    /// later delivered to [`PirPoller::on_response`](crate::PirPoller::on_response).
    fn send_async(&mut self, request: Request, expect_response: bool) -> Result<(), Self::Error>;
}

/// A parsed response from the gateway.
pub trait NoteResponse {
    fn string(&self, name: &str) -> Option<&str>;

    fn int(&self, name: &str) -> Option<i64>;
}
