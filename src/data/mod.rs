//! Transport data model: timestamps and the container envelope

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

use crate::serialization::{FieldRef, Visitable, Visitor};

/// Point in time as microseconds since the Unix epoch.
///
/// The zero value doubles as "unset" in the container timestamp rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(i64);

impl Timestamp {
    /// Current wall-clock time
    #[must_use]
    pub fn now() -> Self {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as i64)
            .unwrap_or(0);
        Self(micros)
    }

    /// Construct from microseconds since the Unix epoch
    #[must_use]
    pub const fn from_microseconds(micros: i64) -> Self {
        Self(micros)
    }

    /// Microseconds since the Unix epoch
    #[must_use]
    pub const fn to_microseconds(self) -> i64 {
        self.0
    }

    /// Whole seconds part
    #[must_use]
    pub const fn seconds(self) -> i64 {
        self.0 / 1_000_000
    }

    /// Fractional microseconds part
    #[must_use]
    pub const fn microseconds(self) -> i64 {
        self.0 % 1_000_000
    }

    /// True for the zero/unset value
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}s", self.seconds(), self.microseconds())
    }
}

/// Transport envelope: a typed opaque payload plus send/sample timestamps.
///
/// Once handed to a conference a container is never mutated again; the
/// payload is reference-counted so snapshot copies stay cheap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    data_type: u32,
    sent: Timestamp,
    sample: Timestamp,
    payload: Bytes,
}

impl Container {
    /// Message type id of the container envelope itself
    pub const ID: i32 = 2;

    /// Create a container for a payload of the given data type.
    ///
    /// Both timestamps start unset; the conference assigns them on `send`.
    pub fn new(data_type: u32, payload: impl Into<Bytes>) -> Self {
        Self {
            data_type,
            sent: Timestamp::default(),
            sample: Timestamp::default(),
            payload: payload.into(),
        }
    }

    /// Numeric type id of the payload, used for dispatch
    #[must_use]
    pub const fn data_type(&self) -> u32 {
        self.data_type
    }

    /// Moment the container was handed to the distribution layer
    #[must_use]
    pub const fn sent_timestamp(&self) -> Timestamp {
        self.sent
    }

    /// Moment the contained data was sampled
    #[must_use]
    pub const fn sample_timestamp(&self) -> Timestamp {
        self.sample
    }

    /// Opaque payload bytes
    #[must_use]
    pub const fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Set the sent timestamp
    pub fn set_sent_timestamp(&mut self, ts: Timestamp) {
        self.sent = ts;
    }

    /// Set the sample timestamp
    pub fn set_sample_timestamp(&mut self, ts: Timestamp) {
        self.sample = ts;
    }
}

impl Visitable for Container {
    fn id(&self) -> i32 {
        Self::ID
    }

    fn short_name(&self) -> &'static str {
        "Container"
    }

    fn long_name(&self) -> &'static str {
        "qnp.data.Container"
    }

    fn accept(&mut self, visitor: &mut dyn Visitor) {
        visitor.begin_visit(self.id(), self.short_name(), self.long_name());
        visitor.visit(
            1,
            "qnp.data.Container.dataType",
            "dataType",
            FieldRef::UInt32(&mut self.data_type),
        );

        // Timestamps travel as epoch microseconds, the payload as a raw
        // block; a read traversal assigns into the staging values.
        let mut sent = self.sent.to_microseconds();
        let mut sample = self.sample.to_microseconds();
        let mut payload = self.payload.to_vec();
        visitor.visit(
            2,
            "qnp.data.Container.sentTimeStamp",
            "sentTimeStamp",
            FieldRef::Int64(&mut sent),
        );
        visitor.visit(
            3,
            "qnp.data.Container.sampleTimeStamp",
            "sampleTimeStamp",
            FieldRef::Int64(&mut sample),
        );
        visitor.visit(
            4,
            "qnp.data.Container.payload",
            "payload",
            FieldRef::Buffer(&mut payload),
        );
        visitor.end_visit();

        self.sent = Timestamp::from_microseconds(sent);
        self.sample = Timestamp::from_microseconds(sample);
        self.payload = Bytes::from(payload);
    }
}
