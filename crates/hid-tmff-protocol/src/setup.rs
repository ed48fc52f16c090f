//! Vendor setup packets replayed over the interrupt OUT endpoint at bring-up.
//!
//! The payloads are undocumented. They are kept byte-exact, including the
//! zero padding, because the firmware rejects shorter transfers on some
//! models.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Largest payload accepted in one setup step.
pub const MAX_SETUP_PACKET_LEN: usize = 64;

/// Length of every packet in the TMX setup table.
pub const TMX_SETUP_PACKET_LEN: usize = 64;

/// Setup table for the pre-init FFB wheel (lengths 9, 8, 8, 8, 8).
pub const LEGACY_SETUP: [&[u8]; 5] = [
    &[0x42, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    &[0x0a, 0x04, 0x90, 0x03, 0x00, 0x00, 0x00, 0x00],
    &[0x0a, 0x04, 0x00, 0x0c, 0x00, 0x00, 0x00, 0x00],
    &[0x0a, 0x04, 0x12, 0x10, 0x00, 0x00, 0x00, 0x00],
    &[0x0a, 0x04, 0x00, 0x06, 0x00, 0x00, 0x00, 0x00],
];

/// Headers of the TMX setup table; each is zero-padded to 64 bytes on the wire.
pub const TMX_SETUP_HEADERS: [&[u8]; 7] = [
    &[0x42, 0x01],
    &[0x0a, 0x04, 0x90, 0x03],
    &[0x0a, 0x04, 0x00, 0x0c],
    &[0x0a, 0x04, 0x12, 0x10],
    &[0x0a, 0x04, 0x00, 0x06],
    &[0x0a, 0x04, 0x00, 0x0e],
    &[0x0a, 0x04, 0x00, 0x0e, 0x01],
];

/// One opaque setup step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct SetupPacket(Vec<u8>);

impl SetupPacket {
    /// `header` followed by zeros up to `len` bytes.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::PacketTooLong`] if the header or `len` exceeds
    /// [`MAX_SETUP_PACKET_LEN`].
    pub fn padded(header: &[u8], len: usize) -> Result<Self, ProtocolError> {
        let total = len.max(header.len());
        if total > MAX_SETUP_PACKET_LEN {
            return Err(ProtocolError::PacketTooLong {
                len: total,
                max: MAX_SETUP_PACKET_LEN,
            });
        }
        Ok(Self(zero_padded(header, total)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<u8>> for SetupPacket {
    type Error = ProtocolError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.len() > MAX_SETUP_PACKET_LEN {
            return Err(ProtocolError::PacketTooLong {
                len: bytes.len(),
                max: MAX_SETUP_PACKET_LEN,
            });
        }
        Ok(Self(bytes))
    }
}

impl From<SetupPacket> for Vec<u8> {
    fn from(packet: SetupPacket) -> Self {
        packet.0
    }
}

impl AsRef<[u8]> for SetupPacket {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Ordered, immutable list of setup steps for one model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetupSequence(Vec<SetupPacket>);

impl SetupSequence {
    pub fn new(packets: Vec<SetupPacket>) -> Self {
        Self(packets)
    }

    /// Build a sequence from raw tables, each packet padded to `len` bytes
    /// (0 keeps the table lengths).
    ///
    /// # Errors
    ///
    /// [`ProtocolError::PacketTooLong`] for any oversized entry.
    pub fn from_table(table: &[&[u8]], len: usize) -> Result<Self, ProtocolError> {
        table
            .iter()
            .map(|header| SetupPacket::padded(header, len))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// The five-step sequence sent to the pre-init FFB wheel.
    pub fn legacy() -> Self {
        Self(
            LEGACY_SETUP
                .iter()
                .map(|bytes| SetupPacket(bytes.to_vec()))
                .collect(),
        )
    }

    /// The seven 64-byte steps sent to the TMX.
    pub fn tmx() -> Self {
        Self(
            TMX_SETUP_HEADERS
                .iter()
                .map(|header| SetupPacket(zero_padded(header, TMX_SETUP_PACKET_LEN)))
                .collect(),
        )
    }

    pub fn packets(&self) -> &[SetupPacket] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Size of the shared send buffer needed to replay this sequence.
    pub fn max_packet_len(&self) -> usize {
        self.0.iter().map(SetupPacket::len).max().unwrap_or(0)
    }
}

fn zero_padded(header: &[u8], len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len.max(header.len())];
    if let Some(prefix) = bytes.get_mut(..header.len()) {
        prefix.copy_from_slice(header);
    }
    bytes
}
