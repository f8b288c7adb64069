//! CQL binary protocol in-wire types. All integers are big-endian.

use byteorder::{BigEndian, ReadBytesExt};
use bytes::BufMut;
use std::convert::TryFrom;
use std::str;

use super::frame_errors::LowLevelDeserializationError;
use super::TryFromPrimitiveError;

/// Consistency level of an operation, as sent on the wire.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum Consistency {
    /// Closest replica, no acknowledgement required.
    Any = 0x0000,
    /// A single replica must acknowledge.
    #[default]
    One = 0x0001,
    /// Two replicas must acknowledge.
    Two = 0x0002,
    /// Three replicas must acknowledge.
    Three = 0x0003,
    /// A majority of replicas must acknowledge.
    Quorum = 0x0004,
    /// Every replica must acknowledge.
    All = 0x0005,
    /// A majority of replicas in the local datacenter must acknowledge.
    LocalQuorum = 0x0006,
    /// A majority of replicas in each datacenter must acknowledge.
    EachQuorum = 0x0007,
    /// Paxos-serialized read, cluster-wide.
    Serial = 0x0008,
    /// Paxos-serialized read, local datacenter.
    LocalSerial = 0x0009,
    /// A single replica in the local datacenter must acknowledge.
    LocalOne = 0x000A,
}

impl TryFrom<u16> for Consistency {
    type Error = TryFromPrimitiveError<u16>;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0x0000 => Ok(Consistency::Any),
            0x0001 => Ok(Consistency::One),
            0x0002 => Ok(Consistency::Two),
            0x0003 => Ok(Consistency::Three),
            0x0004 => Ok(Consistency::Quorum),
            0x0005 => Ok(Consistency::All),
            0x0006 => Ok(Consistency::LocalQuorum),
            0x0007 => Ok(Consistency::EachQuorum),
            0x0008 => Ok(Consistency::Serial),
            0x0009 => Ok(Consistency::LocalSerial),
            0x000A => Ok(Consistency::LocalOne),
            _ => Err(TryFromPrimitiveError {
                enum_name: "Consistency",
                primitive: value,
            }),
        }
    }
}

impl std::fmt::Display for Consistency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub(crate) fn read_raw_bytes<'a>(
    count: usize,
    buf: &mut &'a [u8],
) -> Result<&'a [u8], LowLevelDeserializationError> {
    if buf.len() < count {
        return Err(LowLevelDeserializationError::TooFewBytesReceived {
            expected: count,
            received: buf.len(),
        });
    }
    let (taken, rest) = buf.split_at(count);
    *buf = rest;
    Ok(taken)
}

/// Reads a `[short]`, a raw big-endian `u16`.
pub fn read_short(buf: &mut &[u8]) -> Result<u16, std::io::Error> {
    buf.read_u16::<BigEndian>()
}

/// Writes a `[short]`, a raw big-endian `u16`.
pub fn write_short(v: u16, buf: &mut impl BufMut) {
    buf.put_u16(v);
}

/// Reads an `[int]`, a raw big-endian `i32`.
pub fn read_int(buf: &mut &[u8]) -> Result<i32, std::io::Error> {
    buf.read_i32::<BigEndian>()
}

/// Writes an `[int]`, a raw big-endian `i32`.
pub fn write_int(v: i32, buf: &mut impl BufMut) {
    buf.put_i32(v);
}

pub(crate) fn read_short_length(buf: &mut &[u8]) -> Result<usize, std::io::Error> {
    read_short(buf).map(usize::from)
}

pub(crate) fn write_short_length(
    v: usize,
    buf: &mut impl BufMut,
) -> Result<(), std::num::TryFromIntError> {
    let v: u16 = v.try_into()?;
    write_short(v, buf);
    Ok(())
}

pub(crate) fn read_int_length(buf: &mut &[u8]) -> Result<usize, LowLevelDeserializationError> {
    let v = read_int(buf)?;
    if v < 0 {
        return Err(LowLevelDeserializationError::InvalidValueLength(v));
    }
    Ok(v as usize)
}

pub(crate) fn write_int_length(
    v: usize,
    buf: &mut impl BufMut,
) -> Result<(), std::num::TryFromIntError> {
    let v: i32 = v.try_into()?;
    write_int(v, buf);
    Ok(())
}

/// Reads `[short bytes]`: a `u16` length prefix followed by raw bytes.
pub fn read_short_bytes<'a>(
    buf: &mut &'a [u8],
) -> Result<&'a [u8], LowLevelDeserializationError> {
    let len = read_short_length(buf)?;
    read_raw_bytes(len, buf)
}

/// Writes `[short bytes]`: a `u16` length prefix followed by raw bytes.
pub fn write_short_bytes(v: &[u8], buf: &mut impl BufMut) -> Result<(), std::num::TryFromIntError> {
    write_short_length(v.len(), buf)?;
    buf.put_slice(v);
    Ok(())
}

/// Reads `[bytes]`: an `i32` length prefix followed by raw bytes.
/// Assumes the value is not null, i.e. the length is non-negative.
pub fn read_bytes<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8], LowLevelDeserializationError> {
    let len = read_int_length(buf)?;
    read_raw_bytes(len, buf)
}

/// Writes `[bytes]`: an `i32` length prefix followed by raw bytes.
pub fn write_bytes(v: &[u8], buf: &mut impl BufMut) -> Result<(), std::num::TryFromIntError> {
    write_int_length(v.len(), buf)?;
    buf.put_slice(v);
    Ok(())
}

/// Reads a `[string]`: a `u16` length prefix followed by UTF-8 bytes.
pub fn read_string<'a>(buf: &mut &'a [u8]) -> Result<&'a str, LowLevelDeserializationError> {
    let len = read_short_length(buf)?;
    let raw = read_raw_bytes(len, buf)?;
    let v = str::from_utf8(raw)?;
    Ok(v)
}

/// Writes a `[string]`: a `u16` length prefix followed by UTF-8 bytes.
pub fn write_string(v: &str, buf: &mut impl BufMut) -> Result<(), std::num::TryFromIntError> {
    let raw = v.as_bytes();
    write_short_length(raw.len(), buf)?;
    buf.put_slice(raw);
    Ok(())
}

/// Reads a `[consistency]`, a `[short]` naming a consistency level.
pub fn read_consistency(buf: &mut &[u8]) -> Result<Consistency, LowLevelDeserializationError> {
    let raw = read_short(buf)?;
    Ok(Consistency::try_from(raw)?)
}

/// Writes a `[consistency]`, a `[short]` naming a consistency level.
pub fn write_consistency(c: Consistency, buf: &mut impl BufMut) {
    write_short(c as u16, buf);
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::frame::frame_errors::LowLevelDeserializationError;

    #[test]
    fn type_short() {
        for val in [0u16, 1, 0x1337, u16::MAX] {
            let mut buf = Vec::new();
            write_short(val, &mut buf);
            assert_eq!(buf.len(), 2);
            assert_eq!(read_short(&mut &buf[..]).unwrap(), val);
        }
    }

    #[test]
    fn type_int() {
        for val in [i32::MIN, -1, 0, 1, i32::MAX] {
            let mut buf = Vec::new();
            write_int(val, &mut buf);
            assert_eq!(buf.len(), 4);
            assert_eq!(read_int(&mut &buf[..]).unwrap(), val);
        }
    }

    #[test]
    fn type_short_bytes() {
        for val in [&b""[..], &b"abc"[..]] {
            let mut buf = Vec::new();
            write_short_bytes(val, &mut buf).unwrap();
            assert_eq!(buf.len(), 2 + val.len());
            assert_eq!(read_short_bytes(&mut &buf[..]).unwrap(), val);
        }
    }

    #[test]
    fn type_bytes() {
        let mut buf = Vec::new();
        write_bytes(&[1, 2, 3], &mut buf).unwrap();
        assert_eq!(buf, [0, 0, 0, 3, 1, 2, 3]);
        assert_eq!(read_bytes(&mut &buf[..]).unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn type_string() {
        for val in ["", "hello, world!"] {
            let mut buf = Vec::new();
            write_string(val, &mut buf).unwrap();
            assert_eq!(read_string(&mut &buf[..]).unwrap(), val);
        }
    }

    #[test]
    fn bytes_with_negative_length_are_rejected() {
        let mut buf = Vec::new();
        write_int(-1, &mut buf);
        assert_matches!(
            read_bytes(&mut &buf[..]),
            Err(LowLevelDeserializationError::InvalidValueLength(-1))
        );
    }

    #[test]
    fn consistency_round_trip() {
        for c in [
            Consistency::Any,
            Consistency::One,
            Consistency::Two,
            Consistency::Three,
            Consistency::Quorum,
            Consistency::All,
            Consistency::LocalQuorum,
            Consistency::EachQuorum,
            Consistency::Serial,
            Consistency::LocalSerial,
            Consistency::LocalOne,
        ] {
            let mut buf = Vec::new();
            write_consistency(c, &mut buf);
            assert_eq!(read_consistency(&mut &buf[..]).unwrap(), c);
        }
    }

    #[test]
    fn unknown_consistency_is_rejected() {
        let mut buf = Vec::new();
        write_short(0x1234, &mut buf);
        assert_matches!(
            read_consistency(&mut &buf[..]),
            Err(LowLevelDeserializationError::UnknownConsistency(_))
        );
    }
}
