//! HEPv3 packet decoding.
//!
//! HEPv3 frames start with a 6-byte header (`HEP3` preamble plus a big-endian
//! total length) followed by a sequence of chunks. Each chunk carries a
//! 6-byte header of its own: vendor id, chunk type, and chunk length, all
//! big-endian u16, with the length counting the header itself.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use super::{CapturedPacket, DecodeError, PacketDecoder};

const PREAMBLE: &[u8; 4] = b"HEP3";
const HEADER_LEN: usize = 6;
const CHUNK_HEADER_LEN: usize = 6;

// Chunk types defined by the HEPv3 generic vendor space.
const CHUNK_IP_FAMILY: u16 = 0x0001;
const CHUNK_IP_PROTOCOL: u16 = 0x0002;
const CHUNK_IP4_SRC: u16 = 0x0003;
const CHUNK_IP4_DST: u16 = 0x0004;
const CHUNK_IP6_SRC: u16 = 0x0005;
const CHUNK_IP6_DST: u16 = 0x0006;
const CHUNK_SRC_PORT: u16 = 0x0007;
const CHUNK_DST_PORT: u16 = 0x0008;
const CHUNK_TIMESTAMP_SECS: u16 = 0x0009;
const CHUNK_TIMESTAMP_MICROS: u16 = 0x000a;
const CHUNK_PAYLOAD_TYPE: u16 = 0x000b;
const CHUNK_CAPTURE_ID: u16 = 0x000c;
const CHUNK_BODY: u16 = 0x000f;

/// Decoder for HEPv3 capture frames.
///
/// Unknown chunk types are skipped so that packets from newer agents still
/// decode; malformed framing is rejected with a structured error.
#[derive(Debug, Clone, Copy, Default)]
pub struct HepDecoder;

impl HepDecoder {
    /// Create a new HEPv3 decoder.
    pub fn new() -> Self {
        Self
    }
}

impl PacketDecoder for HepDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<CapturedPacket, DecodeError> {
        if bytes.len() < HEADER_LEN {
            return Err(DecodeError::TooShort(bytes.len()));
        }
        if &bytes[..4] != PREAMBLE {
            return Err(DecodeError::BadPreamble);
        }

        let declared = u16::from_be_bytes([bytes[4], bytes[5]]) as usize;
        if declared != bytes.len() {
            return Err(DecodeError::LengthMismatch {
                declared,
                received: bytes.len(),
            });
        }

        let mut packet = CapturedPacket::default();
        let mut offset = HEADER_LEN;

        while offset < bytes.len() {
            if bytes.len() - offset < CHUNK_HEADER_LEN {
                return Err(DecodeError::TruncatedChunk(offset));
            }

            let chunk_type = u16::from_be_bytes([bytes[offset + 2], bytes[offset + 3]]);
            let chunk_len = u16::from_be_bytes([bytes[offset + 4], bytes[offset + 5]]) as usize;

            if chunk_len < CHUNK_HEADER_LEN || offset + chunk_len > bytes.len() {
                return Err(DecodeError::ChunkOverrun { chunk_type });
            }

            let payload = &bytes[offset + CHUNK_HEADER_LEN..offset + chunk_len];

            match chunk_type {
                CHUNK_IP_FAMILY => packet.ip_family = chunk_u8(chunk_type, payload)?,
                CHUNK_IP_PROTOCOL => packet.ip_protocol = chunk_u8(chunk_type, payload)?,
                CHUNK_IP4_SRC => packet.source = Some(chunk_ip4(chunk_type, payload)?),
                CHUNK_IP4_DST => packet.destination = Some(chunk_ip4(chunk_type, payload)?),
                CHUNK_IP6_SRC => packet.source = Some(chunk_ip6(chunk_type, payload)?),
                CHUNK_IP6_DST => packet.destination = Some(chunk_ip6(chunk_type, payload)?),
                CHUNK_SRC_PORT => packet.source_port = chunk_u16(chunk_type, payload)?,
                CHUNK_DST_PORT => packet.destination_port = chunk_u16(chunk_type, payload)?,
                CHUNK_TIMESTAMP_SECS => packet.timestamp_secs = chunk_u32(chunk_type, payload)?,
                CHUNK_TIMESTAMP_MICROS => packet.timestamp_micros = chunk_u32(chunk_type, payload)?,
                CHUNK_PAYLOAD_TYPE => packet.payload_type = chunk_u8(chunk_type, payload)?,
                CHUNK_CAPTURE_ID => packet.capture_id = chunk_u32(chunk_type, payload)?,
                CHUNK_BODY => packet.body = payload.to_vec(),
                // Unknown or vendor-specific chunk; skip it.
                _ => {}
            }

            offset += chunk_len;
        }

        Ok(packet)
    }
}

fn chunk_u8(chunk_type: u16, payload: &[u8]) -> Result<u8, DecodeError> {
    match payload {
        [value] => Ok(*value),
        _ => Err(bad_len(chunk_type, payload.len(), 1)),
    }
}

fn chunk_u16(chunk_type: u16, payload: &[u8]) -> Result<u16, DecodeError> {
    match payload {
        [hi, lo] => Ok(u16::from_be_bytes([*hi, *lo])),
        _ => Err(bad_len(chunk_type, payload.len(), 2)),
    }
}

fn chunk_u32(chunk_type: u16, payload: &[u8]) -> Result<u32, DecodeError> {
    let bytes: [u8; 4] = payload
        .try_into()
        .map_err(|_| bad_len(chunk_type, payload.len(), 4))?;
    Ok(u32::from_be_bytes(bytes))
}

fn chunk_ip4(chunk_type: u16, payload: &[u8]) -> Result<IpAddr, DecodeError> {
    let octets: [u8; 4] = payload
        .try_into()
        .map_err(|_| bad_len(chunk_type, payload.len(), 4))?;
    Ok(IpAddr::V4(Ipv4Addr::from(octets)))
}

fn chunk_ip6(chunk_type: u16, payload: &[u8]) -> Result<IpAddr, DecodeError> {
    let octets: [u8; 16] = payload
        .try_into()
        .map_err(|_| bad_len(chunk_type, payload.len(), 16))?;
    Ok(IpAddr::V6(Ipv6Addr::from(octets)))
}

fn bad_len(chunk_type: u16, len: usize, expected: usize) -> DecodeError {
    DecodeError::BadChunkLength {
        chunk_type,
        len,
        expected,
    }
}
