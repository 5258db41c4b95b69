/// SSRP request type tag. See [MC-SQLR] 2.2.1 and 2.2.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireRequest {
    pub kind: u8,
}

impl WireRequest {
    /// CLNT_BCAST_EX: ask every instance on the subnet.
    pub const BROADCAST: u8 = 0x02;
    /// CLNT_UCAST_EX: ask every instance on one host.
    pub const UNICAST: u8 = 0x03;

    pub fn broadcast() -> Self {
        WireRequest { kind: Self::BROADCAST }
    }

    pub fn unicast() -> Self {
        WireRequest { kind: Self::UNICAST }
    }

    pub fn serialize(&self) -> [u8; 1] {
        [self.kind]
    }
}

/// Framing of a SVR_RESP datagram: tag, 16-bit length, then payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame<'a> {
    pub tag: u8,
    /// Length as claimed on the wire, before clamping.
    pub declared_len: u16,
    pub payload: &'a [u8],
}

impl<'a> ResponseFrame<'a> {
    pub const HEADER_LENGTH: usize = 3;
    pub const SVR_RESP: u8 = 0x05;
    pub const MAX_PAYLOAD: usize = 4096;
    /// Largest datagram worth receiving: header plus the maximum payload.
    pub const MAX_DATAGRAM: usize = Self::HEADER_LENGTH + Self::MAX_PAYLOAD;

    /// Splits a received datagram into its framing fields.
    ///
    /// Never fails. The declared length is clamped to both `MAX_PAYLOAD` and
    /// the bytes actually present, so a lying server cannot cause an
    /// out-of-bounds read. A datagram shorter than the header yields an empty
    /// payload.
    pub fn deserialize(buffer: &'a [u8]) -> Self {
        if buffer.len() < Self::HEADER_LENGTH {
            return ResponseFrame {
                tag: buffer.first().copied().unwrap_or(0),
                declared_len: 0,
                payload: &[],
            };
        }

        let tag = buffer[0];
        let declared_len = u16::from_le_bytes([buffer[1], buffer[2]]);

        let available = buffer.len() - Self::HEADER_LENGTH;
        let len = (declared_len as usize).min(Self::MAX_PAYLOAD).min(available);

        ResponseFrame {
            tag,
            declared_len,
            payload: &buffer[Self::HEADER_LENGTH..Self::HEADER_LENGTH + len],
        }
    }

    pub fn is_expected_tag(&self) -> bool {
        self.tag == Self::SVR_RESP
    }

    /// True when the server claimed more bytes than were usable.
    pub fn is_truncated(&self) -> bool {
        self.declared_len as usize > self.payload.len()
    }

    /// Builds a response datagram, used by loopback responders in tests.
    pub fn serialize(payload: &[u8]) -> Vec<u8> {
        let len = payload.len().min(Self::MAX_PAYLOAD);
        let mut buffer = Vec::with_capacity(Self::HEADER_LENGTH + len);
        buffer.push(Self::SVR_RESP);
        buffer.extend_from_slice(&(len as u16).to_le_bytes());
        buffer.extend_from_slice(&payload[..len]);
        buffer
    }
}
