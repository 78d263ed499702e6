//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::{Buf, BufMut, Bytes, BytesMut};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::packet::consts::{
    IDRP_DISCRIMINATOR, LspFlags, PduType, VERSION, VERSION_PROTO_EXT,
};
use crate::packet::error::{DecodeError, DecodeResult};
use crate::packet::{LevelNumber, LspId};

// Link State PDU as stored in the LSDB.
//
// Only the fixed header is broken out into fields. The variable-length part
// is kept as an opaque TLV buffer. `raw` holds the wire image the header
// fields were read from or last serialized to.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Lsp {
    pub pdu_type: PduType,
    pub rem_lifetime: u16,
    pub lsp_id: LspId,
    pub seqno: u32,
    pub cksum: u16,
    pub flags: LspFlags,
    pub tlvs: Bytes,
    #[serde(skip)]
    pub raw: Bytes,
}

// ===== impl Lsp =====

impl Lsp {
    pub const HEADER_LEN: u8 = 27;

    // Field offsets within the wire image.
    const OFFSET_REM_LIFETIME: usize = 10;
    const OFFSET_CKSUM: usize = 24;
    // Start of the checksummed area (LSP ID onwards).
    const OFFSET_CKSUM_AREA: usize = 12;

    pub fn new(
        level: LevelNumber,
        rem_lifetime: u16,
        lsp_id: LspId,
        seqno: u32,
        flags: LspFlags,
        tlvs: Bytes,
    ) -> Self {
        let mut lsp = Lsp {
            pdu_type: level.into(),
            rem_lifetime,
            lsp_id,
            seqno,
            cksum: 0,
            flags,
            tlvs,
            raw: Bytes::new(),
        };
        lsp.encode();
        lsp
    }

    pub fn decode(data: Bytes) -> DecodeResult<Self> {
        if data.len() < Self::HEADER_LEN as usize {
            return Err(DecodeError::IncompletePdu);
        }

        let mut buf = data.clone();
        let pdu_type = Self::decode_common_header(&mut buf)?;

        let pdu_len = buf.get_u16();
        if usize::from(pdu_len) != data.len() {
            return Err(DecodeError::InvalidPduLength(pdu_len));
        }

        let rem_lifetime = buf.get_u16();
        let lsp_id = LspId::decode(&mut buf);
        let seqno = buf.get_u32();
        let cksum = buf.get_u16();
        let flags = LspFlags::from_bits_truncate(buf.get_u8());

        Ok(Lsp {
            pdu_type,
            rem_lifetime,
            lsp_id,
            seqno,
            cksum,
            flags,
            tlvs: buf,
            raw: data,
        })
    }

    // Validates the eight-byte header shared by all IS-IS PDUs and returns
    // the PDU type, which must be one of the two LSP types.
    fn decode_common_header(buf: &mut Bytes) -> DecodeResult<PduType> {
        let discriminator = buf.get_u8();
        if discriminator != IDRP_DISCRIMINATOR {
            return Err(DecodeError::InvalidIrdpDiscriminator(discriminator));
        }

        let hdr_len = buf.get_u8();
        if hdr_len != Self::HEADER_LEN {
            return Err(DecodeError::InvalidHeaderLength(hdr_len));
        }

        let proto_ext = buf.get_u8();
        if proto_ext != VERSION_PROTO_EXT {
            return Err(DecodeError::InvalidVersion(proto_ext));
        }

        // Zero stands for the default System ID length of six octets.
        let id_len = buf.get_u8();
        if !matches!(id_len, 0 | 6) {
            return Err(DecodeError::InvalidIdLength(id_len));
        }

        let pdu_type_raw = buf.get_u8();
        let pdu_type = PduType::from_u8(pdu_type_raw)
            .ok_or(DecodeError::UnknownPduType(pdu_type_raw))?;
        if pdu_type.lsp_level().is_none() {
            return Err(DecodeError::UnexpectedPduType(pdu_type_raw));
        }

        let version = buf.get_u8();
        if version != VERSION {
            return Err(DecodeError::InvalidVersion(version));
        }

        // Reserved byte and Maximum Area Addresses, both ignored.
        buf.advance(2);

        Ok(pdu_type)
    }

    // Rebuilds the wire image from the header fields and TLVs, filling in
    // the PDU length and checksum.
    pub fn encode(&mut self) -> Bytes {
        let pdu_len = Self::HEADER_LEN as usize + self.tlvs.len();
        let mut buf = BytesMut::with_capacity(pdu_len);

        buf.put_slice(&[
            IDRP_DISCRIMINATOR,
            Self::HEADER_LEN,
            VERSION_PROTO_EXT,
            0,
            self.pdu_type as u8,
            VERSION,
            0,
            0,
        ]);
        buf.put_u16(pdu_len as u16);
        buf.put_u16(self.rem_lifetime);
        self.lsp_id.encode(&mut buf);
        buf.put_u32(self.seqno);
        // Zeroed while the checksum is computed.
        buf.put_u16(0);
        buf.put_u8(self.flags.bits());
        buf.put_slice(&self.tlvs);

        let cksum = Self::checksum(&buf[Self::OFFSET_CKSUM_AREA..]);
        buf[Self::OFFSET_CKSUM..Self::OFFSET_CKSUM + 2]
            .copy_from_slice(&cksum.to_be_bytes());

        self.cksum = cksum;
        self.raw = buf.freeze();
        self.raw.clone()
    }

    pub fn level(&self) -> Option<LevelNumber> {
        self.pdu_type.lsp_level()
    }

    // ISO 8473 checksum over the area starting at the LSP ID.
    //
    // The two check octets are chosen so that both Fletcher sums of the
    // whole area come out as zero. Their position is fixed: octets 13 and 14
    // of the area.
    fn checksum(area: &[u8]) -> u16 {
        const MODULO: i32 = 255;
        const CKSUM_POS: i32 = 13;

        let sums = fletcher::calc_fletcher16(area);
        let c0 = i32::from(sums & 0xff);
        let c1 = i32::from(sums >> 8);

        let octets_after = area.len() as i32 - CKSUM_POS;
        let mut x = (octets_after * c0 - c1) % MODULO;
        if x <= 0 {
            x += MODULO;
        }
        let mut y = 2 * MODULO - c0 - x;
        if y > MODULO {
            y -= MODULO;
        }

        ((x as u16) << 8) | y as u16
    }

    pub fn is_checksum_valid(&self) -> bool {
        // RFC 3719 - Section 7: a zero checksum is only acceptable on purges.
        if self.cksum == 0 {
            return self.rem_lifetime == 0;
        }

        self.raw.len() >= Self::HEADER_LEN as usize
            && fletcher::calc_fletcher16(&self.raw[Self::OFFSET_CKSUM_AREA..])
                == 0
    }

    // Sets the Remaining Lifetime, patching the wire image as well. The
    // field lies outside the checksummed area.
    pub fn set_rem_lifetime(&mut self, rem_lifetime: u16) {
        self.rem_lifetime = rem_lifetime;
        if self.raw.len() < Self::HEADER_LEN as usize {
            return;
        }

        let offset = Self::OFFSET_REM_LIFETIME;
        let mut raw = BytesMut::from(&self.raw[..]);
        raw[offset..offset + 2].copy_from_slice(&rem_lifetime.to_be_bytes());
        self.raw = raw.freeze();
    }
}
