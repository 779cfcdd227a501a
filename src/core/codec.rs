//! Envelope framing for byte streams.
//!
//! [`EnvelopeFrameCodec`] splits a stream into whole envelopes using the
//! header's `blob_size`. It does not decompress or decode; hand each frame to
//! [`ConfigCodec::deserialize`](crate::core::envelope::ConfigCodec::deserialize)
//! or [`extract_version`](crate::core::envelope::extract_version).

use crate::config::{HEADER_SIZE, MAX_BLOB_SIZE};
use crate::core::envelope::check_proto_version;
use crate::core::header::Header;
use crate::error::{constants, EnvelopeError};
use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

#[derive(Debug, Clone, Copy)]
pub struct EnvelopeFrameCodec {
    max_blob_size: usize,
}

impl Default for EnvelopeFrameCodec {
    fn default() -> Self {
        Self::new(MAX_BLOB_SIZE)
    }
}

impl EnvelopeFrameCodec {
    pub fn new(max_blob_size: usize) -> Self {
        Self { max_blob_size }
    }

    fn check_header(&self, header: &Header) -> Result<usize, EnvelopeError> {
        check_proto_version(header)?;
        if header.blob_size > self.max_blob_size as u64 {
            return Err(EnvelopeError::OversizedBlob(header.blob_size));
        }
        Ok(HEADER_SIZE + header.blob_size as usize)
    }
}

impl Decoder for EnvelopeFrameCodec {
    type Item = Bytes;
    type Error = EnvelopeError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < HEADER_SIZE {
            return Ok(None);
        }

        let header = Header::decode(&src[..HEADER_SIZE])?;
        let frame_len = self.check_header(&header)?;

        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        Ok(Some(src.split_to(frame_len).freeze()))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => Err(EnvelopeError::Framing(format!(
                "{}: {} bytes left over",
                constants::ERR_TRUNCATED_FRAME,
                src.len()
            ))),
        }
    }
}

impl Encoder<Bytes> for EnvelopeFrameCodec {
    type Error = EnvelopeError;

    /// Writes one complete envelope after checking its framing
    fn encode(&mut self, envelope: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let header = Header::decode(&envelope)?;
        let frame_len = self.check_header(&header)?;
        if envelope.len() != frame_len {
            return Err(EnvelopeError::framing(constants::ERR_BLOB_SIZE_MISMATCH));
        }
        dst.reserve(envelope.len());
        dst.extend_from_slice(&envelope);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(version: u64, payload: &[u8]) -> Vec<u8> {
        let mut out = Header::new(version, payload.len() as u64, false)
            .encode()
            .to_vec();
        out.extend_from_slice(payload);
        out
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_waits_for_full_frame() {
        let bytes = envelope(3, b"payload");
        let mut codec = EnvelopeFrameCodec::default();

        let mut buf = BytesMut::from(&bytes[..HEADER_SIZE - 1]);
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(&bytes[HEADER_SIZE - 1..bytes.len() - 1]);
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(&bytes[bytes.len() - 1..]);
        let frame = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(&frame[..], &bytes[..]);
        assert!(buf.is_empty());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_splits_back_to_back_frames() {
        let first = envelope(1, b"a");
        let second = envelope(2, b"bc");
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&first);
        buf.extend_from_slice(&second);

        let mut codec = EnvelopeFrameCodec::default();
        assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], &first[..]);
        assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], &second[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_rejects_unsupported_version_and_oversize() {
        let mut bad_version = envelope(1, b"x");
        bad_version[0..4].copy_from_slice(&77u32.to_le_bytes());
        let mut codec = EnvelopeFrameCodec::default();
        assert!(matches!(
            codec.decode(&mut BytesMut::from(&bad_version[..])),
            Err(EnvelopeError::UnsupportedProtoVersion(77))
        ));

        let big = Header::new(1, 1 << 40, false).encode();
        assert!(matches!(
            codec.decode(&mut BytesMut::from(&big[..])),
            Err(EnvelopeError::OversizedBlob(_))
        ));
    }

    #[test]
    fn test_eof_inside_frame_is_framing_error() {
        let bytes = envelope(1, b"abcdef");
        let mut buf = BytesMut::from(&bytes[..bytes.len() - 2]);
        let err = EnvelopeFrameCodec::default()
            .decode_eof(&mut buf)
            .unwrap_err();
        assert!(err.is_framing());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_encode_validates_frame() {
        let mut codec = EnvelopeFrameCodec::default();
        let mut dst = BytesMut::new();
        let good = envelope(4, b"data");
        codec.encode(Bytes::from(good.clone()), &mut dst).unwrap();
        assert_eq!(&dst[..], &good[..]);

        let mut padded = good;
        padded.push(0);
        assert!(codec
            .encode(Bytes::from(padded), &mut BytesMut::new())
            .unwrap_err()
            .is_framing());
    }
}
