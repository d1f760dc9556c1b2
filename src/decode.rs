/*
 * Copyright (C) 2024 taylor.fish <contact@taylor.fish>
 *
 * This file is part of base91.
 *
 * base91 is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * base91 is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with base91. If not, see <https://www.gnu.org/licenses/>.
 */

//! Functions and types for decoding basE91 data.

use super::alphabet::{value_of, Value, RADIX};
use super::{LOW_13, WIDE_GROUP_MAX};

use core::array;
use core::iter::{Fuse, FusedIterator, Take};
use core::mem;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// An error encountered while decoding basE91 data.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Encountered a byte that is not part of the alphabet.
    #[error("invalid symbol 0x{byte:02x} at position {position}")]
    CorruptInput {
        /// Zero-based offset of the byte in the input.
        position: usize,
        /// The offending byte.
        byte: u8,
    },
}

impl DecodeError {
    /// Offset of the input byte that caused the error.
    pub fn position(&self) -> usize {
        match self {
            Self::CorruptInput {
                position,
                ..
            } => *position,
        }
    }
}

/// Alias of <code>[Result]\<T, [DecodeError]></code>.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Used by the `decode_*_with` functions to configure the decoding process.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Whether ASCII whitespace (such as the newlines inserted by
    /// [`LineWrapper`](crate::wrap::LineWrapper)) is skipped rather than
    /// rejected. Skipped bytes still count toward error positions.
    /// [default: false]
    pub ignore_whitespace: bool,
}

impl DecodeConfig {
    /// Returns the default configuration.
    pub const fn new() -> Self {
        Self {
            ignore_whitespace: false,
        }
    }

    /// Returns a configuration that skips ASCII whitespace.
    pub const fn lenient() -> Self {
        Self {
            ignore_whitespace: true,
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Up to two bytes produced by a single symbol.
pub(crate) type Octets = Take<array::IntoIter<u8, 2>>;

fn no_octets() -> Octets {
    IntoIterator::into_iter([0; 2]).take(0)
}

/// Reassembles symbol pairs into 13- or 14-bit groups and splits those
/// back into bytes.
///
/// Between calls at most 7 bits are held in `queue`.
#[derive(Clone, Debug)]
pub(crate) struct Unpacker {
    queue: u32,
    bits: u32,
    pending: Option<Value>,
    position: usize,
    config: DecodeConfig,
}

impl Unpacker {
    pub fn new(config: DecodeConfig) -> Self {
        Self {
            queue: 0,
            bits: 0,
            pending: None,
            position: 0,
            config,
        }
    }

    /// Offset of the next input byte.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Consumes one input byte and returns the bytes it completes.
    pub fn push(&mut self, byte: u8) -> DecodeResult<Octets> {
        let position = self.position;
        self.position = position.saturating_add(1);

        let value = match value_of(byte) {
            Some(value) => value,
            None if self.config.ignore_whitespace
                && byte.is_ascii_whitespace() =>
            {
                return Ok(no_octets());
            }
            None => {
                return Err(DecodeError::CorruptInput {
                    position,
                    byte,
                });
            }
        };

        let low = match self.pending.take() {
            Some(low) => u32::from(low),
            None => {
                self.pending = Some(value);
                return Ok(no_octets());
            }
        };

        let group = low + u32::from(value) * RADIX;
        self.queue |= group << self.bits;
        self.bits += if group & LOW_13 > WIDE_GROUP_MAX {
            13
        } else {
            14
        };

        let mut out = [0; 2];
        let mut len = 0;
        while self.bits > 7 {
            out[len] = self.queue as u8;
            self.queue >>= 8;
            self.bits -= 8;
            len += 1;
        }
        Ok(IntoIterator::into_iter(out).take(len))
    }

    /// Flushes a lone trailing symbol into its final byte. Leftover bits
    /// without a pending symbol are padding and are discarded.
    pub fn finish(&mut self) -> Option<u8> {
        let queue = mem::take(&mut self.queue);
        let bits = mem::take(&mut self.bits);
        self.pending
            .take()
            .map(|low| (queue | u32::from(low) << bits) as u8)
    }

    /// Upper bound on the bytes still to come if `extra` more symbols are
    /// pushed before [`Self::finish`].
    pub fn max_bytes(&self, extra: usize) -> Option<usize> {
        let symbols = extra.checked_add(self.pending.is_some() as usize)?;
        // Each symbol carries at most 7 bits.
        symbols
            .checked_mul(7)?
            .checked_add(self.bits as usize)
            .map(|n| n / 8 + 1)
    }
}

/// Iterator returned by [`decode_bytes`] and [`decode_str`].
///
/// Yields at most one error, after which it is exhausted.
pub struct BytesDecoder<I> {
    iter: Fuse<I>,
    unpacker: Unpacker,
    pending: Octets,
    done: bool,
}

/// Iterator returned by [`decode_str`].
pub type StrDecoder<'a> = BytesDecoder<core::str::Bytes<'a>>;

impl<I: Iterator> BytesDecoder<I> {
    pub(crate) fn new(iter: I, config: DecodeConfig) -> Self {
        Self {
            iter: iter.fuse(),
            unpacker: Unpacker::new(config),
            pending: no_octets(),
            done: false,
        }
    }
}

impl<I> Iterator for BytesDecoder<I>
where
    I: Iterator<Item = u8>,
{
    type Item = DecodeResult<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(b) = self.pending.next() {
                return Some(Ok(b));
            }
            if self.done {
                return None;
            }
            match self.iter.next() {
                Some(byte) => match self.unpacker.push(byte) {
                    Ok(out) => self.pending = out,
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                },
                None => {
                    self.done = true;
                    return self.unpacker.finish().map(Ok);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = self.pending.len();
        if self.done {
            return (pending, Some(pending));
        }
        (
            pending,
            self.iter
                .size_hint()
                .1
                .and_then(|n| self.unpacker.max_bytes(n))
                // An error takes the place of at most one more item.
                .and_then(|n| n.checked_add(pending + 1)),
        )
    }
}

// `done` is set once the base iterator is exhausted or an error occurs, so
// `BytesDecoder` is fused even if `I` isn't.
impl<I: Iterator<Item = u8>> FusedIterator for BytesDecoder<I> {}

/// Decodes a sequence of basE91 symbols.
pub fn decode_bytes<I>(bytes: I) -> BytesDecoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    decode_bytes_with(bytes, DecodeConfig::new())
}

/// Decodes a basE91 `str`.
pub fn decode_str(s: &str) -> StrDecoder<'_> {
    decode_str_with(s, DecodeConfig::new())
}

/// Decodes a sequence of basE91 symbols with the given config.
///
/// This function is like [`decode_bytes`], but takes a configuration object.
pub fn decode_bytes_with<I>(
    bytes: I,
    config: DecodeConfig,
) -> BytesDecoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    BytesDecoder::new(bytes.into_iter(), config)
}

/// Decodes a basE91 `str` with the given config.
///
/// This function is like [`decode_str`], but takes a configuration object.
pub fn decode_str_with(s: &str, config: DecodeConfig) -> StrDecoder<'_> {
    BytesDecoder::new(s.bytes(), config)
}

/// Decodes a complete basE91 buffer in one call.
///
/// Empty input yields an empty, unallocated [`Vec`]. Fails with the position
/// of the first byte outside the alphabet.
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn decode<T: AsRef<[u8]>>(input: T) -> DecodeResult<Vec<u8>> {
    decode_with(input, DecodeConfig::new())
}

/// Decodes a complete basE91 buffer with the given config.
///
/// This function is like [`decode`], but takes a configuration object.
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn decode_with<T: AsRef<[u8]>>(
    input: T,
    config: DecodeConfig,
) -> DecodeResult<Vec<u8>> {
    let input = input.as_ref();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let mut unpacker = Unpacker::new(config);
    let capacity = unpacker.max_bytes(input.len()).unwrap_or(0);
    let mut out = Vec::with_capacity(capacity);
    for &b in input {
        out.extend(unpacker.push(b)?);
    }
    out.extend(unpacker.finish());
    Ok(out)
}

/// Takes a decoder and stores the contents in a [`Vec`].
///
/// This is equivalent to calling [`decoder.collect()`](Iterator::collect).
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn decode_to_vec<D, E>(decoder: D) -> Result<Vec<u8>, E>
where
    D: Iterator<Item = Result<u8, E>>,
{
    decoder.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(decode("qA").unwrap(), [0x2a]);
        assert_eq!(decode("lfB").unwrap(), [0x2a, 0x2b]);
        assert_eq!(decode("TPwJh>Io2Tv!lE").unwrap(), b"hello world");
        assert_eq!(decode(":C#(A").unwrap(), [0, 1, 2, 3]);
        assert_eq!(decode("#G(Ic,A").unwrap(), b"abcde");
    }

    #[test]
    fn empty_input() {
        let out = decode("").unwrap();
        assert!(out.is_empty());
        assert_eq!(out.capacity(), 0);
        assert!(decode_str("").next().is_none());
    }

    #[test]
    fn lone_trailing_symbol() {
        assert_eq!(decode("A").unwrap(), [0]);
        assert_eq!(decode("\"").unwrap(), [90]);
        // "#G(IZ" is "abcd": the final "Z" completes the last byte alone.
        assert_eq!(decode("#G(IZ").unwrap(), b"abcd");
    }

    #[test]
    fn reports_first_bad_position() {
        let err = decode("TPw h>Io2Tv!lE").unwrap_err();
        assert_eq!(
            err,
            DecodeError::CorruptInput {
                position: 3,
                byte: b' ',
            }
        );
        assert_eq!(err.position(), 3);
        assert_eq!(decode("qA-\\").unwrap_err().position(), 2);
    }

    #[test]
    fn iterator_stops_after_error() {
        let mut iter = decode_str("lf\\B");
        assert_eq!(iter.next(), Some(Ok(0x2a)));
        assert!(matches!(iter.next(), Some(Err(e)) if e.position() == 2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn whitespace_handling() {
        let wrapped = "TPwJh>\nIo2Tv!\r\nlE\n";
        assert!(decode(wrapped).is_err());
        let config = DecodeConfig::lenient();
        assert_eq!(decode_with(wrapped, config).unwrap(), b"hello world");
        let err = decode_with("TP\nw'J", config).unwrap_err();
        assert_eq!(err.position(), 4);
    }

    #[test]
    fn finish_is_idempotent() {
        let mut unpacker = Unpacker::new(DecodeConfig::new());
        assert_eq!(unpacker.push(b'q').unwrap().count(), 0);
        assert_eq!(unpacker.position(), 1);
        assert_eq!(unpacker.finish(), Some(b'q' - b'a' + 26));
        assert_eq!(unpacker.finish(), None);
    }

    #[test]
    fn size_hint_is_an_upper_bound() {
        let encoded = crate::encode::encode(&[0x5a; 40]);
        for n in 0..=encoded.len() {
            let iter = decode_bytes(encoded[..n].iter().copied());
            let (_, upper) = iter.size_hint();
            let actual = iter.count();
            assert!(upper.map_or(true, |u| actual <= u));
        }
    }

    #[test]
    fn decode_to_vec_collects() {
        let out = decode_to_vec(decode_str("TPwJh>Io2Tv!lE"));
        assert_eq!(out.unwrap(), b"hello world");
    }
}
