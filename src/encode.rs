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

//! Functions and types for encoding basE91 data.

use super::alphabet::{symbol, RADIX};
use super::{LOW_13, LOW_14, WIDE_GROUP_MAX};

use core::array;
use core::iter::{Fuse, FusedIterator, Take};

#[cfg(feature = "alloc")]
use alloc::{string::String, vec::Vec};

/// Up to two symbols produced by a single step of the packer.
pub(crate) type Symbols = Take<array::IntoIter<u8, 2>>;

fn no_symbols() -> Symbols {
    IntoIterator::into_iter([0; 2]).take(0)
}

/// Packs bytes into 13- or 14-bit groups, each written as two symbols.
///
/// Between calls at most 13 bits are held in `queue`.
#[derive(Clone, Debug, Default)]
pub(crate) struct Packer {
    queue: u32,
    bits: u32,
}

impl Packer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a byte and returns the symbol pair it completes, if any.
    pub fn push(&mut self, byte: u8) -> Option<[u8; 2]> {
        self.queue |= u32::from(byte) << self.bits;
        self.bits += 8;
        if self.bits <= 13 {
            return None;
        }

        let mut value = self.queue & LOW_13;
        if value > WIDE_GROUP_MAX {
            self.queue >>= 13;
            self.bits -= 13;
        } else {
            // A 13-bit value this small leaves room for a 14th bit below
            // 91 * 91.
            value = self.queue & LOW_14;
            self.queue >>= 14;
            self.bits -= 14;
        }
        Some([symbol(value), symbol(value / RADIX)])
    }

    /// Drains the leftover bits. Calling this again yields nothing.
    pub fn finish(&mut self) -> Symbols {
        let Self {
            queue,
            bits,
        } = core::mem::take(self);
        let len = match bits {
            0 => 0,
            1..=7 if queue < RADIX => 1,
            _ => 2,
        };
        IntoIterator::into_iter([symbol(queue), symbol(queue / RADIX)])
            .take(len)
    }

    /// Bounds on the symbols still to come if `extra` more bytes are
    /// pushed before [`Self::finish`].
    pub fn symbol_bounds(&self, extra: usize) -> (usize, Option<usize>) {
        let bits = extra
            .checked_mul(8)
            .and_then(|n| n.checked_add(self.bits as usize));
        (
            // No symbol carries more than 7 bits.
            bits.map_or(extra, |n| n / 7 + (n % 7 != 0) as usize),
            bits.and_then(|n| {
                if n == 0 {
                    Some(0)
                } else {
                    // Every pair consumes at least 13 bits; the tail adds
                    // at most two symbols.
                    (n / 13).checked_mul(2)?.checked_add(2)
                }
            }),
        )
    }
}

/// Iterator returned by [`encode_to_bytes`].
pub struct BytesEncoder<I> {
    iter: Fuse<I>,
    packer: Packer,
    pending: Symbols,
    finished: bool,
}

impl<I: Iterator> BytesEncoder<I> {
    pub(crate) fn new(iter: I) -> Self {
        Self {
            iter: iter.fuse(),
            packer: Packer::new(),
            pending: no_symbols(),
            finished: false,
        }
    }
}

impl<I> Iterator for BytesEncoder<I>
where
    I: Iterator<Item = u8>,
{
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(s) = self.pending.next() {
                return Some(s);
            }
            if self.finished {
                return None;
            }
            match self.iter.next() {
                Some(b) => {
                    if let Some(pair) = self.packer.push(b) {
                        self.pending = IntoIterator::into_iter(pair).take(2);
                    }
                }
                None => {
                    self.finished = true;
                    self.pending = self.packer.finish();
                }
            }
        }
    }

    fn fold<B, F>(self, init: B, mut f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        let Self {
            iter,
            mut packer,
            pending,
            finished,
        } = self;
        let init = pending.fold(init, &mut f);
        if finished {
            return init;
        }
        let init = iter.fold(init, |acc, b| match packer.push(b) {
            Some([lo, hi]) => {
                let acc = f(acc, lo);
                f(acc, hi)
            }
            None => acc,
        });
        packer.finish().fold(init, f)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = self.pending.len();
        let (lower, upper) = self.iter.size_hint();
        let (lower, _) = self.packer.symbol_bounds(lower);
        let upper = upper
            .and_then(|n| self.packer.symbol_bounds(n).1)
            .and_then(|n| n.checked_add(pending));
        (lower.saturating_add(pending), upper)
    }
}

impl<I: Iterator<Item = u8>> FusedIterator for BytesEncoder<I> {}

/// Iterator returned by [`encode_to_chars`].
pub struct CharEncoder<I>(BytesEncoder<I>);

impl<I> Iterator for CharEncoder<I>
where
    I: Iterator<Item = u8>,
{
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(char::from)
    }

    fn fold<B, F>(self, init: B, mut f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.0.fold(init, |acc, b| f(acc, char::from(b)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<I: Iterator<Item = u8>> FusedIterator for CharEncoder<I> {}

/// Encodes a sequence of bytes as basE91 symbols, one ASCII byte each.
pub fn encode_to_bytes<I>(bytes: I) -> BytesEncoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    BytesEncoder::new(bytes.into_iter())
}

/// Encodes a sequence of bytes as basE91 chars.
pub fn encode_to_chars<I>(bytes: I) -> CharEncoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    CharEncoder(BytesEncoder::new(bytes.into_iter()))
}

/// Encodes a byte slice in one call.
///
/// Empty input yields an empty, unallocated [`Vec`].
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn encode(bytes: &[u8]) -> Vec<u8> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let mut packer = Packer::new();
    let (lower, upper) = packer.symbol_bounds(bytes.len());
    let mut out = Vec::with_capacity(upper.unwrap_or(lower));
    for &b in bytes {
        if let Some(pair) = packer.push(b) {
            out.extend_from_slice(&pair);
        }
    }
    out.extend(packer.finish());
    out
}

#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn encode_to_string<I>(bytes: I) -> String
where
    I: IntoIterator<Item = u8>,
{
    encode_to_chars(bytes).collect()
}
