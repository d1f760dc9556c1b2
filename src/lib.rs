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

//! basE91 encoding with true incremental streaming.
//!
//! Bytes are packed into 13- or 14-bit groups, and each group is written
//! as two symbols from a 91-character printable ASCII alphabet. The
//! one-shot functions ([`encode`], [`decode`]), the iterator adapters
//! ([`encode_to_bytes`], [`decode_bytes`], ...) and the [`stream`] codecs
//! all produce identical output for the same input, no matter how it is
//! split across calls.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]

mod alphabet;
pub mod decode;
pub mod encode;
#[cfg(feature = "std")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
pub mod stream;
#[cfg(feature = "std")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
pub mod wrap;

#[cfg(feature = "alloc")]
extern crate alloc;

const LOW_13: u32 = 0x1fff;
const LOW_14: u32 = 0x3fff;

/// Largest 13-bit value that is widened to a 14-bit group. Anything above
/// it would overflow two symbols (91 * 91 = 8281) once a 14th bit is set.
const WIDE_GROUP_MAX: u32 = 88;

pub use alphabet::{is_symbol, ALPHABET, RADIX};

pub use decode::decode_bytes;
pub use decode::decode_str;
#[cfg(feature = "alloc")]
pub use decode::{decode, decode_with};
pub use decode::{DecodeConfig, DecodeError, DecodeResult};

#[cfg(feature = "alloc")]
pub use encode::encode;
pub use encode::encode_to_bytes;
pub use encode::encode_to_chars;
#[cfg(feature = "alloc")]
pub use encode::encode_to_string;

#[cfg(feature = "std")]
pub use stream::{StreamDecoder, StreamEncoder};
