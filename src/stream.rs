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

//! Incremental codecs over [`std::io`] sinks and sources.
//!
//! Both codecs carry only a few bits of state between calls, plus one
//! fixed-size buffer allocated at construction. Feeding the same data in
//! any chunking produces exactly the output of [`encode`](crate::encode())
//! and [`decode`](crate::decode()).

use super::decode::{DecodeConfig, DecodeError, Unpacker};
use super::encode::Packer;

use log::{debug, trace};
use std::io::{self, Read, Write};

/// Symbols read from the source per refill.
pub const CHUNK_SIZE: usize = 1024;

/// Encoded bytes staged before they are handed to the sink.
const OUTPUT_SIZE: usize = 1024;

impl From<DecodeError> for io::Error {
    fn from(e: DecodeError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, e)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EncoderState {
    Open,
    Closed,
}

/// Encodes everything written to it and forwards the symbols to `W`.
///
/// Each [`write`](Write::write) packs its input immediately; only the
/// sub-group remainder (at most 13 bits) is carried to the next call.
/// [`close`](Self::close) or [`finish`](Self::finish) must be called to
/// emit the final one or two symbols. Dropping the encoder without closing
/// it loses them.
///
/// If the sink fails partway through a `write`, the rest of the chunk is
/// still packed into the encoder and the sink's error is returned
/// unchanged. The whole chunk counts as consumed even though some of its
/// symbols never reached the sink, so any error from `write` leaves the
/// encoded stream incomplete and the encoder should be abandoned.
pub struct StreamEncoder<W> {
    inner: W,
    packer: Packer,
    out: Vec<u8>,
    state: EncoderState,
}

impl<W: Write> StreamEncoder<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            packer: Packer::new(),
            out: Vec::with_capacity(OUTPUT_SIZE),
            state: EncoderState::Open,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Writing to the sink directly interleaves with the encoded output.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    fn send(&mut self) -> io::Result<()> {
        let result = self.inner.write_all(&self.out);
        self.out.clear();
        result
    }

    /// Emits the trailing symbols and flushes the sink.
    ///
    /// Closing an already closed encoder does nothing.
    pub fn close(&mut self) -> io::Result<()> {
        if self.state == EncoderState::Closed {
            return Ok(());
        }
        self.state = EncoderState::Closed;
        self.out.extend(self.packer.finish());
        debug!("closing encoder, {} trailing symbols", self.out.len());
        self.send()?;
        self.inner.flush()
    }

    /// Closes the encoder and returns the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.close()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for StreamEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.state == EncoderState::Closed {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "write to a closed encoder",
            ));
        }

        let mut result = Ok(());
        for &b in buf {
            let pair = match self.packer.push(b) {
                Some(pair) => pair,
                None => continue,
            };
            if result.is_err() {
                continue;
            }
            self.out.extend_from_slice(&pair);
            if self.out.len() + pair.len() > OUTPUT_SIZE {
                result = self.send();
            }
        }
        if result.is_ok() && !self.out.is_empty() {
            result = self.send();
        }
        self.out.clear();
        result.map(|()| buf.len())
    }

    /// Flushes the sink. Bits that do not yet form a full group stay in the
    /// encoder until it is closed.
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[derive(Clone, Copy, Debug)]
enum DecoderState {
    Reading,
    Finished,
    Failed(DecodeError),
}

/// Decodes basE91 symbols pulled from `R`.
///
/// Symbols are read in chunks of [`CHUNK_SIZE`]. Decoded bytes that do not
/// fit in the caller's buffer are kept for the next [`read`](Read::read).
/// An invalid symbol fails the `read` that encounters it with
/// [`io::ErrorKind::InvalidData`], wrapping the [`DecodeError`]; every
/// later `read` fails the same way.
pub struct StreamDecoder<R> {
    inner: R,
    unpacker: Unpacker,
    chunk: Box<[u8]>,
    decoded: Vec<u8>,
    offset: usize,
    state: DecoderState,
}

impl<R: Read> StreamDecoder<R> {
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, DecodeConfig::new())
    }

    pub fn with_config(inner: R, config: DecodeConfig) -> Self {
        Self {
            inner,
            unpacker: Unpacker::new(config),
            chunk: vec![0; CHUNK_SIZE].into_boxed_slice(),
            // Two bytes per symbol pair, plus the lone trailing symbol.
            decoded: Vec::with_capacity(CHUNK_SIZE + 1),
            offset: 0,
            state: DecoderState::Reading,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Returns the source. Decoded bytes not yet read are discarded.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn refill(&mut self) -> io::Result<()> {
        self.decoded.clear();
        self.offset = 0;

        let n = self.inner.read(&mut self.chunk)?;
        if n == 0 {
            self.decoded.extend(self.unpacker.finish());
            self.state = DecoderState::Finished;
            debug!(
                "source exhausted after {} bytes",
                self.unpacker.position(),
            );
            return Ok(());
        }

        trace!("decoding {} symbols", n);
        for &b in &self.chunk[..n] {
            match self.unpacker.push(b) {
                Ok(out) => self.decoded.extend(out),
                Err(e) => {
                    self.decoded.clear();
                    self.state = DecoderState::Failed(e);
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }
}

impl<R: Read> Read for StreamDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let ready = &self.decoded[self.offset..];
            if !ready.is_empty() {
                let n = ready.len().min(buf.len());
                buf[..n].copy_from_slice(&ready[..n]);
                self.offset += n;
                return Ok(n);
            }
            match self.state {
                DecoderState::Reading => {}
                DecoderState::Finished => return Ok(0),
                DecoderState::Failed(e) => return Err(e.into()),
            }
            if buf.is_empty() {
                return Ok(0);
            }
            self.refill()?;
        }
    }
}
