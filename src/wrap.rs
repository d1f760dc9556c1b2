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

//! Line wrapping for encoded output.

use std::io::{self, Write};

/// Inserts a newline after every `width` bytes written to `W`.
///
/// Decode wrapped data with [`DecodeConfig::lenient`](crate::DecodeConfig::lenient)
/// so the newlines are skipped.
pub struct LineWrapper<W> {
    inner: W,
    width: usize,
    column: usize,
}

impl<W: Write> LineWrapper<W> {
    /// A `width` of 0 disables wrapping.
    pub fn new(inner: W, width: usize) -> Self {
        Self {
            inner,
            width,
            column: 0,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Terminates a non-empty last line and returns the writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.column > 0 {
            self.inner.write_all(b"\n")?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for LineWrapper<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.width == 0 || buf.is_empty() {
            return self.inner.write(buf);
        }
        // The newline is deferred until more data arrives, so a line that
        // ends exactly at the last byte is terminated only by `finish`.
        if self.column == self.width {
            self.inner.write_all(b"\n")?;
            self.column = 0;
        }
        let room = self.width - self.column;
        let n = self.inner.write(&buf[..buf.len().min(room)])?;
        self.column += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_with, DecodeConfig, StreamEncoder};

    fn wrap(data: &[u8], width: usize) -> Vec<u8> {
        let mut writer = LineWrapper::new(Vec::new(), width);
        writer.write_all(data).unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn wraps_at_width() {
        assert_eq!(wrap(b"TPwJh>Io2Tv!lE", 4), b"TPwJ\nh>Io\n2Tv!\nlE\n");
        assert_eq!(wrap(b"abcdefgh", 4), b"abcd\nefgh\n");
        assert_eq!(wrap(b"", 4), b"");
    }

    #[test]
    fn zero_width_passes_through() {
        assert_eq!(wrap(b"TPwJh>Io2Tv!lE", 0), b"TPwJh>Io2Tv!lE");
    }

    #[test]
    fn wrapped_output_decodes_leniently() {
        let data: Vec<u8> = (0..300).map(|i| (i * 7) as u8).collect();
        let mut encoder =
            StreamEncoder::new(LineWrapper::new(Vec::new(), 76));
        encoder.write_all(&data).unwrap();
        let wrapped = encoder.finish().unwrap().finish().unwrap();
        assert!(wrapped.split(|&b| b == b'\n').all(|line| line.len() <= 76));
        let decoded = decode_with(&wrapped, DecodeConfig::lenient()).unwrap();
        assert_eq!(decoded, data);
    }
}
