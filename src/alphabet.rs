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

//! The basE91 symbol table.

/// Number of symbols in the alphabet.
pub const RADIX: u32 = 91;

/// The 91 symbols, ordered by value.
///
/// All printable ASCII characters except space, `'`, `-` and `\`. Previously
/// encoded data depends on this exact order.
pub const ALPHABET: [u8; 91] = *b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
    abcdefghijklmnopqrstuvwxyz\
    0123456789\
    !#$%&()*+,./:;<=>?@[]^_`{|}~\"";

/// A symbol value, always less than [`RADIX`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Value(u8);

impl From<Value> for u32 {
    fn from(v: Value) -> u32 {
        u32::from(v.0)
    }
}

const fn build_reverse() -> [Option<Value>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        let b = ALPHABET[i] as usize;
        assert!(table[b].is_none(), "duplicate symbol in alphabet");
        table[b] = Some(Value(i as u8));
        i += 1;
    }
    table
}

static REVERSE: [Option<Value>; 256] = build_reverse();

/// Returns the symbol for `n % 91`.
pub(crate) fn symbol(n: u32) -> u8 {
    ALPHABET[(n % RADIX) as usize]
}

/// Looks up the value of an input byte, or `None` if it is not a symbol.
pub(crate) fn value_of(byte: u8) -> Option<Value> {
    REVERSE[usize::from(byte)]
}

/// Whether `byte` belongs to the basE91 alphabet.
pub fn is_symbol(byte: u8) -> bool {
    value_of(byte).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_inverts_alphabet() {
        for (i, &b) in ALPHABET.iter().enumerate() {
            assert_eq!(value_of(b).map(u32::from), Some(i as u32));
        }
        let members = (0..=255_u8).filter(|&b| is_symbol(b)).count();
        assert_eq!(members, ALPHABET.len());
    }

    #[test]
    fn excluded_characters() {
        for &b in b" '-\\" {
            assert!(!is_symbol(b), "{:?} must not be a symbol", b as char);
        }
        assert!(ALPHABET.iter().all(|b| b.is_ascii_graphic()));
    }

    #[test]
    fn symbol_wraps_at_radix() {
        assert_eq!(symbol(90), b'"');
        assert_eq!(symbol(91), ALPHABET[0]);
    }
}
