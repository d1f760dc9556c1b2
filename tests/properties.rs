use base91::{decode, encode, is_symbol, StreamDecoder, StreamEncoder};
use proptest::collection::vec;
use proptest::prelude::*;
use std::io::{Read, Write};

fn split<'a>(data: &'a [u8], sizes: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::new();
    let mut rest = data;
    for &size in sizes.iter().cycle() {
        if rest.is_empty() {
            break;
        }
        let (chunk, tail) = rest.split_at(size.min(rest.len()));
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

proptest! {
    #[test]
    fn prop_round_trip(data in vec(any::<u8>(), 0..1024)) {
        prop_assert_eq!(decode(encode(&data)).unwrap(), data);
    }

    #[test]
    fn prop_output_is_alphabet_only(data in vec(any::<u8>(), 0..256)) {
        prop_assert!(encode(&data).into_iter().all(is_symbol));
    }

    #[test]
    fn prop_streaming_encode_equivalence(
        data in vec(any::<u8>(), 0..2048),
        sizes in vec(1_usize..300, 1..8),
    ) {
        let mut encoder = StreamEncoder::new(Vec::new());
        for chunk in split(&data, &sizes) {
            encoder.write_all(chunk).unwrap();
        }
        prop_assert_eq!(encoder.finish().unwrap(), encode(&data));
    }

    #[test]
    fn prop_chunked_decode_equivalence(
        data in vec(any::<u8>(), 0..2048),
        sizes in vec(1_usize..300, 1..8),
    ) {
        let encoded = encode(&data);
        let mut decoder = StreamDecoder::new(&encoded[..]);
        let mut out = Vec::new();
        let mut buf = [0_u8; 300];
        for &size in sizes.iter().cycle() {
            let n = decoder.read(&mut buf[..size]).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        prop_assert_eq!(out, decode(&encoded).unwrap());
    }

    #[test]
    fn prop_corruption_is_located(
        data in vec(any::<u8>(), 1..256),
        index in any::<prop::sample::Index>(),
        bad in prop::sample::select(vec![b' ', b'\'', b'-', b'\\', b'\n', 0x00, 0x80, 0xff]),
    ) {
        let mut encoded = encode(&data);
        let k = index.index(encoded.len());
        encoded[k] = bad;
        prop_assert_eq!(decode(&encoded).unwrap_err().position(), k);
    }
}
