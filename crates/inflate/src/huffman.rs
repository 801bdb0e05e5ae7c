use crate::bitreader::BitReader;
use crate::errors::InflateError;

/// A canonical Huffman code table: `counts[len]` is the number of symbols
/// with code length `len`, and `symbols` lists the symbols in canonical
/// order. Construction and decoding follow the standard DEFLATE canonical
/// code algorithm (as described in RFC 1951 §3.2.2).
pub struct Huffman {
    counts: [u16; 16],
    symbols: Vec<u16>,
}

/// Builds a canonical Huffman table from per-symbol code lengths (0 = symbol
/// unused). Returns the table plus the number of unused code points left
/// over at the end of construction: 0 means the code is exactly complete,
/// a positive value means it is incomplete (only tolerated by the caller
/// when exactly one symbol has a nonzero length), and an over-subscribed
/// code length set is rejected outright.
pub fn build(lengths: &[u8]) -> Result<(Huffman, i32), InflateError> {
    let mut counts = [0u16; 16];
    for &len in lengths {
        counts[len as usize] += 1;
    }

    let mut left: i32 = 1;
    for len in 1..16 {
        left <<= 1;
        left -= counts[len] as i32;
        if left < 0 {
            return Err(InflateError::Malformed);
        }
    }

    let mut offs = [0u16; 16];
    for len in 1..15 {
        offs[len + 1] = offs[len] + counts[len];
    }

    let mut symbols = vec![0u16; lengths.len()];
    let mut offs_cursor = offs;
    for (sym, &len) in lengths.iter().enumerate() {
        if len != 0 {
            let idx = offs_cursor[len as usize] as usize;
            symbols[idx] = sym as u16;
            offs_cursor[len as usize] += 1;
        }
    }

    Ok((Huffman { counts, symbols }, left))
}

/// Decodes a single symbol, bit by bit, against the canonical table.
/// Ported from the standard public-domain `puff.c` decode loop.
pub fn decode_symbol(reader: &mut BitReader, tree: &Huffman) -> Result<u16, InflateError> {
    let mut code: i32 = 0;
    let mut first: i32 = 0;
    let mut index: i32 = 0;

    for len in 1..16usize {
        code |= reader.get_bits(1) as i32;
        let count = tree.counts[len] as i32;
        if code - count < first {
            let sym_index = (index + (code - first)) as usize;
            return tree
                .symbols
                .get(sym_index)
                .copied()
                .ok_or(InflateError::Malformed);
        }
        index += count;
        first += count;
        first <<= 1;
        code <<= 1;
    }

    Err(InflateError::Malformed)
}
