use crate::bitreader::BitReader;
use crate::errors::InflateError;
use crate::huffman::{self, Huffman};
use crate::tables::{
    fixed_dist_lengths, fixed_lit_len_lengths, CLC_ORDER, DIST_BASE, DIST_EXTRA_BITS,
    LENGTH_BASE, LENGTH_EXTRA_BITS,
};

pub fn build_fixed_trees() -> Result<(Huffman, Huffman), InflateError> {
    let (lit, _) = huffman::build(&fixed_lit_len_lengths())?;
    let (dist, _) = huffman::build(&fixed_dist_lengths())?;
    Ok((lit, dist))
}

/// Reads a dynamic block header (HLIT/HDIST/HCLEN + the code-length-coded
/// literal/length and distance code length arrays) and builds both trees.
pub fn decode_trees(reader: &mut BitReader) -> Result<(Huffman, Huffman), InflateError> {
    let hlit = reader.get_bits_base(5, 257) as usize;
    let hdist = reader.get_bits_base(5, 1) as usize;
    let hclen = reader.get_bits_base(4, 4) as usize;

    if hlit > 286 || hdist > 30 || hclen > 19 {
        return Err(InflateError::Malformed);
    }

    let mut clc_lengths = [0u8; 19];
    for &idx in CLC_ORDER.iter().take(hclen) {
        clc_lengths[idx] = reader.get_bits(3) as u8;
    }

    let (clc_tree, clc_left) = huffman::build(&clc_lengths)?;
    if clc_left != 0 {
        return Err(InflateError::Malformed);
    }

    let total = hlit + hdist;
    let mut lengths = vec![0u8; total];
    let mut i = 0;
    while i < total {
        let symbol = huffman::decode_symbol(reader, &clc_tree)?;
        match symbol {
            0..=15 => {
                lengths[i] = symbol as u8;
                i += 1;
            }
            16 => {
                if i == 0 {
                    return Err(InflateError::Malformed);
                }
                let prev = lengths[i - 1];
                let repeat = reader.get_bits_base(2, 3) as usize;
                if i + repeat > total {
                    return Err(InflateError::Malformed);
                }
                for _ in 0..repeat {
                    lengths[i] = prev;
                    i += 1;
                }
            }
            17 => {
                let repeat = reader.get_bits_base(3, 3) as usize;
                if i + repeat > total {
                    return Err(InflateError::Malformed);
                }
                i += repeat;
            }
            18 => {
                let repeat = reader.get_bits_base(7, 11) as usize;
                if i + repeat > total {
                    return Err(InflateError::Malformed);
                }
                i += repeat;
            }
            _ => return Err(InflateError::Malformed),
        }
    }

    let lit_len_lengths = &lengths[..hlit];
    let dist_lengths = &lengths[hlit..];

    // The end-of-block symbol (256) must be present in the literal/length code.
    if lit_len_lengths.get(256).copied().unwrap_or(0) == 0 {
        return Err(InflateError::Malformed);
    }

    let (lit_tree, lit_left) = huffman::build(lit_len_lengths)?;
    let nonzero_lit = lit_len_lengths.iter().filter(|&&l| l != 0).count();
    if lit_left != 0 && nonzero_lit != 1 {
        return Err(InflateError::Malformed);
    }

    let (dist_tree, dist_left) = huffman::build(dist_lengths)?;
    let nonzero_dist = dist_lengths.iter().filter(|&&l| l != 0).count();
    if dist_left != 0 && nonzero_dist != 1 {
        return Err(InflateError::Malformed);
    }

    Ok((lit_tree, dist_tree))
}

/// Decodes block data (fixed or dynamic) against the given trees, appending
/// to `dst` starting at `*dst_pos`. Returns `Ok(true)` if the end-of-block
/// symbol was seen.
pub fn inflate_block_data(
    reader: &mut BitReader,
    dst: &mut [u8],
    dst_pos: &mut usize,
    lit_tree: &Huffman,
    dist_tree: &Huffman,
) -> Result<(), InflateError> {
    loop {
        let symbol = huffman::decode_symbol(reader, lit_tree)?;

        if symbol < 256 {
            if *dst_pos >= dst.len() {
                return Err(InflateError::Overflow);
            }
            dst[*dst_pos] = symbol as u8;
            *dst_pos += 1;
            continue;
        }

        if symbol == 256 {
            return Ok(());
        }

        let len_index = (symbol - 257) as usize;
        if len_index >= LENGTH_BASE.len() {
            return Err(InflateError::Malformed);
        }
        let length = reader.get_bits_base(
            LENGTH_EXTRA_BITS[len_index] as u32,
            LENGTH_BASE[len_index] as u32,
        ) as usize;

        let dist_symbol = huffman::decode_symbol(reader, dist_tree)? as usize;
        if dist_symbol >= DIST_BASE.len() {
            return Err(InflateError::Malformed);
        }
        let distance = reader.get_bits_base(
            DIST_EXTRA_BITS[dist_symbol] as u32,
            DIST_BASE[dist_symbol] as u32,
        ) as usize;

        if distance > *dst_pos {
            return Err(InflateError::Malformed);
        }
        if *dst_pos + length > dst.len() {
            return Err(InflateError::Overflow);
        }

        let mut src_pos = *dst_pos - distance;
        for _ in 0..length {
            dst[*dst_pos] = dst[src_pos];
            *dst_pos += 1;
            src_pos += 1;
        }
    }
}

pub fn inflate_stored_block(
    reader: &mut BitReader,
    dst: &mut [u8],
    dst_pos: &mut usize,
) -> Result<(), InflateError> {
    reader.align_to_byte();
    let len = reader.read_le_u16().map_err(|_| InflateError::Malformed)?;
    let nlen = reader.read_le_u16().map_err(|_| InflateError::Malformed)?;
    if len != !nlen {
        return Err(InflateError::Malformed);
    }
    let len = len as usize;
    if *dst_pos + len > dst.len() {
        return Err(InflateError::Overflow);
    }
    let bytes = reader.read_bytes(len).map_err(|_| InflateError::Malformed)?;
    dst[*dst_pos..*dst_pos + len].copy_from_slice(bytes);
    *dst_pos += len;
    Ok(())
}
