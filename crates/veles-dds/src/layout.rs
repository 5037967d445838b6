//! Subresource layout computation.
//!
//! Turns a decoded header into the flat list of byte ranges a graphics
//! backend uploads: one descriptor per mip level per array element, in
//! upload order (array element major, mip level minor).

use crate::format::DxgiFormat;
use crate::header::DdsHeader;

/// Byte range of one mip level of one array element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subresource {
    /// Offset of the level's first byte from the start of the file buffer.
    pub data_offset: usize,
    /// Byte stride between consecutive rows (block rows for compressed
    /// formats).
    pub row_pitch: u32,
    /// Byte stride between consecutive depth slices. Reserved until a
    /// volume-texture contract exists; always 0.
    pub slice_pitch: u32,
}

/// Compute the subresource layout of the pixel payload.
///
/// Walks `array_size` mip chains starting at `payload_start`, halving the
/// dimensions (floored at 1) after each level. Level sizes follow one of
/// two policies selected by the header flags: 4x4 block tiles when
/// [`DdsHeader::FLAG_LINEAR_SIZE`] is set, row-pitch sizing when
/// [`DdsHeader::FLAG_PITCH`] is set. A header with neither flag produces
/// zero-size descriptors. Array elements are laid out back to back with no
/// padding, so descriptor `i * mip_levels + j` covers element `i`, level `j`.
///
/// Offsets are not validated against the real payload length; a caller
/// holding the file buffer must bounds-check them before use.
pub fn subresource_layout(
    header: &DdsHeader,
    array_size: u32,
    format: DxgiFormat,
    payload_start: usize,
) -> Vec<Subresource> {
    let block_size = format.block_size();
    let mip_levels = header.mip_levels();
    let flags = header.flags;
    let bit_count = header.pixel_format.rgb_bit_count as usize;

    let mut subresources = Vec::with_capacity(array_size as usize * mip_levels as usize);
    let mut cursor = payload_start;

    for _ in 0..array_size {
        let mut width = (header.width as usize).max(1);
        let mut height = (header.height as usize).max(1);

        for _ in 0..mip_levels {
            let (row_pitch, level_size) = if flags & DdsHeader::FLAG_LINEAR_SIZE != 0 {
                // Block-compressed: whole 4x4 tiles, at least one per axis.
                let pitch = ((width + 3) / 4).max(1) * block_size;
                let rows = ((height + 3) / 4).max(1);
                (pitch, pitch * rows)
            } else if flags & DdsHeader::FLAG_PITCH != 0 {
                // Linear: rows of packed pixels, rounded up to whole bytes.
                let pitch = (width * bit_count + 7) / 8;
                (pitch, pitch * height)
            } else {
                (0, 0)
            };

            subresources.push(Subresource {
                data_offset: cursor,
                row_pitch: row_pitch as u32,
                slice_pitch: 0,
            });

            cursor += level_size;
            width = (width >> 1).max(1);
            height = (height >> 1).max(1);
        }
    }

    subresources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{DdsPixelFormat, FourCC};

    fn block_header(width: u32, height: u32, mipmap_count: u32) -> DdsHeader {
        DdsHeader {
            size: DdsHeader::SIZE,
            flags: DdsHeader::FLAG_TEXTURE | DdsHeader::FLAG_LINEAR_SIZE,
            height,
            width,
            pitch_or_linear_size: 0,
            depth: 1,
            mipmap_count,
            reserved1: [0; 11],
            pixel_format: DdsPixelFormat {
                size: DdsPixelFormat::SIZE,
                flags: DdsPixelFormat::FLAG_FOUR_CC,
                four_cc: FourCC::DXT5,
                rgb_bit_count: 0,
                r_bit_mask: 0,
                g_bit_mask: 0,
                b_bit_mask: 0,
                a_bit_mask: 0,
            },
            caps: DdsHeader::CAPS_TEXTURE,
            caps2: 0,
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        }
    }

    fn linear_header(width: u32, height: u32, mipmap_count: u32, bit_count: u32) -> DdsHeader {
        let mut header = block_header(width, height, mipmap_count);
        header.flags = DdsHeader::FLAG_TEXTURE | DdsHeader::FLAG_PITCH;
        header.pixel_format.flags = DdsPixelFormat::FLAG_RGBA;
        header.pixel_format.rgb_bit_count = bit_count;
        header
    }

    #[test]
    fn test_block_compressed_mip_chain() {
        // 17x9, five levels: dimensions walk 17->8->4->2->1 and 9->4->2->1->1.
        let header = block_header(17, 9, 5);
        let subresources = subresource_layout(&header, 1, DxgiFormat::Bc3Unorm, 128);

        assert_eq!(subresources.len(), 5);

        // ceil(17/4) = 5 blocks across at 16 bytes each.
        assert_eq!(subresources[0].row_pitch, 80);

        let pitches: Vec<u32> = subresources.iter().map(|s| s.row_pitch).collect();
        assert_eq!(pitches, [80, 32, 16, 16, 16]);
        assert!(pitches.windows(2).all(|w| w[0] >= w[1]));

        // Level sizes: pitch * ceil(height/4).
        let offsets: Vec<usize> = subresources.iter().map(|s| s.data_offset).collect();
        assert_eq!(offsets[0], 128);
        assert_eq!(offsets[1], 128 + 80 * 3);
        assert_eq!(offsets[2], offsets[1] + 32);
        assert_eq!(offsets[3], offsets[2] + 16);
        assert_eq!(offsets[4], offsets[3] + 16);
    }

    #[test]
    fn test_minimum_one_block() {
        // A 1x1 level still occupies a whole block.
        let header = block_header(1, 1, 1);
        let subresources = subresource_layout(&header, 1, DxgiFormat::Bc1Unorm, 128);

        assert_eq!(subresources.len(), 1);
        assert_eq!(subresources[0].row_pitch, 8);
    }

    #[test]
    fn test_array_elements_are_contiguous() {
        let header = block_header(16, 16, 3);
        let subresources = subresource_layout(&header, 2, DxgiFormat::Bc3Unorm, 148);

        assert_eq!(subresources.len(), 6);

        // 16x16 -> 256 bytes, 8x8 -> 64, 4x4 -> 16.
        let element_size = 256 + 64 + 16;
        assert_eq!(subresources[0].data_offset, 148);
        assert_eq!(subresources[3].data_offset, 148 + element_size);

        // The second chain restarts from the top-level dimensions.
        assert_eq!(subresources[3].row_pitch, subresources[0].row_pitch);
    }

    #[test]
    fn test_linear_pitch_rounds_up_to_bytes() {
        let header = linear_header(7, 4, 2, 32);
        let subresources = subresource_layout(&header, 1, DxgiFormat::R8G8B8A8Unorm, 128);

        // 7 * 32 bits = 28 bytes per row, 4 rows.
        assert_eq!(subresources[0].row_pitch, 28);
        assert_eq!(subresources[1].data_offset, 128 + 28 * 4);
        // 3 * 32 bits rounds up to 12 bytes.
        assert_eq!(subresources[1].row_pitch, 12);
    }

    #[test]
    fn test_neither_policy_flag_yields_zero_sizes() {
        let mut header = block_header(16, 16, 2);
        header.flags = DdsHeader::FLAG_TEXTURE;
        let subresources = subresource_layout(&header, 1, DxgiFormat::Bc1Unorm, 128);

        assert_eq!(subresources.len(), 2);
        for subresource in &subresources {
            assert_eq!(subresource.data_offset, 128);
            assert_eq!(subresource.row_pitch, 0);
        }
    }

    #[test]
    fn test_zero_mipmap_count_still_emits_top_level() {
        let header = block_header(16, 16, 0);
        let subresources = subresource_layout(&header, 1, DxgiFormat::Bc1Unorm, 128);

        assert_eq!(subresources.len(), 1);
    }

    #[test]
    fn test_slice_pitch_reserved() {
        let mut header = block_header(16, 16, 2);
        header.depth = 8;
        header.caps2 = DdsHeader::CAPS2_VOLUME;
        let subresources = subresource_layout(&header, 1, DxgiFormat::Bc1Unorm, 128);

        // Depth never multiplies into the emitted sizes.
        assert!(subresources.iter().all(|s| s.slice_pitch == 0));
        assert_eq!(subresources[1].data_offset, 128 + 128);
    }

    #[test]
    fn test_layout_is_pure() {
        let header = block_header(32, 32, 4);
        let first = subresource_layout(&header, 2, DxgiFormat::Bc2Unorm, 128);
        let second = subresource_layout(&header, 2, DxgiFormat::Bc2Unorm, 128);

        assert_eq!(first, second);
    }
}
