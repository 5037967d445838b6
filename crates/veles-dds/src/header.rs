//! DDS header structures and header decoding.

use log::trace;
use veles_common::BinaryReader;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{Error, Result, DDS_MAGIC};

/// DDS file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C, packed)]
pub struct DdsHeader {
    /// Header size (should be 124).
    pub size: u32,
    /// Header flags.
    pub flags: u32,
    /// Image height.
    pub height: u32,
    /// Image width.
    pub width: u32,
    /// Pitch or linear size of the top-level image.
    pub pitch_or_linear_size: u32,
    /// Depth (for volume textures).
    pub depth: u32,
    /// Number of mipmap levels.
    pub mipmap_count: u32,
    /// Reserved.
    pub reserved1: [u32; 11],
    /// Pixel format.
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities.
    pub caps: u32,
    /// Surface capabilities 2 (cubemap faces, volume).
    pub caps2: u32,
    /// Surface capabilities 3.
    pub caps3: u32,
    /// Surface capabilities 4.
    pub caps4: u32,
    /// Reserved.
    pub reserved2: u32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    /// `pitch_or_linear_size` holds the row pitch of an uncompressed image.
    pub const FLAG_PITCH: u32 = 0x8;
    /// Required flags for any texture.
    pub const FLAG_TEXTURE: u32 = 0x1007;
    /// Header carries a mipmap count.
    pub const FLAG_MIPMAP: u32 = 0x20000;
    /// `pitch_or_linear_size` holds the total size of a compressed top level.
    pub const FLAG_LINEAR_SIZE: u32 = 0x80000;
    /// Header carries a depth.
    pub const FLAG_VOLUME: u32 = 0x800000;

    /// Surface has more than one sub-surface.
    pub const CAPS_COMPLEX: u32 = 0x8;
    /// Surface is a texture.
    pub const CAPS_TEXTURE: u32 = 0x1000;
    /// Surface has mipmaps.
    pub const CAPS_MIPMAP: u32 = 0x400008;

    /// Surface is a cubemap.
    pub const CAPS2_CUBEMAP: u32 = 0x200;
    /// Cubemap +X face stored.
    pub const CAPS2_CUBEMAP_POSITIVE_X: u32 = 0x600;
    /// Cubemap -X face stored.
    pub const CAPS2_CUBEMAP_NEGATIVE_X: u32 = 0xA00;
    /// Cubemap +Y face stored.
    pub const CAPS2_CUBEMAP_POSITIVE_Y: u32 = 0x1200;
    /// Cubemap -Y face stored.
    pub const CAPS2_CUBEMAP_NEGATIVE_Y: u32 = 0x2200;
    /// Cubemap +Z face stored.
    pub const CAPS2_CUBEMAP_POSITIVE_Z: u32 = 0x4200;
    /// Cubemap -Z face stored.
    pub const CAPS2_CUBEMAP_NEGATIVE_Z: u32 = 0x8200;
    /// Surface is a volume texture.
    pub const CAPS2_VOLUME: u32 = 0x200000;

    /// Check if this header is followed by a DX10 extended header.
    pub fn is_dx10(&self) -> bool {
        let pf = self.pixel_format;
        pf.has_four_cc() && pf.four_cc == FourCC::DX10
    }

    /// Mipmap count normalized to at least one level.
    ///
    /// Files written without `FLAG_MIPMAP` carry a count of zero; the top
    /// level still exists.
    pub fn mip_levels(&self) -> u32 {
        self.mipmap_count.max(1)
    }

    /// Check if the surface is a cubemap.
    pub fn is_cubemap(&self) -> bool {
        self.caps2 & Self::CAPS2_CUBEMAP != 0
    }

    /// Check if the surface is a volume texture.
    pub fn is_volume(&self) -> bool {
        self.caps2 & Self::CAPS2_VOLUME != 0
    }
}

/// DDS pixel format.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C, packed)]
pub struct DdsPixelFormat {
    /// Structure size (should be 32).
    pub size: u32,
    /// Pixel format flags.
    pub flags: u32,
    /// Four-character code for compression.
    pub four_cc: FourCC,
    /// Number of bits per pixel (for uncompressed formats).
    pub rgb_bit_count: u32,
    /// Red bit mask.
    pub r_bit_mask: u32,
    /// Green bit mask.
    pub g_bit_mask: u32,
    /// Blue bit mask.
    pub b_bit_mask: u32,
    /// Alpha bit mask.
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    /// Expected structure size.
    pub const SIZE: u32 = 32;

    /// `a_bit_mask` holds valid alpha data.
    pub const FLAG_ALPHA_PIXELS: u32 = 0x1;
    /// Alpha-only surface.
    pub const FLAG_ALPHA: u32 = 0x2;
    /// `four_cc` identifies the format.
    pub const FLAG_FOUR_CC: u32 = 0x4;
    /// Uncompressed RGB data described by the bit masks.
    pub const FLAG_RGB: u32 = 0x40;
    /// Uncompressed RGB data with an alpha channel.
    pub const FLAG_RGBA: u32 = 0x41;
    /// Uncompressed YUV data.
    pub const FLAG_YUV: u32 = 0x200;
    /// Single-channel luminance data.
    pub const FLAG_LUMINANCE: u32 = 0x20000;

    /// Check if the format is identified by its four-character code.
    pub fn has_four_cc(&self) -> bool {
        self.flags & Self::FLAG_FOUR_CC != 0
    }

    /// Check if the format is uncompressed RGB, with or without alpha.
    pub fn has_rgb(&self) -> bool {
        self.flags & (Self::FLAG_RGBA | Self::FLAG_RGB) != 0
    }

    /// Check if the format is single-channel luminance.
    pub fn has_luminance(&self) -> bool {
        self.flags & Self::FLAG_LUMINANCE != 0
    }
}

/// Four-character code for compression type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// DXT1 compression.
    pub const DXT1: Self = Self(*b"DXT1");
    /// DXT2 compression (premultiplied DXT3).
    pub const DXT2: Self = Self(*b"DXT2");
    /// DXT3 compression.
    pub const DXT3: Self = Self(*b"DXT3");
    /// DXT4 compression (premultiplied DXT5).
    pub const DXT4: Self = Self(*b"DXT4");
    /// DXT5 compression.
    pub const DXT5: Self = Self(*b"DXT5");
    /// DX10 extended header marker.
    pub const DX10: Self = Self(*b"DX10");
    /// BC4 unsigned compression.
    pub const BC4U: Self = Self(*b"BC4U");
    /// BC4 signed compression.
    pub const BC4S: Self = Self(*b"BC4S");
    /// BC5 signed compression.
    pub const BC5S: Self = Self(*b"BC5S");
    /// Legacy name for BC4 unsigned.
    pub const ATI1: Self = Self(*b"ATI1");
    /// Legacy name for BC5 unsigned.
    pub const ATI2: Self = Self(*b"ATI2");
    /// Packed R8G8_B8G8 layout.
    pub const RGBG: Self = Self(*b"RGBG");
    /// Packed G8R8_G8B8 layout.
    pub const GRGB: Self = Self(*b"GRGB");

    /// D3DFMT_A16B16G16R16.
    pub const A16B16G16R16: Self = Self::from_u32(36);
    /// D3DFMT_Q16W16V16U16.
    pub const Q16W16V16U16: Self = Self::from_u32(110);
    /// D3DFMT_R16F.
    pub const R16F: Self = Self::from_u32(111);
    /// D3DFMT_G16R16F.
    pub const G16R16F: Self = Self::from_u32(112);
    /// D3DFMT_A16B16G16R16F.
    pub const A16B16G16R16F: Self = Self::from_u32(113);
    /// D3DFMT_R32F.
    pub const R32F: Self = Self::from_u32(114);
    /// D3DFMT_G32R32F.
    pub const G32R32F: Self = Self::from_u32(115);
    /// D3DFMT_A32B32G32R32F.
    pub const A32B32G32R32F: Self = Self::from_u32(116);

    /// Build a code from a legacy numeric D3DFMT value.
    pub const fn from_u32(value: u32) -> Self {
        Self(value.to_le_bytes())
    }
}

/// DX10 extended header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C, packed)]
pub struct DdsHeaderDxt10 {
    /// DXGI format hint. Carried verbatim; format resolution reads the
    /// legacy pixel format block instead.
    pub dxgi_format: u32,
    /// Resource dimension.
    pub resource_dimension: u32,
    /// Misc flags.
    pub misc_flag: u32,
    /// Number of array elements.
    pub array_size: u32,
    /// Misc flags 2.
    pub misc_flags2: u32,
}

impl DdsHeaderDxt10 {
    /// Unknown resource dimension.
    pub const DIMENSION_UNKNOWN: u32 = 0;
    /// Buffer resource.
    pub const DIMENSION_BUFFER: u32 = 1;
    /// 1D texture.
    pub const DIMENSION_TEXTURE1D: u32 = 2;
    /// 2D texture.
    pub const DIMENSION_TEXTURE2D: u32 = 3;
    /// 3D texture.
    pub const DIMENSION_TEXTURE3D: u32 = 4;

    /// The texture is a cubemap.
    pub const MISC_TEXTURE_CUBE: u32 = 0x4;
}

/// Decode the header section of a DDS file.
///
/// Validates the magic, borrows the primary header in place and, when the
/// pixel format carries the [`FourCC::DX10`] marker, borrows the extended
/// header as well. Returns both views together with the offset of the first
/// payload byte.
///
/// Checks run in order and the first failure wins:
///
/// 1. the buffer must hold the magic plus the 124-byte header
///    ([`Error::TooSmall`]),
/// 2. the first four bytes must equal `"DDS "` ([`Error::InvalidMagic`]),
/// 3. with the DX10 marker set, the buffer must also hold the 20-byte
///    extended header ([`Error::TooSmallForDxt10`]).
///
/// No bytes are copied and nothing is allocated; the returned references
/// live as long as `data`.
pub fn parse_header(data: &[u8]) -> Result<(&DdsHeader, Option<&DdsHeaderDxt10>, usize)> {
    let min_size = 4 + std::mem::size_of::<DdsHeader>();
    if data.len() < min_size {
        return Err(Error::TooSmall {
            needed: min_size,
            actual: data.len(),
        });
    }

    let magic: [u8; 4] = data[..4].try_into().unwrap();
    if &magic != DDS_MAGIC {
        return Err(Error::InvalidMagic(magic));
    }

    let mut reader = BinaryReader::new_at(data, 4);
    let header: &DdsHeader = reader.read_struct_ref()?;

    let dxt10 = if header.is_dx10() {
        let min_size = min_size + std::mem::size_of::<DdsHeaderDxt10>();
        if data.len() < min_size {
            return Err(Error::TooSmallForDxt10 {
                needed: min_size,
                actual: data.len(),
            });
        }
        Some(reader.read_struct_ref::<DdsHeaderDxt10>()?)
    } else {
        None
    };

    trace!(
        "parsed DDS header: {}x{}, {} mip levels, dx10: {}",
        { header.width },
        { header.height },
        header.mip_levels(),
        dxt10.is_some()
    );

    Ok((header, dxt10, reader.position()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zerocopy::IntoBytes;

    fn four_cc_pixel_format(four_cc: FourCC) -> DdsPixelFormat {
        DdsPixelFormat {
            size: DdsPixelFormat::SIZE,
            flags: DdsPixelFormat::FLAG_FOUR_CC,
            four_cc,
            rgb_bit_count: 0,
            r_bit_mask: 0,
            g_bit_mask: 0,
            b_bit_mask: 0,
            a_bit_mask: 0,
        }
    }

    fn sample_header(four_cc: FourCC) -> DdsHeader {
        DdsHeader {
            size: DdsHeader::SIZE,
            flags: DdsHeader::FLAG_TEXTURE | DdsHeader::FLAG_LINEAR_SIZE,
            height: 64,
            width: 64,
            pitch_or_linear_size: 0,
            depth: 1,
            mipmap_count: 1,
            reserved1: [0; 11],
            pixel_format: four_cc_pixel_format(four_cc),
            caps: DdsHeader::CAPS_TEXTURE,
            caps2: 0,
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        }
    }

    fn file_bytes(header: &DdsHeader, dxt10: Option<&DdsHeaderDxt10>) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(DDS_MAGIC);
        data.extend_from_slice(header.as_bytes());
        if let Some(dxt10) = dxt10 {
            data.extend_from_slice(dxt10.as_bytes());
        }
        data
    }

    #[test]
    fn test_header_sizes() {
        assert_eq!(std::mem::size_of::<DdsHeader>(), 124);
        assert_eq!(std::mem::size_of::<DdsPixelFormat>(), 32);
        assert_eq!(std::mem::size_of::<DdsHeaderDxt10>(), 20);
    }

    #[test]
    fn test_parse_plain_header() {
        let data = file_bytes(&sample_header(FourCC::DXT1), None);

        let (header, dxt10, payload) = parse_header(&data).unwrap();
        assert_eq!({ header.width }, 64);
        assert_eq!({ header.height }, 64);
        assert!(dxt10.is_none());
        assert_eq!(payload, 128);
    }

    #[test]
    fn test_too_small() {
        // Valid magic, truncated header.
        let mut data = file_bytes(&sample_header(FourCC::DXT1), None);
        data.truncate(100);

        match parse_header(&data) {
            Err(Error::TooSmall { needed, actual }) => {
                assert_eq!(needed, 128);
                assert_eq!(actual, 100);
            }
            other => panic!("expected TooSmall, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_invalid_magic() {
        let mut data = file_bytes(&sample_header(FourCC::DXT1), None);
        data[..4].copy_from_slice(b"PNG\0");

        assert!(matches!(
            parse_header(&data),
            Err(Error::InvalidMagic(m)) if &m == b"PNG\0"
        ));
    }

    #[test]
    fn test_dx10_round_trip() {
        let dxt10 = DdsHeaderDxt10 {
            dxgi_format: 98,
            resource_dimension: DdsHeaderDxt10::DIMENSION_TEXTURE2D,
            misc_flag: 0,
            array_size: 6,
            misc_flags2: 0,
        };
        let data = file_bytes(&sample_header(FourCC::DX10), Some(&dxt10));

        let (header, dxt10, payload) = parse_header(&data).unwrap();
        assert!(header.is_dx10());
        let dxt10 = dxt10.expect("extended header");
        assert_eq!({ dxt10.array_size }, 6);
        assert_eq!(payload, 148);
    }

    #[test]
    fn test_dx10_marker_without_room() {
        // DX10 marker set, but the extended header is missing.
        let data = file_bytes(&sample_header(FourCC::DX10), None);

        match parse_header(&data) {
            Err(Error::TooSmallForDxt10 { needed, actual }) => {
                assert_eq!(needed, 148);
                assert_eq!(actual, 128);
            }
            other => panic!("expected TooSmallForDxt10, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_four_cc_flag_required_for_dx10() {
        // "DX10" in the code field without FLAG_FOUR_CC is not a marker.
        let mut header = sample_header(FourCC::DX10);
        header.pixel_format.flags = DdsPixelFormat::FLAG_RGBA;
        let data = file_bytes(&header, None);

        let (header, dxt10, payload) = parse_header(&data).unwrap();
        assert!(!header.is_dx10());
        assert!(dxt10.is_none());
        assert_eq!(payload, 128);
    }

    #[test]
    fn test_mip_levels_clamped() {
        let mut header = sample_header(FourCC::DXT1);
        header.mipmap_count = 0;
        assert_eq!(header.mip_levels(), 1);

        header.mipmap_count = 9;
        assert_eq!(header.mip_levels(), 9);
    }

    #[test]
    fn test_caps2_classification() {
        let mut header = sample_header(FourCC::DXT1);
        assert!(!header.is_cubemap());

        header.caps2 = DdsHeader::CAPS2_CUBEMAP_POSITIVE_X;
        assert!(header.is_cubemap());

        header.caps2 = DdsHeader::CAPS2_VOLUME;
        assert!(header.is_volume());
    }
}
