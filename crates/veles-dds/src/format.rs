//! Pixel format resolution.
//!
//! Legacy DDS files describe their encoding either through channel bit
//! masks or through a four-character code; this module maps both onto a
//! single canonical tag.

use crate::header::{DdsPixelFormat, FourCC};

/// Canonical pixel encodings a DDS file can resolve to.
///
/// Only the encodings the resolver can actually produce are listed, plus
/// [`Unknown`][Self::Unknown] for everything else. `Unknown` is a valid
/// outcome, not an error; callers decide whether to reject the asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DxgiFormat {
    /// 8:8:8:8 RGBA, 32 bits per pixel.
    R8G8B8A8Unorm,
    /// 16:16 two-channel, 32 bits per pixel.
    R16G16Unorm,
    /// 10:10:10:2 RGBA, 32 bits per pixel.
    R10G10B10A2Unorm,
    /// 8:8:8:8 BGRA, 32 bits per pixel.
    B8G8R8A8Unorm,
    /// 5:5:5:1 BGRA, 16 bits per pixel.
    B5G5R5A1Unorm,
    /// 4:4:4:4 BGRA, 16 bits per pixel.
    B4G4R4A4Unorm,
    /// Single channel, 16 bits per pixel.
    R16Unorm,
    /// Single channel, 8 bits per pixel.
    R8Unorm,
    /// BC1 block compression (8-byte blocks).
    Bc1Unorm,
    /// BC2 block compression (16-byte blocks).
    Bc2Unorm,
    /// BC3 block compression (16-byte blocks).
    Bc3Unorm,
    /// BC4 unsigned block compression (8-byte blocks).
    Bc4Unorm,
    /// BC4 signed block compression (8-byte blocks).
    Bc4Snorm,
    /// BC5 unsigned block compression (16-byte blocks).
    Bc5Unorm,
    /// BC5 signed block compression (16-byte blocks).
    Bc5Snorm,
    /// Packed R8G8_B8G8 layout.
    R8G8B8G8Unorm,
    /// Packed G8R8_G8B8 layout.
    G8R8G8B8Unorm,
    /// 16:16:16:16 unsigned fixed point.
    R16G16B16A16Unorm,
    /// 16:16:16:16 signed fixed point.
    R16G16B16A16Snorm,
    /// Single-channel half float.
    R16Float,
    /// Two-channel half float.
    R16G16Float,
    /// Four-channel half float.
    R16G16B16A16Float,
    /// Single-channel float.
    R32Float,
    /// Two-channel float.
    R32G32Float,
    /// Four-channel float.
    R32G32B32A32Float,
    /// Unresolved encoding.
    Unknown,
}

/// One row of the legacy bit-mask dispatch table:
/// (bit count, r mask, g mask, b mask, a mask) -> format.
type MaskRule = (u32, u32, u32, u32, u32, DxgiFormat);

/// Uncompressed RGB(A) layouts, in resolution priority order.
///
/// Layouts the legacy loaders fell through on (BGR-ordered 10:10:10:2 and
/// alpha-less 5:5:5) have no row and resolve to `Unknown`.
const RGB_RULES: &[MaskRule] = &[
    (32, 0xFF, 0xFF00, 0xFF0000, 0xFF000000, DxgiFormat::R8G8B8A8Unorm),
    (32, 0xFFFF, 0xFFFF0000, 0, 0, DxgiFormat::R16G16Unorm),
    (32, 0x3FF, 0xFFC00, 0x3FF00000, 0, DxgiFormat::R10G10B10A2Unorm),
    (32, 0xFF0000, 0xFF00, 0xFF, 0xFF000000, DxgiFormat::B8G8R8A8Unorm),
    (16, 0x7C00, 0x3E0, 0x1F, 0x8000, DxgiFormat::B5G5R5A1Unorm),
    (16, 0xF00, 0xF0, 0xF, 0xF000, DxgiFormat::B4G4R4A4Unorm),
];

/// Single-channel luminance layouts.
const LUMINANCE_RULES: &[MaskRule] = &[
    (16, 0xFFFF, 0, 0, 0, DxgiFormat::R16Unorm),
    (8, 0xFF, 0, 0, 0, DxgiFormat::R8Unorm),
];

fn match_masks(rules: &[MaskRule], pf: &DdsPixelFormat) -> DxgiFormat {
    rules
        .iter()
        .find(|&&(bit_count, r, g, b, a, _)| {
            bit_count == pf.rgb_bit_count
                && r == pf.r_bit_mask
                && g == pf.g_bit_mask
                && b == pf.b_bit_mask
                && a == pf.a_bit_mask
        })
        .map_or(DxgiFormat::Unknown, |&(.., format)| format)
}

impl DxgiFormat {
    /// Resolve a canonical format from the legacy pixel format block.
    ///
    /// Total function: anything the tables do not cover resolves to
    /// [`Unknown`][Self::Unknown]. The flag checks run in fixed priority
    /// order (RGB, luminance, four-character code) and within each branch
    /// the first matching table row wins.
    pub fn from_pixel_format(pf: DdsPixelFormat) -> Self {
        if pf.has_rgb() {
            match_masks(RGB_RULES, &pf)
        } else if pf.has_luminance() {
            match_masks(LUMINANCE_RULES, &pf)
        } else if pf.has_four_cc() {
            match pf.four_cc {
                FourCC::DXT1 => Self::Bc1Unorm,
                FourCC::DXT2 | FourCC::DXT3 => Self::Bc2Unorm,
                FourCC::DXT4 | FourCC::DXT5 => Self::Bc3Unorm,
                FourCC::BC4U | FourCC::ATI1 => Self::Bc4Unorm,
                FourCC::BC4S => Self::Bc4Snorm,
                FourCC::ATI2 => Self::Bc5Unorm,
                FourCC::BC5S => Self::Bc5Snorm,
                FourCC::RGBG => Self::R8G8B8G8Unorm,
                FourCC::GRGB => Self::G8R8G8B8Unorm,
                FourCC::A16B16G16R16 => Self::R16G16B16A16Unorm,
                FourCC::Q16W16V16U16 => Self::R16G16B16A16Snorm,
                FourCC::R16F => Self::R16Float,
                FourCC::G16R16F => Self::R16G16Float,
                FourCC::A16B16G16R16F => Self::R16G16B16A16Float,
                FourCC::R32F => Self::R32Float,
                FourCC::G32R32F => Self::R32G32Float,
                FourCC::A32B32G32R32F => Self::R32G32B32A32Float,
                _ => Self::Unknown,
            }
        } else {
            Self::Unknown
        }
    }

    /// Bytes per 4x4 block for block-compressed formats, 0 for linear ones.
    pub fn block_size(self) -> usize {
        match self {
            Self::Bc1Unorm | Self::Bc4Unorm | Self::Bc4Snorm => 8,
            Self::Bc2Unorm | Self::Bc3Unorm | Self::Bc5Unorm | Self::Bc5Snorm => 16,
            _ => 0,
        }
    }

    /// Check if the format stores pixels in 4x4 blocks.
    pub fn is_block_compressed(self) -> bool {
        self.block_size() != 0
    }
}
