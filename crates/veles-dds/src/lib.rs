//! DDS texture container decoding.
//!
//! A DDS file is a magic number, a fixed-size header, an optional DX10
//! extended header and a raw pixel payload. This crate decodes the header
//! section in place, resolves the legacy pixel format block to a canonical
//! format tag and computes the byte range of every (array element, mip
//! level) pair in the payload, ready to hand to a graphics backend.
//!
//! The decoder never copies pixel data and performs no I/O; the caller
//! supplies the file bytes and owns the upload.
//!
//! # Example
//!
//! ```no_run
//! use veles_dds::DdsTexture;
//!
//! let data = std::fs::read("texture.dds")?;
//! let texture = DdsTexture::parse(&data)?;
//!
//! println!("format: {:?}", texture.format);
//! for subresource in &texture.subresources {
//!     // upload data[subresource.data_offset..] with subresource.row_pitch
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod format;
mod header;
mod layout;
mod texture;

pub use error::{Error, Result};
pub use format::DxgiFormat;
pub use header::{parse_header, DdsHeader, DdsHeaderDxt10, DdsPixelFormat, FourCC};
pub use layout::{subresource_layout, Subresource};
pub use texture::DdsTexture;

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";
