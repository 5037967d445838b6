//! High-level decode pipeline.

use log::debug;

use crate::format::DxgiFormat;
use crate::header::{parse_header, DdsHeader, DdsHeaderDxt10};
use crate::layout::{subresource_layout, Subresource};
use crate::Result;

/// A decoded DDS texture: borrowed header views plus the computed
/// subresource layout.
///
/// The texture borrows the file buffer it was parsed from and copies no
/// pixel data; each [`Subresource`] references a byte range of that buffer.
#[derive(Debug)]
pub struct DdsTexture<'a> {
    /// Primary file header.
    pub header: &'a DdsHeader,
    /// Extended header, present when the pixel format carries the DX10
    /// marker.
    pub dxt10: Option<&'a DdsHeaderDxt10>,
    /// Resolved canonical format.
    pub format: DxgiFormat,
    /// Offset of the first payload byte.
    pub payload_offset: usize,
    /// Byte ranges in upload order: array element major, mip level minor.
    pub subresources: Vec<Subresource>,
}

impl<'a> DdsTexture<'a> {
    /// Decode a DDS file held in memory.
    ///
    /// Chains header decoding, format resolution and layout computation.
    /// An unrecognized pixel format is not an error; the texture comes back
    /// with [`DxgiFormat::Unknown`] and zero-size subresources for the
    /// caller to reject.
    ///
    /// Subresource offsets are not validated against `data.len()`; a caller
    /// uploading the payload must bounds-check them first.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let (header, dxt10, payload_offset) = parse_header(data)?;

        let format = DxgiFormat::from_pixel_format(header.pixel_format);
        let array_size = array_size(dxt10);
        let subresources = subresource_layout(header, array_size, format, payload_offset);

        debug!(
            "decoded DDS: {:?}, {} array elements, {} subresources",
            format,
            array_size,
            subresources.len()
        );

        Ok(Self {
            header,
            dxt10,
            format,
            payload_offset,
            subresources,
        })
    }

    /// Number of array elements (1 unless the extended header says
    /// otherwise).
    pub fn array_size(&self) -> u32 {
        array_size(self.dxt10)
    }
}

fn array_size(dxt10: Option<&DdsHeaderDxt10>) -> u32 {
    match dxt10 {
        Some(dxt10) => {
            let count = dxt10.array_size;
            count.max(1)
        }
        None => 1,
    }
}
