// IDX file format (the MNIST container), all integers big-endian:
//
//   images: magic(2051) | count(u32) | rows(u32) | cols(u32) | pixels(u8 × count·rows·cols)
//   labels: magic(2049) | count(u32) | labels(u8 × count)

use crate::error::{DataError, Result};

pub const IMAGES_MAGIC: u32 = 2051;
pub const LABELS_MAGIC: u32 = 2049;

/// Decoded image file: `count` images of `rows × cols` bytes each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdxImages {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<u8>,
}

impl IdxImages {
    fn per_image(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols).filter(|&n| n > 0)
    }

    pub fn count(&self) -> usize {
        self.per_image().map_or(0, |n| self.data.len() / n)
    }

    /// Raw bytes of image `i`, `None` past the end.
    pub fn image(&self, i: usize) -> Option<&[u8]> {
        let per_image = self.per_image()?;
        let start = i.checked_mul(per_image)?;
        self.data.get(start..start.checked_add(per_image)?)
    }
}

pub fn parse_images(bytes: &[u8]) -> Result<IdxImages> {
    if bytes.len() < 16 {
        return Err(DataError::InvalidFormat("image file shorter than its header".into()));
    }
    check_magic(bytes, IMAGES_MAGIC)?;

    let count = read_u32(bytes, 4) as usize;
    let rows = read_u32(bytes, 8) as usize;
    let cols = read_u32(bytes, 12) as usize;

    let expected = rows
        .checked_mul(cols)
        .and_then(|n| n.checked_mul(count))
        .and_then(|n| n.checked_add(16))
        .ok_or_else(|| DataError::InvalidFormat("image header sizes overflow".into()))?;
    if bytes.len() < expected {
        return Err(DataError::InvalidFormat(format!(
            "image file truncated: expected {expected} bytes, got {}",
            bytes.len()
        )));
    }

    Ok(IdxImages {
        rows,
        cols,
        data: bytes[16..expected].to_vec(),
    })
}

pub fn parse_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < 8 {
        return Err(DataError::InvalidFormat("label file shorter than its header".into()));
    }
    check_magic(bytes, LABELS_MAGIC)?;

    let count = read_u32(bytes, 4) as usize;
    let expected = 8 + count;
    if bytes.len() < expected {
        return Err(DataError::InvalidFormat(format!(
            "label file truncated: expected {expected} bytes, got {}",
            bytes.len()
        )));
    }

    Ok(bytes[8..expected].to_vec())
}

/// Encode images into IDX bytes. Used to stage fixtures and local mirrors.
pub fn encode_images(images: &[Vec<u8>], rows: u32, cols: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(16 + images.iter().map(Vec::len).sum::<usize>());
    buf.extend_from_slice(&IMAGES_MAGIC.to_be_bytes());
    buf.extend_from_slice(&(images.len() as u32).to_be_bytes());
    buf.extend_from_slice(&rows.to_be_bytes());
    buf.extend_from_slice(&cols.to_be_bytes());
    for image in images {
        buf.extend_from_slice(image);
    }
    buf
}

pub fn encode_labels(labels: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + labels.len());
    buf.extend_from_slice(&LABELS_MAGIC.to_be_bytes());
    buf.extend_from_slice(&(labels.len() as u32).to_be_bytes());
    buf.extend_from_slice(labels);
    buf
}

fn check_magic(bytes: &[u8], expected: u32) -> Result<()> {
    let found = read_u32(bytes, 0);
    if found != expected {
        return Err(DataError::InvalidFormat(format!(
            "bad magic number: expected {expected}, found {found}"
        )));
    }
    Ok(())
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
