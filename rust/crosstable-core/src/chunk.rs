//! Chunked binary stream: the artifact container format.
//!
//! A stream is a sequence of frames, each `u32` chunk id, `u32`
//! payload byte length, payload, all little-endian, no padding.
//! Writing happens fully in memory and hits the filesystem once, via a
//! temporary sibling renamed into place, so an aborted run never
//! leaves a partial artifact behind.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;

const FRAME_BYTES: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("a chunk is already open")]
    AlreadyOpen,
    #[error("no chunk is open")]
    NotOpen,
    #[error("cannot save with an open chunk")]
    UnclosedChunk,
    #[error("chunk payload exceeds u32 range")]
    PayloadTooLarge,
    #[error("truncated chunk frame at offset {0}")]
    TruncatedFrame(usize),
    #[error("chunk {0} not present")]
    Missing(u32),
}

/// In-memory chunk stream writer.
#[derive(Debug, Default)]
pub struct ChunkWriter {
    buf: Vec<u8>,
    /// Offset of the open chunk's length field, if any.
    open_at: Option<usize>,
}

impl ChunkWriter {
    pub fn new() -> Self {
        ChunkWriter::default()
    }

    pub fn open_chunk(&mut self, id: u32) -> Result<(), ChunkError> {
        if self.open_at.is_some() {
            return Err(ChunkError::AlreadyOpen);
        }
        let mut frame = [0u8; FRAME_BYTES];
        LittleEndian::write_u32(&mut frame[0..4], id);
        self.buf.extend_from_slice(&frame);
        self.open_at = Some(self.buf.len() - 4);
        Ok(())
    }

    pub fn close_chunk(&mut self) -> Result<(), ChunkError> {
        let at = self.open_at.take().ok_or(ChunkError::NotOpen)?;
        let payload = self.buf.len() - at - 4;
        if payload > u32::MAX as usize {
            return Err(ChunkError::PayloadTooLarge);
        }
        LittleEndian::write_u32(&mut self.buf[at..at + 4], payload as u32);
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), ChunkError> {
        let mut b = [0u8; 2];
        LittleEndian::write_u16(&mut b, value);
        self.write_bytes(&b)
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), ChunkError> {
        let mut b = [0u8; 4];
        LittleEndian::write_u32(&mut b, value);
        self.write_bytes(&b)
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), ChunkError> {
        let mut b = [0u8; 4];
        LittleEndian::write_f32(&mut b, value);
        self.write_bytes(&b)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), ChunkError> {
        if self.open_at.is_none() {
            return Err(ChunkError::NotOpen);
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// All-or-nothing save: the stream lands at `path` complete or not
    /// at all.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ChunkError> {
        if self.open_at.is_some() {
            return Err(ChunkError::UnclosedChunk);
        }
        let path = path.as_ref();
        let tmp = path.with_extension("tmp");
        {
            let mut file = File::create(&tmp)?;
            file.write_all(&self.buf)?;
            file.sync_all()?;
        }
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

/// Memory-mapped chunk stream reader.
pub struct ChunkReader {
    mmap: Mmap,
}

impl ChunkReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ChunkError> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let reader = ChunkReader { mmap };
        reader.validate_frames()?;
        Ok(reader)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }

    /// Byte range of the first chunk with `id`.
    pub fn find_range(&self, id: u32) -> Result<std::ops::Range<usize>, ChunkError> {
        let mut offset = 0usize;
        while offset < self.mmap.len() {
            let frame_id = LittleEndian::read_u32(&self.mmap[offset..offset + 4]);
            let len = LittleEndian::read_u32(&self.mmap[offset + 4..offset + 8]) as usize;
            let start = offset + FRAME_BYTES;
            if frame_id == id {
                return Ok(start..start + len);
            }
            offset = start + len;
        }
        Err(ChunkError::Missing(id))
    }

    /// Payload of the first chunk with `id`.
    pub fn find(&self, id: u32) -> Result<&[u8], ChunkError> {
        let range = self.find_range(id)?;
        Ok(&self.mmap[range])
    }

    /// Walks every frame once so `find` can index without re-checking
    /// bounds.
    fn validate_frames(&self) -> Result<(), ChunkError> {
        let mut offset = 0usize;
        while offset < self.mmap.len() {
            if self.mmap.len() - offset < FRAME_BYTES {
                return Err(ChunkError::TruncatedFrame(offset));
            }
            let len = LittleEndian::read_u32(&self.mmap[offset + 4..offset + 8]) as usize;
            let start = offset + FRAME_BYTES;
            if self.mmap.len() - start < len {
                return Err(ChunkError::TruncatedFrame(offset));
            }
            offset = start + len;
        }
        Ok(())
    }
}
