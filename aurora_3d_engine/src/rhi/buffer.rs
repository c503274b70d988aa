/// Buffer trait and buffer descriptor

use crate::error::{Error, Result};

/// Logical role of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferType {
    /// Vertex attributes
    Vertex,
    /// 32-bit indices
    Index,
    /// Uniform block storage
    Uniform,
    /// Shader storage block
    ShaderStorage,
}

/// Update frequency hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Written once
    #[default]
    Static,
    /// Written occasionally
    Dynamic,
    /// Written every frame
    Stream,
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Capacity in bytes
    pub size: u64,
    /// Logical role
    pub buffer_type: BufferType,
    /// Update frequency hint
    pub usage: BufferUsage,
    /// Optional initial contents (at most `size` bytes, uploaded at offset 0)
    pub data: Option<Vec<u8>>,
}

impl BufferDesc {
    /// Descriptor for an uninitialized buffer
    pub fn new(buffer_type: BufferType, size: u64) -> Self {
        Self {
            size,
            buffer_type,
            usage: BufferUsage::Static,
            data: None,
        }
    }

    /// Descriptor for a buffer sized and filled from `data`
    pub fn with_data(buffer_type: BufferType, data: &[u8]) -> Self {
        Self {
            size: data.len() as u64,
            buffer_type,
            usage: BufferUsage::Static,
            data: Some(data.to_vec()),
        }
    }

    /// Reject zero-sized buffers and initial data larger than the capacity
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::InvalidResource("Buffer size must be greater than zero".to_string()));
        }
        if let Some(data) = &self.data {
            if data.len() as u64 > self.size {
                return Err(Error::InvalidResource(format!(
                    "Initial data ({} bytes) exceeds buffer size ({} bytes)",
                    data.len(),
                    self.size
                )));
            }
        }
        Ok(())
    }
}

/// Check that `[offset, offset + len)` lies inside a buffer of `capacity` bytes
pub fn check_update_range(capacity: u64, offset: u64, len: u64) -> Result<()> {
    match offset.checked_add(len) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(Error::InvalidResource(format!(
            "Buffer update out of bounds: offset {} + size {} > capacity {}",
            offset, len, capacity
        ))),
    }
}

/// Buffer resource trait
///
/// Implemented by backend-specific buffer types (e.g., OpenGLBuffer).
/// The native buffer is released when dropped.
pub trait Buffer {
    /// Capacity in bytes
    fn size(&self) -> u64;

    fn buffer_type(&self) -> BufferType;

    fn usage(&self) -> BufferUsage;

    /// Backend object name (opaque to engine code)
    fn handle(&self) -> u64;

    /// Bind to the target matching the buffer type
    fn bind(&self);

    /// Unbind the target matching the buffer type
    fn unbind(&self);

    /// Bind to an indexed binding point (uniform / shader storage buffers)
    fn bind_base(&self, index: u32) -> Result<()>;

    /// Write `data` at `offset`
    ///
    /// Fails without touching the contents when `offset + data.len()`
    /// exceeds the capacity or while the buffer is mapped.
    fn update_data(&mut self, offset: u64, data: &[u8]) -> Result<()>;

    /// Map the whole buffer for writing
    ///
    /// Only one mapping may be live; mapping twice is an error and the
    /// first mapping stays active.
    fn map(&mut self) -> Result<&mut [u8]>;

    /// Release the mapping; fails when not mapped
    fn unmap(&mut self) -> Result<()>;

    fn is_mapped(&self) -> bool;
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
