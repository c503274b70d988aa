/// Mesh trait, vertex layout and mesh descriptor

use crate::error::{Error, Result};
use super::format::Format;

/// Topology used when drawing a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveType {
    #[default]
    Triangles,
    TriangleStrip,
    Lines,
    LineStrip,
    Points,
}

/// One vertex attribute inside an interleaved vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location
    pub location: u32,
    /// Element format (R32G32B32_FLOAT for a vec3 position, ...)
    pub format: Format,
    /// Byte offset inside the vertex
    pub offset: u32,
}

/// Interleaved vertex description
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexLayout {
    pub attributes: Vec<VertexAttribute>,
    /// Size of one vertex in bytes
    pub stride: u32,
}

impl VertexLayout {
    pub fn new(stride: u32) -> Self {
        Self {
            attributes: Vec::new(),
            stride,
        }
    }

    /// Builder-style attribute append
    pub fn with_attribute(mut self, location: u32, format: Format, offset: u32) -> Self {
        self.attributes.push(VertexAttribute { location, format, offset });
        self
    }

    /// Every attribute must fit inside the stride and use an uncompressed color format
    pub fn validate(&self) -> Result<()> {
        if self.stride == 0 {
            return Err(Error::InvalidResource("Vertex stride must be greater than zero".to_string()));
        }
        for attribute in &self.attributes {
            if !attribute.format.is_color() || attribute.format.is_compressed() {
                return Err(Error::InvalidResource(format!(
                    "Format {:?} cannot be used as a vertex attribute (location {})",
                    attribute.format, attribute.location
                )));
            }
            let end = attribute.offset as u64 + attribute.format.bytes_per_pixel() as u64;
            if end > self.stride as u64 {
                return Err(Error::InvalidResource(format!(
                    "Vertex attribute at location {} ends at byte {} past stride {}",
                    attribute.location, end, self.stride
                )));
            }
        }
        Ok(())
    }
}

/// Descriptor for creating a mesh
#[derive(Debug, Clone)]
pub struct MeshDesc {
    /// Raw interleaved vertex bytes
    pub vertex_data: Vec<u8>,
    /// Optional 32-bit index list
    pub indices: Option<Vec<u32>>,
    pub layout: VertexLayout,
}

impl MeshDesc {
    /// Build from any `Pod` vertex slice
    pub fn from_vertices<V: bytemuck::Pod>(vertices: &[V], layout: VertexLayout) -> Self {
        Self {
            vertex_data: bytemuck::cast_slice(vertices).to_vec(),
            indices: None,
            layout,
        }
    }

    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    /// Vertex count derived from byte size and stride
    pub fn vertex_count(&self) -> u32 {
        if self.layout.stride == 0 {
            return 0;
        }
        (self.vertex_data.len() / self.layout.stride as usize) as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.as_ref().map_or(0, |i| i.len() as u32)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        if self.vertex_data.is_empty() {
            return Err(Error::InvalidResource("Mesh has no vertex data".to_string()));
        }
        if self.vertex_data.len() % self.layout.stride as usize != 0 {
            return Err(Error::InvalidResource(format!(
                "Vertex data ({} bytes) is not a multiple of stride {}",
                self.vertex_data.len(),
                self.layout.stride
            )));
        }
        if let Some(indices) = &self.indices {
            let vertex_count = self.vertex_count();
            if let Some(bad) = indices.iter().find(|i| **i >= vertex_count) {
                return Err(Error::InvalidResource(format!(
                    "Index {} out of range for {} vertices",
                    bad, vertex_count
                )));
            }
        }
        Ok(())
    }
}

/// Mesh resource trait
///
/// Geometry is immutable after creation. The native vertex array and
/// buffers are released when dropped.
pub trait Mesh {
    fn vertex_count(&self) -> u32;

    fn index_count(&self) -> u32;

    fn has_indices(&self) -> bool;

    fn layout(&self) -> &VertexLayout;

    /// Backend vertex-array name (opaque to engine code)
    fn handle(&self) -> u64;

    fn bind(&self);

    fn unbind(&self);

    /// Draw as triangles, indexed when index data was supplied
    fn draw(&self) {
        self.draw_with(PrimitiveType::Triangles);
    }

    /// Draw with an explicit topology
    fn draw_with(&self, primitive: PrimitiveType);
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
