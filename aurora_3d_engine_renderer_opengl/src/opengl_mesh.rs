/// Mesh - OpenGL implementation of the Mesh trait
///
/// A mesh owns its vertex buffer, optional index buffer and the vertex
/// array object that records the attribute layout.

use std::rc::Rc;
use glow::HasContext;
use aurora_3d_engine::aurora3d::{
    Error,
    Result,
    render::{Mesh, MeshDesc, PrimitiveType, VertexLayout},
};
use aurora_3d_engine::{engine_err, engine_error};
use crate::opengl_context::{handle_of, GlContext};
use crate::opengl_format::{primitive_mode, vertex_format};

pub struct OpenGLMesh {
    ctx: Rc<GlContext>,
    pub(crate) vertex_array: glow::NativeVertexArray,
    vertex_buffer: glow::NativeBuffer,
    index_buffer: Option<glow::NativeBuffer>,
    vertex_count: u32,
    index_count: u32,
    layout: VertexLayout,
}

impl OpenGLMesh {
    pub(crate) fn new(ctx: Rc<GlContext>, desc: &MeshDesc) -> Result<Self> {
        desc.validate()?;

        // Resolve every attribute before touching GL
        let mut attributes = Vec::with_capacity(desc.layout.attributes.len());
        for attribute in &desc.layout.attributes {
            let format = vertex_format(attribute.format).ok_or_else(|| {
                engine_error!("aurora3d::opengl", "Vertex format {:?} is not supported (location {})",
                    attribute.format, attribute.location);
                Error::InvalidResource(format!(
                    "Vertex format {:?} is not supported by the OpenGL backend",
                    attribute.format
                ))
            })?;
            attributes.push((attribute, format));
        }

        let gl = &ctx.gl;
        let vertex_array = unsafe { gl.create_vertex_array() }
            .map_err(|e| engine_err!("aurora3d::opengl", "Failed to create vertex array: {}", e))?;
        let vertex_buffer = match unsafe { gl.create_buffer() } {
            Ok(buffer) => buffer,
            Err(e) => {
                unsafe { gl.delete_vertex_array(vertex_array) };
                return Err(engine_err!("aurora3d::opengl", "Failed to create vertex buffer: {}", e));
            }
        };
        let index_buffer = if desc.indices.is_some() {
            match unsafe { gl.create_buffer() } {
                Ok(buffer) => Some(buffer),
                Err(e) => {
                    unsafe {
                        gl.delete_buffer(vertex_buffer);
                        gl.delete_vertex_array(vertex_array);
                    }
                    return Err(engine_err!("aurora3d::opengl", "Failed to create index buffer: {}", e));
                }
            }
        } else {
            None
        };

        let stride = desc.layout.stride as i32;
        unsafe {
            gl.bind_vertex_array(Some(vertex_array));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, &desc.vertex_data, glow::STATIC_DRAW);

            if let (Some(buffer), Some(indices)) = (index_buffer, &desc.indices) {
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffer));
                gl.buffer_data_u8_slice(
                    glow::ELEMENT_ARRAY_BUFFER,
                    bytemuck::cast_slice(indices),
                    glow::STATIC_DRAW,
                );
            }

            for (attribute, format) in &attributes {
                let offset = attribute.offset as i32;
                if format.integer {
                    gl.vertex_attrib_pointer_i32(attribute.location, format.size, format.data_type, stride, offset);
                } else {
                    gl.vertex_attrib_pointer_f32(
                        attribute.location,
                        format.size,
                        format.data_type,
                        format.normalized,
                        stride,
                        offset,
                    );
                }
                gl.enable_vertex_attrib_array(attribute.location);
            }

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }

        let mesh = Self {
            ctx: ctx.clone(),
            vertex_array,
            vertex_buffer,
            index_buffer,
            vertex_count: desc.vertex_count(),
            index_count: desc.index_count(),
            layout: desc.layout.clone(),
        };
        ctx.check_errors("mesh upload")?;
        Ok(mesh)
    }
}

impl Mesh for OpenGLMesh {
    fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    fn index_count(&self) -> u32 {
        self.index_count
    }

    fn has_indices(&self) -> bool {
        self.index_buffer.is_some()
    }

    fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    fn handle(&self) -> u64 {
        handle_of(self.vertex_array.0)
    }

    fn bind(&self) {
        unsafe { self.ctx.gl.bind_vertex_array(Some(self.vertex_array)) };
    }

    fn unbind(&self) {
        unsafe { self.ctx.gl.bind_vertex_array(None) };
    }

    fn draw_with(&self, primitive: PrimitiveType) {
        let mode = primitive_mode(primitive);
        let gl = &self.ctx.gl;
        unsafe {
            gl.bind_vertex_array(Some(self.vertex_array));
            if self.index_buffer.is_some() {
                gl.draw_elements(mode, self.index_count as i32, glow::UNSIGNED_INT, 0);
            } else {
                gl.draw_arrays(mode, 0, self.vertex_count as i32);
            }
            gl.bind_vertex_array(None);
        }
    }
}

impl Drop for OpenGLMesh {
    fn drop(&mut self) {
        let gl = &self.ctx.gl;
        unsafe {
            gl.delete_vertex_array(self.vertex_array);
            gl.delete_buffer(self.vertex_buffer);
            if let Some(buffer) = self.index_buffer {
                gl.delete_buffer(buffer);
            }
        }
    }
}
