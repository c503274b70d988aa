/// Buffer - OpenGL implementation of the Buffer trait

use std::rc::Rc;
use glow::HasContext;
use aurora_3d_engine::aurora3d::{
    Error,
    Result,
    render::{check_update_range, Buffer, BufferDesc, BufferType, BufferUsage},
};
use aurora_3d_engine::{engine_err, engine_warn};
use crate::opengl_context::{handle_of, GlContext};
use crate::opengl_format::{buffer_target, buffer_usage};

/// OpenGL buffer object
pub struct OpenGLBuffer {
    ctx: Rc<GlContext>,
    pub(crate) buffer: glow::NativeBuffer,
    /// Bind target derived from the buffer type
    target: u32,
    buffer_type: BufferType,
    usage: BufferUsage,
    size: u64,
    mapped: bool,
}

impl OpenGLBuffer {
    /// Allocate `desc.size` bytes and upload the optional initial data
    pub(crate) fn new(ctx: Rc<GlContext>, desc: &BufferDesc) -> Result<Self> {
        desc.validate()?;

        let size = i32::try_from(desc.size).map_err(|_| {
            Error::InvalidResource(format!("Buffer size {} exceeds the GL limit", desc.size))
        })?;
        let target = buffer_target(desc.buffer_type);
        let usage = buffer_usage(desc.usage);
        let gl = &ctx.gl;

        let buffer = unsafe { gl.create_buffer() }
            .map_err(|e| engine_err!("aurora3d::opengl", "Failed to create buffer: {}", e))?;

        unsafe {
            // Keep index uploads out of whatever vertex array is bound
            if target == glow::ELEMENT_ARRAY_BUFFER {
                gl.bind_vertex_array(None);
            }
            gl.bind_buffer(target, Some(buffer));
            match &desc.data {
                Some(data) if data.len() as u64 == desc.size => {
                    gl.buffer_data_u8_slice(target, data, usage);
                }
                Some(data) => {
                    gl.buffer_data_size(target, size, usage);
                    gl.buffer_sub_data_u8_slice(target, 0, data);
                }
                None => gl.buffer_data_size(target, size, usage),
            }
            gl.bind_buffer(target, None);
        }

        if let Err(err) = ctx.check_errors("buffer allocation") {
            unsafe { gl.delete_buffer(buffer) };
            return Err(err);
        }

        Ok(Self {
            ctx,
            buffer,
            target,
            buffer_type: desc.buffer_type,
            usage: desc.usage,
            size: desc.size,
            mapped: false,
        })
    }
}

impl Buffer for OpenGLBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn buffer_type(&self) -> BufferType {
        self.buffer_type
    }

    fn usage(&self) -> BufferUsage {
        self.usage
    }

    fn handle(&self) -> u64 {
        handle_of(self.buffer.0)
    }

    fn bind(&self) {
        unsafe { self.ctx.gl.bind_buffer(self.target, Some(self.buffer)) };
    }

    fn unbind(&self) {
        unsafe { self.ctx.gl.bind_buffer(self.target, None) };
    }

    fn bind_base(&self, index: u32) -> Result<()> {
        match self.buffer_type {
            BufferType::Uniform | BufferType::ShaderStorage => {
                unsafe { self.ctx.gl.bind_buffer_base(self.target, index, Some(self.buffer)) };
                Ok(())
            }
            other => {
                engine_warn!("aurora3d::opengl", "bind_base on a {:?} buffer", other);
                Err(Error::InvalidState(format!("{:?} buffers have no indexed binding", other)))
            }
        }
    }

    fn update_data(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        if self.mapped {
            engine_warn!("aurora3d::opengl", "Buffer {} updated while mapped", self.handle());
            return Err(Error::InvalidState("Buffer is mapped".to_string()));
        }
        if let Err(err) = check_update_range(self.size, offset, data.len() as u64) {
            engine_warn!("aurora3d::opengl", "Buffer {} update rejected: {}", self.handle(), err);
            return Err(err);
        }
        if data.is_empty() {
            return Ok(());
        }

        let gl = &self.ctx.gl;
        unsafe {
            gl.bind_buffer(self.target, Some(self.buffer));
            gl.buffer_sub_data_u8_slice(self.target, offset as i32, data);
            gl.bind_buffer(self.target, None);
        }
        self.ctx.check_errors("buffer update")
    }

    fn map(&mut self) -> Result<&mut [u8]> {
        if self.mapped {
            engine_warn!("aurora3d::opengl", "Buffer {} is already mapped", self.handle());
            return Err(Error::InvalidState("Buffer already mapped".to_string()));
        }

        let gl = &self.ctx.gl;
        let ptr = unsafe {
            gl.bind_buffer(self.target, Some(self.buffer));
            gl.map_buffer_range(
                self.target,
                0,
                self.size as i32,
                glow::MAP_READ_BIT | glow::MAP_WRITE_BIT,
            )
        };
        if ptr.is_null() {
            unsafe { gl.bind_buffer(self.target, None) };
            return Err(engine_err!("aurora3d::opengl", "Failed to map buffer {}", handle_of(self.buffer.0)));
        }

        self.mapped = true;
        // The slice borrows self mutably, so it cannot outlive unmap()
        Ok(unsafe { std::slice::from_raw_parts_mut(ptr, self.size as usize) })
    }

    fn unmap(&mut self) -> Result<()> {
        if !self.mapped {
            engine_warn!("aurora3d::opengl", "Buffer {} is not mapped", self.handle());
            return Err(Error::InvalidState("Buffer is not mapped".to_string()));
        }

        let gl = &self.ctx.gl;
        unsafe {
            gl.bind_buffer(self.target, Some(self.buffer));
            gl.unmap_buffer(self.target);
            gl.bind_buffer(self.target, None);
        }
        self.mapped = false;
        self.ctx.check_errors("buffer unmap")
    }

    fn is_mapped(&self) -> bool {
        self.mapped
    }
}

impl Drop for OpenGLBuffer {
    fn drop(&mut self) {
        let gl = &self.ctx.gl;
        unsafe {
            if self.mapped {
                gl.bind_buffer(self.target, Some(self.buffer));
                gl.unmap_buffer(self.target);
            }
            gl.delete_buffer(self.buffer);
        }
    }
}
