/// Texture - OpenGL implementation of the Texture trait

use std::cell::Cell;
use std::rc::Rc;
use glow::HasContext;
use aurora_3d_engine::aurora3d::{
    Error,
    Result,
    render::{check_pixel_data, Format, Texture, TextureDesc, TextureFilter, TextureWrap},
};
use aurora_3d_engine::{engine_err, engine_warn};
use crate::opengl_context::{handle_of, GlContext};
use crate::opengl_format::{mag_filter, min_filter, texture_format, wrap_mode, GlTextureFormat};

/// OpenGL 2D texture
pub struct OpenGLTexture {
    ctx: Rc<GlContext>,
    pub(crate) texture: glow::NativeTexture,
    format: Format,
    gl_format: GlTextureFormat,
    width: Cell<u32>,
    height: Cell<u32>,
    filter: Cell<(TextureFilter, TextureFilter)>,
    wrap: Cell<(TextureWrap, TextureWrap)>,
    /// A mip chain was requested; regenerated after every upload
    mipmapped: bool,
}

impl OpenGLTexture {
    pub(crate) fn new(ctx: Rc<GlContext>, desc: &TextureDesc) -> Result<Self> {
        desc.validate()?;

        let gl_format = texture_format(desc.format).ok_or_else(|| {
            engine_warn!("aurora3d::opengl", "Texture format {:?} is not supported", desc.format);
            Error::InvalidResource(format!("Texture format {:?} is not supported by the OpenGL backend", desc.format))
        })?;
        // Depth/stencil textures have no mip chain
        let mipmapped = desc.generate_mipmaps && desc.format.is_color();

        let texture = unsafe { ctx.gl.create_texture() }
            .map_err(|e| engine_err!("aurora3d::opengl", "Failed to create texture: {}", e))?;

        let result = Self {
            ctx,
            texture,
            format: desc.format,
            gl_format,
            width: Cell::new(desc.width),
            height: Cell::new(desc.height),
            filter: Cell::new((desc.min_filter, desc.mag_filter)),
            wrap: Cell::new((desc.wrap_s, desc.wrap_t)),
            mipmapped,
        };

        // Drop deletes the texture if any step fails
        result.upload(desc.data.as_deref())?;
        result.apply_sampling();
        result.ctx.check_errors("texture creation")?;
        Ok(result)
    }

    /// Re-specify level 0 with the current size and regenerate mips
    fn upload(&self, pixels: Option<&[u8]>) -> Result<()> {
        let gl = &self.ctx.gl;
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                self.gl_format.internal_format,
                self.width.get() as i32,
                self.height.get() as i32,
                0,
                self.gl_format.format,
                self.gl_format.data_type,
                pixels,
            );
            if self.mipmapped && pixels.is_some() {
                gl.generate_mipmap(glow::TEXTURE_2D);
            }
            gl.bind_texture(glow::TEXTURE_2D, None);
        }
        self.ctx.check_errors("texture upload")
    }

    fn apply_sampling(&self) {
        let (min, mag) = self.filter.get();
        let (wrap_s, wrap_t) = self.wrap.get();
        let gl = &self.ctx.gl;
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, min_filter(min, self.mipmapped));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, mag_filter(mag));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap_mode(wrap_s));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap_mode(wrap_t));
            gl.bind_texture(glow::TEXTURE_2D, None);
        }
    }
}

impl Texture for OpenGLTexture {
    fn width(&self) -> u32 {
        self.width.get()
    }

    fn height(&self) -> u32 {
        self.height.get()
    }

    fn format(&self) -> Format {
        self.format
    }

    fn handle(&self) -> u64 {
        handle_of(self.texture.0)
    }

    fn bind(&self, slot: u32) {
        unsafe {
            self.ctx.gl.active_texture(glow::TEXTURE0 + slot);
            self.ctx.gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
        }
    }

    fn unbind(&self) {
        unsafe { self.ctx.gl.bind_texture(glow::TEXTURE_2D, None) };
    }

    fn update_data(&self, data: &[u8]) -> Result<()> {
        if let Err(err) = check_pixel_data(self.width(), self.height(), self.format, data) {
            engine_warn!("aurora3d::opengl", "Texture {} update rejected: {}", self.handle(), err);
            return Err(err);
        }
        self.upload(Some(data))
    }

    fn resize(&self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidResource(format!(
                "Texture dimensions must be non-zero (got {}x{})",
                width, height
            )));
        }
        self.width.set(width);
        self.height.set(height);
        self.upload(None)
    }

    fn set_filter(&self, min: TextureFilter, mag: TextureFilter) {
        self.filter.set((min, mag));
        self.apply_sampling();
    }

    fn set_wrap(&self, wrap_s: TextureWrap, wrap_t: TextureWrap) {
        self.wrap.set((wrap_s, wrap_t));
        self.apply_sampling();
    }

    fn filter(&self) -> (TextureFilter, TextureFilter) {
        self.filter.get()
    }

    fn wrap(&self) -> (TextureWrap, TextureWrap) {
        self.wrap.get()
    }
}

impl Drop for OpenGLTexture {
    fn drop(&mut self) {
        unsafe { self.ctx.gl.delete_texture(self.texture) };
    }
}
