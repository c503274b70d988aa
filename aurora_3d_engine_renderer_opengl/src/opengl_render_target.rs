/// RenderTarget - OpenGL framebuffer object
///
/// Attachment bookkeeping lives in the shared `AttachmentSet`; this type
/// mirrors every change into the framebuffer and keeps the draw buffer
/// list in sync with the color attachments.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use glow::HasContext;
use aurora_3d_engine::aurora3d::{
    Error,
    Result,
    render::{Attachment, AttachmentSet, AttachmentType, RenderTarget, RenderTargetDesc, Texture},
};
use aurora_3d_engine::{engine_debug, engine_err, engine_warn};
use crate::opengl_context::{handle_of, name_of, GlContext};
use crate::opengl_format::{attachment_point, framebuffer_status_name};

pub struct OpenGLRenderTarget {
    ctx: Rc<GlContext>,
    pub(crate) framebuffer: glow::NativeFramebuffer,
    width: u32,
    height: u32,
    samples: u32,
    depth_required: Cell<bool>,
    attachments: RefCell<AttachmentSet>,
}

impl OpenGLRenderTarget {
    pub(crate) fn new(ctx: Rc<GlContext>, desc: &RenderTargetDesc) -> Result<Self> {
        desc.validate()?;

        let framebuffer = unsafe { ctx.gl.create_framebuffer() }
            .map_err(|e| engine_err!("aurora3d::opengl", "Failed to create framebuffer: {}", e))?;

        engine_debug!("aurora3d::opengl", "[{}] Created framebuffer {} ({}x{}, {} samples)",
            ctx.debug_name, handle_of(framebuffer.0), desc.width, desc.height, desc.samples);

        Ok(Self {
            ctx,
            framebuffer,
            width: desc.width,
            height: desc.height,
            samples: desc.samples,
            depth_required: Cell::new(desc.depth_required),
            attachments: RefCell::new(AttachmentSet::new()),
        })
    }

    /// Point one attachment slot of the framebuffer at `texture` (or nothing)
    ///
    /// Expects the framebuffer to be bound.
    unsafe fn write_attachment(&self, point: u32, texture: Option<glow::NativeTexture>, mip_level: u32, layer: u32) {
        let gl = &self.ctx.gl;
        if layer > 0 {
            gl.framebuffer_texture_layer(glow::FRAMEBUFFER, point, texture, mip_level as i32, layer as i32);
        } else {
            gl.framebuffer_texture_2d(glow::FRAMEBUFFER, point, glow::TEXTURE_2D, texture, mip_level as i32);
        }
    }

    /// Enable one draw buffer per color attachment
    ///
    /// Expects the framebuffer to be bound.
    unsafe fn sync_draw_buffers(&self, color_count: usize) {
        let gl = &self.ctx.gl;
        if color_count == 0 {
            gl.draw_buffer(glow::NONE);
            gl.read_buffer(glow::NONE);
        } else {
            let buffers: Vec<u32> = (0..color_count as u32)
                .map(|index| glow::COLOR_ATTACHMENT0 + index)
                .collect();
            gl.draw_buffers(&buffers);
            gl.read_buffer(glow::COLOR_ATTACHMENT0);
        }
    }
}

impl RenderTarget for OpenGLRenderTarget {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn sample_count(&self) -> u32 {
        self.samples
    }

    fn handle(&self) -> u64 {
        handle_of(self.framebuffer.0)
    }

    fn attach_texture(
        &self,
        attachment_type: AttachmentType,
        texture: Rc<dyn Texture>,
        mip_level: u32,
        layer: u32,
    ) -> Result<()> {
        let native = name_of(texture.handle()).map(glow::NativeTexture).ok_or_else(|| {
            Error::InvalidResource(format!(
                "Texture handle {} is not an OpenGL texture",
                texture.handle()
            ))
        })?;

        let mut attachments = self.attachments.borrow_mut();
        let color_index = attachments
            .attach(attachment_type, Attachment { texture, mip_level, layer })
            .map_err(|err| {
                engine_warn!("aurora3d::opengl", "Framebuffer {} rejected attachment: {}", self.handle(), err);
                err
            })?;

        let point = attachment_point(attachment_type, color_index.unwrap_or(0) as u32);
        unsafe {
            self.ctx.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.framebuffer));
            self.write_attachment(point, Some(native), mip_level, layer);
            if attachment_type == AttachmentType::Color {
                self.sync_draw_buffers(attachments.colors().len());
            }
        }
        self.ctx.restore_framebuffer();
        self.ctx.check_errors("framebuffer attach")
    }

    fn detach_texture(&self, attachment_type: AttachmentType) {
        let mut attachments = self.attachments.borrow_mut();
        let removed = attachments.detach(attachment_type);
        if removed == 0 {
            return;
        }

        unsafe {
            self.ctx.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.framebuffer));
            match attachment_type {
                AttachmentType::Color => {
                    for index in 0..removed as u32 {
                        self.write_attachment(attachment_point(AttachmentType::Color, index), None, 0, 0);
                    }
                    self.sync_draw_buffers(0);
                }
                other => self.write_attachment(attachment_point(other, 0), None, 0, 0),
            }
        }
        self.ctx.restore_framebuffer();
    }

    fn attachment(&self, attachment_type: AttachmentType) -> Option<Rc<dyn Texture>> {
        self.attachments
            .borrow()
            .get(attachment_type)
            .map(|a| a.texture.clone())
    }

    fn color_attachments(&self) -> Vec<Rc<dyn Texture>> {
        self.attachments
            .borrow()
            .colors()
            .iter()
            .map(|a| a.texture.clone())
            .collect()
    }

    fn set_depth_required(&self, required: bool) {
        self.depth_required.set(required);
    }

    fn depth_required(&self) -> bool {
        self.depth_required.get()
    }

    fn is_complete(&self) -> bool {
        let attachments = self.attachments.borrow();
        if !attachments.is_complete(self.width, self.height, self.depth_required.get()) {
            return false;
        }

        let status = unsafe {
            self.ctx.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.framebuffer));
            self.ctx.gl.check_framebuffer_status(glow::FRAMEBUFFER)
        };
        self.ctx.restore_framebuffer();

        if status != glow::FRAMEBUFFER_COMPLETE {
            engine_debug!("aurora3d::opengl", "Framebuffer {} status: {}",
                self.handle(), framebuffer_status_name(status));
            return false;
        }
        true
    }
}

impl Drop for OpenGLRenderTarget {
    fn drop(&mut self) {
        if self.ctx.framebuffer.get() == Some(self.framebuffer) {
            self.ctx.framebuffer.set(None);
            self.ctx.restore_framebuffer();
        }
        unsafe { self.ctx.gl.delete_framebuffer(self.framebuffer) };
    }
}
