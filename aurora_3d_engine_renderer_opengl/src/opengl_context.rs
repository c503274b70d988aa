/// GlContext - Shared OpenGL function table for all GL objects
///
/// Every resource keeps an `Rc<GlContext>` so it can release its native
/// object on drop, even after the device itself went away.

use std::cell::Cell;
use std::num::NonZeroU32;
use glow::HasContext;
use aurora_3d_engine::aurora3d::{Error, Result};
use aurora_3d_engine::engine_warn;
use crate::opengl_format::gl_error_name;

pub struct GlContext {
    /// Loaded GL entry points
    pub gl: glow::Context,
    /// Device name used in log messages
    pub debug_name: String,
    /// Framebuffer bound by the device (`None` = default framebuffer)
    ///
    /// Render targets rebind it after editing their own attachments.
    pub(crate) framebuffer: Cell<Option<glow::NativeFramebuffer>>,
}

impl GlContext {
    pub fn new(gl: glow::Context, debug_name: String) -> Self {
        Self {
            gl,
            debug_name,
            framebuffer: Cell::new(None),
        }
    }

    /// Bind the framebuffer the device considers current
    pub(crate) fn restore_framebuffer(&self) {
        unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, self.framebuffer.get()) };
    }

    /// Drain the GL error queue and translate the first error
    ///
    /// `GL_OUT_OF_MEMORY` becomes `Error::OutOfMemory`, anything else a
    /// `BackendError` naming `operation`.
    pub fn check_errors(&self, operation: &str) -> Result<()> {
        let mut first = None;
        loop {
            let code = unsafe { self.gl.get_error() };
            if code == glow::NO_ERROR {
                break;
            }
            if first.is_none() {
                first = Some(code);
            } else {
                engine_warn!("aurora3d::opengl", "[{}] additional GL error during {}: {}",
                    self.debug_name, operation, gl_error_name(code));
            }
        }

        match first {
            None => Ok(()),
            Some(glow::OUT_OF_MEMORY) => Err(Error::OutOfMemory),
            Some(code) => Err(Error::BackendError(format!(
                "{} failed: {} (0x{:04X})",
                operation,
                gl_error_name(code),
                code
            ))),
        }
    }
}

/// Opaque engine handle of a native GL object name
pub(crate) fn handle_of(name: NonZeroU32) -> u64 {
    name.get() as u64
}

/// Inverse of `handle_of`; `None` for 0 or out-of-range handles
pub(crate) fn name_of(handle: u64) -> Option<NonZeroU32> {
    u32::try_from(handle).ok().and_then(NonZeroU32::new)
}
