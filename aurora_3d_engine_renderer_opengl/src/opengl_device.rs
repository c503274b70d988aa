/// OpenGLDevice - OpenGL implementation of the Device trait
///
/// Owns the shared `GlContext`, applies the global pipeline state from
/// `DeviceConfig` at initialize and tracks the current bindings so the
/// render path can query them.

use std::rc::Rc;
use glow::HasContext;
use rustc_hash::FxHashMap;
use aurora_3d_engine::aurora3d::{
    Error,
    Result,
    render::{
        Buffer, BufferDesc, ClearFlags, Device, DeviceConfig, DeviceStats, GraphicsApi, Mesh,
        MeshDesc, PrimitiveType, RenderTarget, RenderTargetDesc, Shader, Texture, TextureDesc,
        Viewport,
    },
};
use aurora_3d_engine::{engine_bail, engine_debug, engine_error, engine_info, engine_warn};
use crate::opengl_buffer::OpenGLBuffer;
use crate::opengl_context::{name_of, GlContext};
use crate::opengl_format::{clear_mask, is_supported_version, MIN_GLES_VERSION, MIN_GL_VERSION};
use crate::opengl_mesh::OpenGLMesh;
use crate::opengl_render_target::OpenGLRenderTarget;
use crate::opengl_shader::OpenGLShader;
use crate::opengl_texture::OpenGLTexture;

pub struct OpenGLDevice {
    ctx: Rc<GlContext>,
    config: DeviceConfig,
    initialized: bool,
    stats: DeviceStats,
    viewport: Viewport,
    bound_shader: Option<u64>,
    bound_target: Option<u64>,
    /// Texture handle per unit, as last bound through `bind_texture`
    bound_textures: FxHashMap<u32, u64>,
}

impl OpenGLDevice {
    /// Wrap an already loaded GL context
    ///
    /// The context must be current on the calling thread for the whole
    /// lifetime of the device and of every resource it creates.
    pub fn new(gl: glow::Context, config: DeviceConfig) -> Self {
        let ctx = Rc::new(GlContext::new(gl, config.debug_name.clone()));
        Self {
            ctx,
            config,
            initialized: false,
            stats: DeviceStats::default(),
            viewport: Viewport::default(),
            bound_shader: None,
            bound_target: None,
            bound_textures: FxHashMap::default(),
        }
    }

    /// Load GL entry points through `loader` and wrap them
    ///
    /// # Safety
    ///
    /// `loader` must return function pointers of the GL context that is
    /// current on the calling thread.
    pub unsafe fn from_loader<F>(loader: F, config: DeviceConfig) -> Self
    where
        F: FnMut(&str) -> *const std::ffi::c_void,
    {
        Self::new(glow::Context::from_loader_function(loader), config)
    }

    /// Shared context handed to every resource
    pub fn context(&self) -> &Rc<GlContext> {
        &self.ctx
    }

    /// Texture handle bound to `slot` through this device
    pub fn bound_texture(&self, slot: u32) -> Option<u64> {
        self.bound_textures.get(&slot).copied()
    }

    fn ensure_initialized(&self, operation: &str) -> Result<()> {
        if !self.initialized {
            engine_error!("aurora3d::opengl", "[{}] {} called before initialize()",
                self.config.debug_name, operation);
            return Err(Error::InitializationFailed(format!(
                "{} requires an initialized device",
                operation
            )));
        }
        Ok(())
    }

    /// Log creation failures once, at the device boundary
    fn report<T>(&self, what: &str, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            engine_error!("aurora3d::opengl", "[{}] Failed to create {}: {}",
                self.config.debug_name, what, err);
        }
        result
    }

    fn apply_pipeline_state(&self) {
        let gl = &self.ctx.gl;
        unsafe {
            if self.config.enable_depth_test {
                gl.enable(glow::DEPTH_TEST);
                gl.depth_func(glow::LESS);
            } else {
                gl.disable(glow::DEPTH_TEST);
            }

            if self.config.enable_back_face_culling {
                gl.enable(glow::CULL_FACE);
                gl.cull_face(glow::BACK);
                gl.front_face(glow::CCW);
            } else {
                gl.disable(glow::CULL_FACE);
            }

            if self.config.enable_blending {
                gl.enable(glow::BLEND);
                gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            } else {
                gl.disable(glow::BLEND);
            }
        }
    }
}

impl Device for OpenGLDevice {
    fn api(&self) -> GraphicsApi {
        GraphicsApi::OpenGL
    }

    fn config(&self) -> &DeviceConfig {
        &self.config
    }

    fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        let version = self.ctx.gl.version();
        if !is_supported_version(version.major, version.minor, version.is_embedded) {
            let (major, minor) = if version.is_embedded { MIN_GLES_VERSION } else { MIN_GL_VERSION };
            let api = if version.is_embedded { "OpenGL ES" } else { "OpenGL" };
            engine_error!("aurora3d::opengl", "[{}] {} {}.{} is too old (need {}.{})",
                self.config.debug_name, api, version.major, version.minor, major, minor);
            return Err(Error::InitializationFailed(format!(
                "{} {}.{} found, {}.{} required",
                api, version.major, version.minor, major, minor
            )));
        }

        self.apply_pipeline_state();
        // Clear any error left behind by context creation
        if let Err(err) = self.ctx.check_errors("device initialization") {
            engine_warn!("aurora3d::opengl", "[{}] {}", self.config.debug_name, err);
        }

        let (version_string, renderer) = unsafe {
            (
                self.ctx.gl.get_parameter_string(glow::VERSION),
                self.ctx.gl.get_parameter_string(glow::RENDERER),
            )
        };
        engine_info!("aurora3d::opengl", "[{}] OpenGL device ready: {} ({})",
            self.config.debug_name, version_string, renderer);

        self.initialized = true;
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }

        let gl = &self.ctx.gl;
        unsafe {
            gl.use_program(None);
            gl.bind_vertex_array(None);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
        self.ctx.framebuffer.set(None);
        self.bound_shader = None;
        self.bound_target = None;
        self.bound_textures.clear();
        self.initialized = false;

        engine_info!("aurora3d::opengl", "[{}] OpenGL device shut down", self.config.debug_name);
    }

    fn present(&mut self) {
        unsafe { self.ctx.gl.flush() };
    }

    // ===== RESOURCE CREATION =====

    fn create_shader(&mut self, vertex_source: &str, fragment_source: &str) -> Result<Rc<dyn Shader>> {
        self.ensure_initialized("create_shader")?;
        let shader = OpenGLShader::new(self.ctx.clone(), vertex_source, fragment_source)?;
        Ok(Rc::new(shader))
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<Rc<dyn Texture>> {
        self.ensure_initialized("create_texture")?;
        let texture = self.report("texture", OpenGLTexture::new(self.ctx.clone(), desc))?;
        engine_debug!("aurora3d::opengl", "[{}] Created {}x{} {:?} texture",
            self.config.debug_name, desc.width, desc.height, desc.format);
        Ok(Rc::new(texture))
    }

    fn create_mesh(&mut self, desc: &MeshDesc) -> Result<Rc<dyn Mesh>> {
        self.ensure_initialized("create_mesh")?;
        let mesh = self.report("mesh", OpenGLMesh::new(self.ctx.clone(), desc))?;
        engine_debug!("aurora3d::opengl", "[{}] Created mesh ({} vertices, {} indices)",
            self.config.debug_name, mesh.vertex_count(), mesh.index_count());
        Ok(Rc::new(mesh))
    }

    fn create_buffer(&mut self, desc: &BufferDesc) -> Result<Box<dyn Buffer>> {
        self.ensure_initialized("create_buffer")?;
        let buffer = self.report("buffer", OpenGLBuffer::new(self.ctx.clone(), desc))?;
        Ok(Box::new(buffer))
    }

    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<Rc<dyn RenderTarget>> {
        self.ensure_initialized("create_render_target")?;
        let target = self.report("render target", OpenGLRenderTarget::new(self.ctx.clone(), desc))?;
        Ok(Rc::new(target))
    }

    // ===== FRAME STATE =====

    fn clear_with(&mut self, flags: ClearFlags, color: [f32; 4], depth: f32, stencil: i32) {
        let mask = clear_mask(flags);
        if mask == 0 {
            return;
        }

        let gl = &self.ctx.gl;
        unsafe {
            if flags.contains(ClearFlags::COLOR) {
                gl.clear_color(color[0], color[1], color[2], color[3]);
            }
            if flags.contains(ClearFlags::DEPTH) {
                // Depth writes must be on for the clear to reach the buffer
                gl.depth_mask(true);
                gl.clear_depth_f32(depth);
            }
            if flags.contains(ClearFlags::STENCIL) {
                gl.clear_stencil(stencil);
            }
            gl.clear(mask);
        }
        self.stats.clears += 1;
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        unsafe {
            self.ctx.gl.viewport(
                viewport.x as i32,
                viewport.y as i32,
                viewport.width as i32,
                viewport.height as i32,
            );
        }
        self.viewport = viewport;
    }

    fn bind_shader(&mut self, shader: &dyn Shader) {
        shader.bind();
        self.bound_shader = Some(shader.id());
        self.stats.shader_binds += 1;
    }

    fn bind_texture(&mut self, texture: &dyn Texture, slot: u32) {
        texture.bind(slot);
        self.bound_textures.insert(slot, texture.handle());
        self.stats.texture_binds += 1;
    }

    fn bind_render_target(&mut self, target: Option<&dyn RenderTarget>) -> Result<()> {
        let framebuffer = match target {
            Some(target) => {
                if !target.is_complete() {
                    engine_warn!("aurora3d::opengl", "[{}] Render target {} is not complete",
                        self.config.debug_name, target.handle());
                    return Err(Error::InvalidResource(format!(
                        "Render target {} is not complete",
                        target.handle()
                    )));
                }
                match name_of(target.handle()) {
                    Some(name) => Some(glow::NativeFramebuffer(name)),
                    None => engine_bail!("aurora3d::opengl",
                        "Render target handle {} is not an OpenGL framebuffer", target.handle()),
                }
            }
            None => None,
        };

        unsafe { self.ctx.gl.bind_framebuffer(glow::FRAMEBUFFER, framebuffer) };
        self.ctx.framebuffer.set(framebuffer);
        self.bound_target = target.map(|t| t.handle());
        self.stats.target_binds += 1;
        Ok(())
    }

    fn draw_mesh_with(&mut self, mesh: &dyn Mesh, primitive: PrimitiveType) {
        mesh.draw_with(primitive);
        self.stats.record_draw(mesh);
    }

    // ===== QUERIES =====

    fn bound_shader(&self) -> Option<u64> {
        self.bound_shader
    }

    fn bound_render_target(&self) -> Option<u64> {
        self.bound_target
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn stats(&self) -> DeviceStats {
        self.stats
    }

    fn reset_stats(&mut self) {
        self.stats = DeviceStats::default();
    }
}

impl Drop for OpenGLDevice {
    fn drop(&mut self) {
        self.shutdown();
    }
}
