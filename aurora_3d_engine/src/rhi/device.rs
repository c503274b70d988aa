/// Device trait, device configuration and the device coordinator

use std::cell::RefCell;
use std::rc::Rc;
use bitflags::bitflags;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use super::buffer::{Buffer, BufferDesc};
use super::mesh::{Mesh, MeshDesc, PrimitiveType};
use super::render_target::{RenderTarget, RenderTargetDesc};
use super::shader::Shader;
use super::texture::{Texture, TextureDesc};

/// Native graphics API behind a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphicsApi {
    OpenGL,
}

bitflags! {
    /// Buffers affected by `Device::clear_with`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// Viewport rectangle in pixels, origin bottom-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Device creation settings
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Enable depth testing (LESS) at initialize
    pub enable_depth_test: bool,
    /// Cull back faces (counter-clockwise front faces)
    pub enable_back_face_culling: bool,
    /// Standard alpha blending
    pub enable_blending: bool,
    /// Default clear color used by render paths
    pub clear_color: [f32; 4],
    /// Name used in log messages
    pub debug_name: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            enable_depth_test: true,
            enable_back_face_culling: false,
            enable_blending: false,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            debug_name: "main".to_string(),
        }
    }
}

/// Per-frame counters, reset by `RenderPath::render`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceStats {
    pub draw_calls: u32,
    pub vertices: u64,
    pub indices: u64,
    pub shader_binds: u32,
    pub texture_binds: u32,
    pub target_binds: u32,
    pub clears: u32,
}

impl DeviceStats {
    /// Account one draw of `mesh`
    pub fn record_draw(&mut self, mesh: &dyn Mesh) {
        self.draw_calls += 1;
        self.vertices += mesh.vertex_count() as u64;
        self.indices += mesh.index_count() as u64;
    }
}

/// Device shared by the application and its render paths
pub type SharedDevice = Rc<RefCell<dyn Device>>;

/// Graphics device: resource factory and owner of the current binding state
///
/// Only the device talks to the native API for global state. Bindings are
/// last-call-wins; nothing is pushed or restored.
///
/// # Lifecycle
///
/// `initialize()` must succeed before any `create_*` call. After
/// `shutdown()` no method other than `initialize()` may be used. Every
/// resource must be dropped before its device.
pub trait Device {
    fn api(&self) -> GraphicsApi;

    fn config(&self) -> &DeviceConfig;

    /// Establish native state; calling again after success is a no-op
    fn initialize(&mut self) -> Result<()>;

    fn is_initialized(&self) -> bool;

    /// Release context state
    fn shutdown(&mut self);

    /// Flush queued work. Buffer swapping belongs to the windowing layer.
    fn present(&mut self);

    // ===== RESOURCE CREATION =====

    /// Compile and link a program
    ///
    /// On failure the error carries the native info log and no program survives.
    fn create_shader(&mut self, vertex_source: &str, fragment_source: &str) -> Result<Rc<dyn Shader>>;

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<Rc<dyn Texture>>;

    fn create_mesh(&mut self, desc: &MeshDesc) -> Result<Rc<dyn Mesh>>;

    fn create_buffer(&mut self, desc: &BufferDesc) -> Result<Box<dyn Buffer>>;

    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<Rc<dyn RenderTarget>>;

    // ===== FRAME STATE =====

    /// Clear color and depth of the bound target
    fn clear(&mut self, color: [f32; 4]) {
        self.clear_with(ClearFlags::COLOR | ClearFlags::DEPTH, color, 1.0, 0);
    }

    fn clear_with(&mut self, flags: ClearFlags, color: [f32; 4], depth: f32, stencil: i32);

    fn set_viewport(&mut self, viewport: Viewport);

    fn bind_shader(&mut self, shader: &dyn Shader);

    fn bind_texture(&mut self, texture: &dyn Texture, slot: u32);

    /// Bind an off-screen target, or the default framebuffer with `None`
    ///
    /// Incomplete targets are rejected and the previous binding is kept.
    fn bind_render_target(&mut self, target: Option<&dyn RenderTarget>) -> Result<()>;

    fn draw_mesh(&mut self, mesh: &dyn Mesh) {
        self.draw_mesh_with(mesh, PrimitiveType::Triangles);
    }

    fn draw_mesh_with(&mut self, mesh: &dyn Mesh, primitive: PrimitiveType);

    // ===== QUERIES =====

    /// Id of the program bound through `bind_shader`
    fn bound_shader(&self) -> Option<u64>;

    /// Handle of the bound render target (`None` for the default framebuffer)
    fn bound_render_target(&self) -> Option<u64>;

    fn viewport(&self) -> Viewport;

    fn stats(&self) -> DeviceStats;

    fn reset_stats(&mut self);
}

/// Build a device for a given configuration
pub type DeviceFactory = Box<dyn Fn(&DeviceConfig) -> Result<SharedDevice>>;

/// Explicit registry of device backends keyed by graphics API
///
/// Owned by the application entry point; backends register a factory
/// and the application asks for a device by API.
///
/// # Example
///
/// ```no_run
/// use aurora_3d_engine::aurora3d::render::{DeviceConfig, DeviceCoordinator, GraphicsApi};
///
/// let mut coordinator = DeviceCoordinator::new();
/// // backend crates call coordinator.register(GraphicsApi::OpenGL, ...)
/// let device = coordinator.create_device(GraphicsApi::OpenGL, &DeviceConfig::default());
/// assert!(device.is_err());
/// ```
#[derive(Default)]
pub struct DeviceCoordinator {
    factories: FxHashMap<GraphicsApi, DeviceFactory>,
}

impl DeviceCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the factory for `api`
    pub fn register(&mut self, api: GraphicsApi, factory: DeviceFactory) {
        if self.factories.insert(api, factory).is_some() {
            crate::engine_warn!("aurora3d::DeviceCoordinator", "Replacing device factory for {:?}", api);
        } else {
            crate::engine_debug!("aurora3d::DeviceCoordinator", "Registered device factory for {:?}", api);
        }
    }

    pub fn is_registered(&self, api: GraphicsApi) -> bool {
        self.factories.contains_key(&api)
    }

    pub fn available_apis(&self) -> Vec<GraphicsApi> {
        self.factories.keys().copied().collect()
    }

    /// Create and initialize a device
    pub fn create_device(&self, api: GraphicsApi, config: &DeviceConfig) -> Result<SharedDevice> {
        let factory = self.factories.get(&api).ok_or_else(|| {
            Error::InitializationFailed(format!("No device backend registered for {:?}", api))
        })?;

        let device = factory(config)?;
        device.borrow_mut().initialize()?;

        crate::engine_info!("aurora3d::DeviceCoordinator", "Created {:?} device '{}'", api, config.debug_name);
        Ok(device)
    }
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;
