/// Mock device for unit tests (no GPU required)
///
/// Every resource records what it was asked to do so pipeline tests can
/// assert on draw calls, shader binds and uniform uploads.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::material::UniformValue;
use super::buffer::{check_update_range, Buffer, BufferDesc, BufferType, BufferUsage};
use super::device::{ClearFlags, Device, DeviceConfig, DeviceStats, GraphicsApi, Viewport};
use super::format::Format;
use super::mesh::{Mesh, MeshDesc, PrimitiveType, VertexLayout};
use super::render_target::{Attachment, AttachmentSet, AttachmentType, RenderTarget, RenderTargetDesc};
use super::shader::Shader;
use super::texture::{check_pixel_data, Texture, TextureDesc, TextureFilter, TextureWrap};

// ============================================================================
// Mock Buffer
// ============================================================================

pub struct MockBuffer {
    pub handle: u64,
    pub buffer_type: BufferType,
    pub usage: BufferUsage,
    pub contents: Vec<u8>,
    pub mapped: bool,
}

impl MockBuffer {
    pub fn new(handle: u64, desc: &BufferDesc) -> Self {
        let mut contents = vec![0u8; desc.size as usize];
        if let Some(data) = &desc.data {
            contents[..data.len()].copy_from_slice(data);
        }
        Self {
            handle,
            buffer_type: desc.buffer_type,
            usage: desc.usage,
            contents,
            mapped: false,
        }
    }
}

impl Buffer for MockBuffer {
    fn size(&self) -> u64 {
        self.contents.len() as u64
    }

    fn buffer_type(&self) -> BufferType {
        self.buffer_type
    }

    fn usage(&self) -> BufferUsage {
        self.usage
    }

    fn handle(&self) -> u64 {
        self.handle
    }

    fn bind(&self) {}

    fn unbind(&self) {}

    fn bind_base(&self, _index: u32) -> Result<()> {
        match self.buffer_type {
            BufferType::Uniform | BufferType::ShaderStorage => Ok(()),
            other => Err(Error::InvalidState(format!("{:?} buffers have no indexed binding", other))),
        }
    }

    fn update_data(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        if self.mapped {
            return Err(Error::InvalidState("Buffer is mapped".to_string()));
        }
        check_update_range(self.size(), offset, data.len() as u64)?;
        let start = offset as usize;
        self.contents[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn map(&mut self) -> Result<&mut [u8]> {
        if self.mapped {
            return Err(Error::InvalidState("Buffer already mapped".to_string()));
        }
        self.mapped = true;
        Ok(&mut self.contents)
    }

    fn unmap(&mut self) -> Result<()> {
        if !self.mapped {
            return Err(Error::InvalidState("Buffer is not mapped".to_string()));
        }
        self.mapped = false;
        Ok(())
    }

    fn is_mapped(&self) -> bool {
        self.mapped
    }
}

// ============================================================================
// Mock Texture
// ============================================================================

pub struct MockTexture {
    pub handle: u64,
    pub format: Format,
    pub width: Cell<u32>,
    pub height: Cell<u32>,
    pub filter: Cell<(TextureFilter, TextureFilter)>,
    pub wrap: Cell<(TextureWrap, TextureWrap)>,
    pub pixels: RefCell<Option<Vec<u8>>>,
    pub bound_slot: Cell<Option<u32>>,
}

impl MockTexture {
    pub fn new(handle: u64, width: u32, height: u32, format: Format) -> Self {
        Self {
            handle,
            format,
            width: Cell::new(width),
            height: Cell::new(height),
            filter: Cell::new((TextureFilter::Linear, TextureFilter::Linear)),
            wrap: Cell::new((TextureWrap::Repeat, TextureWrap::Repeat)),
            pixels: RefCell::new(None),
            bound_slot: Cell::new(None),
        }
    }
}

impl Texture for MockTexture {
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
        self.handle
    }

    fn bind(&self, slot: u32) {
        self.bound_slot.set(Some(slot));
    }

    fn unbind(&self) {
        self.bound_slot.set(None);
    }

    fn update_data(&self, data: &[u8]) -> Result<()> {
        check_pixel_data(self.width(), self.height(), self.format, data)?;
        *self.pixels.borrow_mut() = Some(data.to_vec());
        Ok(())
    }

    fn resize(&self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidResource("Texture dimensions must be non-zero".to_string()));
        }
        self.width.set(width);
        self.height.set(height);
        *self.pixels.borrow_mut() = None;
        Ok(())
    }

    fn set_filter(&self, min: TextureFilter, mag: TextureFilter) {
        self.filter.set((min, mag));
    }

    fn set_wrap(&self, wrap_s: TextureWrap, wrap_t: TextureWrap) {
        self.wrap.set((wrap_s, wrap_t));
    }

    fn filter(&self) -> (TextureFilter, TextureFilter) {
        self.filter.get()
    }

    fn wrap(&self) -> (TextureWrap, TextureWrap) {
        self.wrap.get()
    }
}

// ============================================================================
// Mock Shader
// ============================================================================

pub struct MockShader {
    pub id: u64,
    /// Declared uniforms; `None` accepts every name
    pub declared: Option<Vec<String>>,
    pub bind_count: Cell<u32>,
    /// Last value written per uniform name
    pub values: RefCell<FxHashMap<String, UniformValue>>,
    /// Uniform names in write order
    pub writes: RefCell<Vec<String>>,
}

impl MockShader {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            declared: None,
            bind_count: Cell::new(0),
            values: RefCell::new(FxHashMap::default()),
            writes: RefCell::new(Vec::new()),
        }
    }

    pub fn value(&self, name: &str) -> Option<UniformValue> {
        self.values.borrow().get(name).copied()
    }

    fn record(&self, name: &str, value: UniformValue) {
        if !self.has_uniform(name) {
            return;
        }
        self.values.borrow_mut().insert(name.to_string(), value);
        self.writes.borrow_mut().push(name.to_string());
    }
}

impl Shader for MockShader {
    fn id(&self) -> u64 {
        self.id
    }

    fn bind(&self) {
        self.bind_count.set(self.bind_count.get() + 1);
    }

    fn has_uniform(&self, name: &str) -> bool {
        self.declared
            .as_ref()
            .map_or(true, |names| names.iter().any(|n| n == name))
    }

    fn set_bool(&self, name: &str, value: bool) {
        self.record(name, UniformValue::Bool(value));
    }

    fn set_int(&self, name: &str, value: i32) {
        self.record(name, UniformValue::Int(value));
    }

    fn set_float(&self, name: &str, value: f32) {
        self.record(name, UniformValue::Float(value));
    }

    fn set_vec2(&self, name: &str, value: Vec2) {
        self.record(name, UniformValue::Vec2(value));
    }

    fn set_vec3(&self, name: &str, value: Vec3) {
        self.record(name, UniformValue::Vec3(value));
    }

    fn set_vec4(&self, name: &str, value: Vec4) {
        self.record(name, UniformValue::Vec4(value));
    }

    fn set_mat2(&self, name: &str, value: &Mat2) {
        self.record(name, UniformValue::Mat2(*value));
    }

    fn set_mat3(&self, name: &str, value: &Mat3) {
        self.record(name, UniformValue::Mat3(*value));
    }

    fn set_mat4(&self, name: &str, value: &Mat4) {
        self.record(name, UniformValue::Mat4(*value));
    }
}

// ============================================================================
// Mock Mesh
// ============================================================================

pub struct MockMesh {
    pub handle: u64,
    pub vertex_count: u32,
    pub index_count: u32,
    pub has_indices: bool,
    pub layout: VertexLayout,
    pub draws: RefCell<Vec<PrimitiveType>>,
}

impl MockMesh {
    pub fn new(handle: u64, desc: &MeshDesc) -> Self {
        Self {
            handle,
            vertex_count: desc.vertex_count(),
            index_count: desc.index_count(),
            has_indices: desc.indices.is_some(),
            layout: desc.layout.clone(),
            draws: RefCell::new(Vec::new()),
        }
    }
}

impl Mesh for MockMesh {
    fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    fn index_count(&self) -> u32 {
        self.index_count
    }

    fn has_indices(&self) -> bool {
        self.has_indices
    }

    fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    fn handle(&self) -> u64 {
        self.handle
    }

    fn bind(&self) {}

    fn unbind(&self) {}

    fn draw_with(&self, primitive: PrimitiveType) {
        self.draws.borrow_mut().push(primitive);
    }
}

// ============================================================================
// Mock Render Target
// ============================================================================

pub struct MockRenderTarget {
    pub handle: u64,
    pub width: u32,
    pub height: u32,
    pub samples: u32,
    pub depth_required: Cell<bool>,
    pub attachments: RefCell<AttachmentSet>,
}

impl MockRenderTarget {
    pub fn new(handle: u64, desc: &RenderTargetDesc) -> Self {
        Self {
            handle,
            width: desc.width,
            height: desc.height,
            samples: desc.samples,
            depth_required: Cell::new(desc.depth_required),
            attachments: RefCell::new(AttachmentSet::new()),
        }
    }
}

impl RenderTarget for MockRenderTarget {
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
        self.handle
    }

    fn attach_texture(
        &self,
        attachment_type: AttachmentType,
        texture: Rc<dyn Texture>,
        mip_level: u32,
        layer: u32,
    ) -> Result<()> {
        self.attachments
            .borrow_mut()
            .attach(attachment_type, Attachment { texture, mip_level, layer })
            .map(|_| ())
    }

    fn detach_texture(&self, attachment_type: AttachmentType) {
        self.attachments.borrow_mut().detach(attachment_type);
    }

    fn attachment(&self, attachment_type: AttachmentType) -> Option<Rc<dyn Texture>> {
        self.attachments.borrow().get(attachment_type).map(|a| a.texture.clone())
    }

    fn color_attachments(&self) -> Vec<Rc<dyn Texture>> {
        self.attachments.borrow().colors().iter().map(|a| a.texture.clone()).collect()
    }

    fn set_depth_required(&self, required: bool) {
        self.depth_required.set(required);
    }

    fn depth_required(&self) -> bool {
        self.depth_required.get()
    }

    fn is_complete(&self) -> bool {
        self.attachments
            .borrow()
            .is_complete(self.width, self.height, self.depth_required.get())
    }
}

// ============================================================================
// Mock Device
// ============================================================================

/// One recorded draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRecord {
    pub mesh: u64,
    pub vertex_count: u32,
    pub index_count: u32,
    pub primitive: PrimitiveType,
    pub shader: Option<u64>,
    pub target: Option<u64>,
}

pub struct MockDevice {
    pub config: DeviceConfig,
    pub initialized: bool,
    pub next_handle: u64,
    pub stats: DeviceStats,
    pub viewport: Viewport,
    pub bound_shader: Option<u64>,
    pub bound_target: Option<u64>,
    pub bound_textures: FxHashMap<u32, u64>,
    pub shader_binds: Vec<u64>,
    pub clears: Vec<(ClearFlags, [f32; 4])>,
    pub draws: Vec<DrawRecord>,
    pub presents: u32,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            config: DeviceConfig::default(),
            initialized: false,
            next_handle: 1,
            stats: DeviceStats::default(),
            viewport: Viewport::default(),
            bound_shader: None,
            bound_target: None,
            bound_textures: FxHashMap::default(),
            shader_binds: Vec::new(),
            clears: Vec::new(),
            draws: Vec::new(),
            presents: 0,
        }
    }

    /// Already initialized device
    pub fn initialized() -> Self {
        let mut device = Self::new();
        device.initialized = true;
        device
    }

    fn allocate_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn ensure_initialized(&self) -> Result<()> {
        if !self.initialized {
            return Err(Error::InitializationFailed("Device not initialized".to_string()));
        }
        Ok(())
    }
}

impl Device for MockDevice {
    fn api(&self) -> GraphicsApi {
        GraphicsApi::OpenGL
    }

    fn config(&self) -> &DeviceConfig {
        &self.config
    }

    fn initialize(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn shutdown(&mut self) {
        self.initialized = false;
        self.bound_shader = None;
        self.bound_target = None;
        self.bound_textures.clear();
    }

    fn present(&mut self) {
        self.presents += 1;
    }

    fn create_shader(&mut self, vertex_source: &str, fragment_source: &str) -> Result<Rc<dyn Shader>> {
        self.ensure_initialized()?;
        // "#error" stands in for a compile failure
        if vertex_source.contains("#error") || fragment_source.contains("#error") {
            return Err(Error::BackendError("0:1(1): error: mock compile failure".to_string()));
        }
        let id = self.allocate_handle();
        Ok(Rc::new(MockShader::new(id)))
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<Rc<dyn Texture>> {
        self.ensure_initialized()?;
        desc.validate()?;
        let handle = self.allocate_handle();
        let texture = MockTexture::new(handle, desc.width, desc.height, desc.format);
        *texture.pixels.borrow_mut() = desc.data.clone();
        Ok(Rc::new(texture))
    }

    fn create_mesh(&mut self, desc: &MeshDesc) -> Result<Rc<dyn Mesh>> {
        self.ensure_initialized()?;
        desc.validate()?;
        let handle = self.allocate_handle();
        Ok(Rc::new(MockMesh::new(handle, desc)))
    }

    fn create_buffer(&mut self, desc: &BufferDesc) -> Result<Box<dyn Buffer>> {
        self.ensure_initialized()?;
        desc.validate()?;
        let handle = self.allocate_handle();
        Ok(Box::new(MockBuffer::new(handle, desc)))
    }

    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<Rc<dyn RenderTarget>> {
        self.ensure_initialized()?;
        desc.validate()?;
        let handle = self.allocate_handle();
        Ok(Rc::new(MockRenderTarget::new(handle, desc)))
    }

    fn clear_with(&mut self, flags: ClearFlags, color: [f32; 4], _depth: f32, _stencil: i32) {
        self.stats.clears += 1;
        self.clears.push((flags, color));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn bind_shader(&mut self, shader: &dyn Shader) {
        shader.bind();
        self.bound_shader = Some(shader.id());
        self.shader_binds.push(shader.id());
        self.stats.shader_binds += 1;
    }

    fn bind_texture(&mut self, texture: &dyn Texture, slot: u32) {
        texture.bind(slot);
        self.bound_textures.insert(slot, texture.handle());
        self.stats.texture_binds += 1;
    }

    fn bind_render_target(&mut self, target: Option<&dyn RenderTarget>) -> Result<()> {
        if let Some(target) = target {
            if !target.is_complete() {
                return Err(Error::InvalidResource(format!(
                    "Render target {} is not complete",
                    target.handle()
                )));
            }
        }
        self.bound_target = target.map(|t| t.handle());
        self.stats.target_binds += 1;
        Ok(())
    }

    fn draw_mesh_with(&mut self, mesh: &dyn Mesh, primitive: PrimitiveType) {
        mesh.draw_with(primitive);
        self.stats.record_draw(mesh);
        self.draws.push(DrawRecord {
            mesh: mesh.handle(),
            vertex_count: mesh.vertex_count(),
            index_count: mesh.index_count(),
            primitive,
            shader: self.bound_shader,
            target: self.bound_target,
        });
    }

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

#[path = "mock_device_tests.rs"]
mod tests;
