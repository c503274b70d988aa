/// Material: a named bag of uniform values and sampler bindings for one shader.
///
/// A Material says what a shader should be told, not how to bind it. The
/// render passes read `uniforms()` and `samplers()` at draw time and push
/// each entry through the shader setters.
///
/// Entries keep insertion order (a Vec plus a name → index map), so the
/// upload order is deterministic from frame to frame.

use std::cell::RefCell;
use std::rc::Rc;
use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use rustc_hash::FxHashMap;
use crate::rhi::{Shader, Texture};
use super::uniform::{SamplerType, SamplerUniform, UniformValue};

/// Material shared between render commands
pub type SharedMaterial = Rc<RefCell<Material>>;

/// Fallback base color (mid gray) when none was set
pub const DEFAULT_COLOR: Vec4 = Vec4::new(0.5, 0.5, 0.5, 1.0);

/// Fallback specular strength
pub const DEFAULT_SPECULAR: f32 = 0.5;

/// Broad category of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaterialType {
    /// Lit surface material
    #[default]
    Default,
    /// User shader with arbitrary uniforms
    Custom,
    /// Full-screen post-process material
    PostProcess,
}

/// Command buffer bucket a material is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderQueue {
    /// Drawn by the forward pass
    #[default]
    Forward,
    /// Drawn by the geometry (G-buffer) pass
    Deferred,
}

pub struct Material {
    name: String,
    shader: Option<Rc<dyn Shader>>,
    material_type: MaterialType,
    render_queue: RenderQueue,
    color: Option<Vec4>,
    specular: f32,
    uniforms: Vec<(String, UniformValue)>,
    uniform_names: FxHashMap<String, usize>,
    samplers: Vec<(String, SamplerUniform)>,
    sampler_names: FxHashMap<String, usize>,
}

impl Material {
    /// Empty material without a shader
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shader: None,
            material_type: MaterialType::Default,
            render_queue: RenderQueue::Forward,
            color: None,
            specular: DEFAULT_SPECULAR,
            uniforms: Vec::new(),
            uniform_names: FxHashMap::default(),
            samplers: Vec::new(),
            sampler_names: FxHashMap::default(),
        }
    }

    pub fn with_shader(name: impl Into<String>, shader: Rc<dyn Shader>) -> Self {
        let mut material = Self::new(name);
        material.shader = Some(shader);
        material
    }

    /// Wrap into the shared handle used by render commands
    pub fn into_shared(self) -> SharedMaterial {
        Rc::new(RefCell::new(self))
    }

    /// Value-wise clone
    ///
    /// Both maps are duplicated, so later writes to either material do not
    /// affect the other. The shader and sampler textures are shared.
    pub fn copy(&self) -> Material {
        Material {
            name: self.name.clone(),
            shader: self.shader.clone(),
            material_type: self.material_type,
            render_queue: self.render_queue,
            color: self.color,
            specular: self.specular,
            uniforms: self.uniforms.clone(),
            uniform_names: self.uniform_names.clone(),
            samplers: self.samplers.clone(),
            sampler_names: self.sampler_names.clone(),
        }
    }

    // ===== IDENTITY / ROUTING =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shader(&self) -> Option<&Rc<dyn Shader>> {
        self.shader.as_ref()
    }

    pub fn set_shader(&mut self, shader: Option<Rc<dyn Shader>>) {
        self.shader = shader;
    }

    pub fn material_type(&self) -> MaterialType {
        self.material_type
    }

    pub fn set_material_type(&mut self, material_type: MaterialType) {
        self.material_type = material_type;
    }

    pub fn render_queue(&self) -> RenderQueue {
        self.render_queue
    }

    pub fn set_render_queue(&mut self, queue: RenderQueue) {
        self.render_queue = queue;
    }

    // ===== FALLBACK FIELDS =====

    /// Base color, mid gray when never set
    pub fn color(&self) -> Vec4 {
        self.color.unwrap_or(DEFAULT_COLOR)
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.color = Some(color);
    }

    pub fn specular(&self) -> f32 {
        self.specular
    }

    pub fn set_specular(&mut self, specular: f32) {
        self.specular = specular;
    }

    // ===== UNIFORMS =====

    /// Insert or overwrite a uniform; the type tag may change
    pub fn set_uniform(&mut self, name: &str, value: UniformValue) {
        match self.uniform_names.get(name) {
            Some(&index) => self.uniforms[index].1 = value,
            None => {
                self.uniform_names.insert(name.to_string(), self.uniforms.len());
                self.uniforms.push((name.to_string(), value));
            }
        }
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.set_uniform(name, UniformValue::Bool(value));
    }

    pub fn set_int(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    pub fn set_vec2(&mut self, name: &str, value: Vec2) {
        self.set_uniform(name, UniformValue::Vec2(value));
    }

    pub fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    pub fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.set_uniform(name, UniformValue::Vec4(value));
    }

    pub fn set_mat2(&mut self, name: &str, value: Mat2) {
        self.set_uniform(name, UniformValue::Mat2(value));
    }

    pub fn set_mat3(&mut self, name: &str, value: Mat3) {
        self.set_uniform(name, UniformValue::Mat3(value));
    }

    pub fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.set_uniform(name, UniformValue::Mat4(value));
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniform_names.get(name).map(|&i| &self.uniforms[i].1)
    }

    /// All uniforms in insertion order
    pub fn uniforms(&self) -> &[(String, UniformValue)] {
        &self.uniforms
    }

    // ===== SAMPLERS =====

    /// Bind `texture` to the sampler `name` on texture unit `unit`
    ///
    /// When a shader is assigned, the unit is pushed right away: the shader
    /// is bound and `name` is set to `unit` as an int uniform. This happens
    /// at set time, not at draw time.
    ///
    /// The shader is bound directly, not through the device, so
    /// `Device::bound_shader()` is stale until the next `Device::bind_shader`.
    pub fn set_texture(&mut self, name: &str, texture: Rc<dyn Texture>, unit: u32, sampler_type: SamplerType) {
        let sampler = SamplerUniform {
            texture,
            unit,
            sampler_type,
        };
        match self.sampler_names.get(name) {
            Some(&index) => self.samplers[index].1 = sampler,
            None => {
                self.sampler_names.insert(name.to_string(), self.samplers.len());
                self.samplers.push((name.to_string(), sampler));
            }
        }

        if let Some(shader) = &self.shader {
            shader.bind();
            shader.set_int(name, unit as i32);
        }
    }

    pub fn sampler(&self, name: &str) -> Option<&SamplerUniform> {
        self.sampler_names.get(name).map(|&i| &self.samplers[i].1)
    }

    /// All sampler bindings in insertion order
    pub fn samplers(&self) -> &[(String, SamplerUniform)] {
        &self.samplers
    }

    /// Handle of the first sampler texture (sort key for batching)
    pub fn first_texture_handle(&self) -> u64 {
        self.samplers.first().map_or(0, |(_, s)| s.texture.handle())
    }
}

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
