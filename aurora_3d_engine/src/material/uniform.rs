/// Tagged uniform values and sampler bindings.

use std::rc::Rc;
use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use crate::rhi::{Shader, Texture};

/// Type tag of a uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformType {
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
    Sampler1D,
    Sampler2D,
    Sampler3D,
    SamplerCube,
}

impl UniformType {
    pub fn is_sampler(&self) -> bool {
        matches!(
            self,
            UniformType::Sampler1D | UniformType::Sampler2D | UniformType::Sampler3D | UniformType::SamplerCube
        )
    }
}

/// Kind of sampler a texture is bound as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerType {
    Sampler1D,
    #[default]
    Sampler2D,
    Sampler3D,
    SamplerCube,
}

impl From<SamplerType> for UniformType {
    fn from(sampler: SamplerType) -> Self {
        match sampler {
            SamplerType::Sampler1D => UniformType::Sampler1D,
            SamplerType::Sampler2D => UniformType::Sampler2D,
            SamplerType::Sampler3D => UniformType::Sampler3D,
            SamplerType::SamplerCube => UniformType::SamplerCube,
        }
    }
}

/// A scalar, vector or matrix uniform value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
}

impl UniformValue {
    pub fn uniform_type(&self) -> UniformType {
        match self {
            UniformValue::Bool(_) => UniformType::Bool,
            UniformValue::Int(_) => UniformType::Int,
            UniformValue::Float(_) => UniformType::Float,
            UniformValue::Vec2(_) => UniformType::Vec2,
            UniformValue::Vec3(_) => UniformType::Vec3,
            UniformValue::Vec4(_) => UniformType::Vec4,
            UniformValue::Mat2(_) => UniformType::Mat2,
            UniformValue::Mat3(_) => UniformType::Mat3,
            UniformValue::Mat4(_) => UniformType::Mat4,
        }
    }

    /// Upload to the currently bound program, dispatching on the tag
    pub fn apply(&self, shader: &dyn Shader, name: &str) {
        match self {
            UniformValue::Bool(v) => shader.set_bool(name, *v),
            UniformValue::Int(v) => shader.set_int(name, *v),
            UniformValue::Float(v) => shader.set_float(name, *v),
            UniformValue::Vec2(v) => shader.set_vec2(name, *v),
            UniformValue::Vec3(v) => shader.set_vec3(name, *v),
            UniformValue::Vec4(v) => shader.set_vec4(name, *v),
            UniformValue::Mat2(v) => shader.set_mat2(name, v),
            UniformValue::Mat3(v) => shader.set_mat3(name, v),
            UniformValue::Mat4(v) => shader.set_mat4(name, v),
        }
    }
}

macro_rules! impl_uniform_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for UniformValue {
                fn from(value: $ty) -> Self {
                    UniformValue::$variant(value)
                }
            }
        )*
    };
}

impl_uniform_from! {
    bool => Bool,
    i32 => Int,
    f32 => Float,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    Mat2 => Mat2,
    Mat3 => Mat3,
    Mat4 => Mat4,
}

/// A texture bound to a sampler uniform
#[derive(Clone)]
pub struct SamplerUniform {
    pub texture: Rc<dyn Texture>,
    /// Texture unit the sampler reads from
    pub unit: u32,
    pub sampler_type: SamplerType,
}

impl SamplerUniform {
    pub fn uniform_type(&self) -> UniformType {
        self.sampler_type.into()
    }
}

impl std::fmt::Debug for SamplerUniform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamplerUniform")
            .field("texture", &self.texture.handle())
            .field("unit", &self.unit)
            .field("sampler_type", &self.sampler_type)
            .finish()
    }
}
