/// Shader program trait

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

/// Pipeline stage of a shader source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Compiled and linked GPU program
///
/// Uniform setters resolve the name on first use and cache the location
/// for the lifetime of the shader. Names are not checked against the
/// source in advance: setting a uniform the program does not declare is
/// ignored (and reported once by the backend).
///
/// Setters apply to the currently bound program; callers bind first
/// (`Device::bind_shader` or `Shader::bind`).
pub trait Shader {
    /// Backend program name (opaque to engine code, stable sort key)
    fn id(&self) -> u64;

    /// Make this program current
    fn bind(&self);

    /// True if the linked program declares an active uniform `name`
    fn has_uniform(&self, name: &str) -> bool;

    fn set_bool(&self, name: &str, value: bool);
    fn set_int(&self, name: &str, value: i32);
    fn set_float(&self, name: &str, value: f32);
    fn set_vec2(&self, name: &str, value: Vec2);
    fn set_vec3(&self, name: &str, value: Vec3);
    fn set_vec4(&self, name: &str, value: Vec4);
    fn set_mat2(&self, name: &str, value: &Mat2);
    fn set_mat3(&self, name: &str, value: &Mat3);
    fn set_mat4(&self, name: &str, value: &Mat4);
}
