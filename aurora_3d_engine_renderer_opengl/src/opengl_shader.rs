/// Shader - OpenGL implementation of the Shader trait
///
/// One linked program per shader. Uniform locations are looked up lazily
/// and cached by name, including misses, so an unknown name costs one
/// driver query and one warning for the lifetime of the program.

use std::cell::RefCell;
use std::rc::Rc;
use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use glow::HasContext;
use rustc_hash::{FxHashMap, FxHashSet};
use aurora_3d_engine::aurora3d::{
    Error,
    Result,
    render::{Shader, ShaderStage},
};
use aurora_3d_engine::{engine_debug, engine_error, engine_warn};
use crate::opengl_context::{handle_of, GlContext};

pub struct OpenGLShader {
    ctx: Rc<GlContext>,
    pub(crate) program: glow::NativeProgram,
    /// Active uniform names reported by the linker
    active_uniforms: FxHashSet<String>,
    locations: RefCell<FxHashMap<String, Option<glow::NativeUniformLocation>>>,
}

impl OpenGLShader {
    /// Compile both stages and link them
    ///
    /// On failure every native object created so far is deleted and the
    /// error carries the driver info log.
    pub(crate) fn new(ctx: Rc<GlContext>, vertex_source: &str, fragment_source: &str) -> Result<Self> {
        let gl = &ctx.gl;

        let vertex = compile_stage(gl, ShaderStage::Vertex, vertex_source)?;
        let fragment = match compile_stage(gl, ShaderStage::Fragment, fragment_source) {
            Ok(fragment) => fragment,
            Err(err) => {
                unsafe { gl.delete_shader(vertex) };
                return Err(err);
            }
        };

        let program = unsafe { link_program(gl, vertex, fragment) };
        unsafe {
            gl.delete_shader(vertex);
            gl.delete_shader(fragment);
        }
        let program = program?;

        let active_uniforms = unsafe {
            let count = gl.get_active_uniforms(program);
            (0..count)
                .filter_map(|index| gl.get_active_uniform(program, index))
                .map(|uniform| uniform.name.trim_end_matches("[0]").to_string())
                .collect::<FxHashSet<String>>()
        };

        engine_debug!("aurora3d::opengl", "[{}] Linked program {} ({} active uniforms)",
            ctx.debug_name, handle_of(program.0), active_uniforms.len());

        Ok(Self {
            ctx,
            program,
            active_uniforms,
            locations: RefCell::new(FxHashMap::default()),
        })
    }

    /// Cached uniform location, warning once per unknown name
    fn location(&self, name: &str) -> Option<glow::NativeUniformLocation> {
        if let Some(cached) = self.locations.borrow().get(name) {
            return cached.clone();
        }

        let location = unsafe { self.ctx.gl.get_uniform_location(self.program, name) };
        if location.is_none() {
            engine_warn!("aurora3d::opengl", "Program {} has no active uniform '{}'",
                handle_of(self.program.0), name);
        }
        self.locations.borrow_mut().insert(name.to_string(), location.clone());
        location
    }
}

fn stage_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn compile_stage(gl: &glow::Context, stage: ShaderStage, source: &str) -> Result<glow::NativeShader> {
    unsafe {
        let shader = gl.create_shader(stage_type(stage)).map_err(|e| {
            engine_error!("aurora3d::opengl", "Failed to create {:?} shader: {}", stage, e);
            Error::BackendError(e)
        })?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            engine_error!("aurora3d::opengl", "{:?} shader compilation failed:\n{}", stage, log);
            return Err(Error::BackendError(format!("{:?} shader compilation failed: {}", stage, log.trim())));
        }
        Ok(shader)
    }
}

unsafe fn link_program(
    gl: &glow::Context,
    vertex: glow::NativeShader,
    fragment: glow::NativeShader,
) -> Result<glow::NativeProgram> {
    let program = gl.create_program().map_err(|e| {
        engine_error!("aurora3d::opengl", "Failed to create program: {}", e);
        Error::BackendError(e)
    })?;
    gl.attach_shader(program, vertex);
    gl.attach_shader(program, fragment);
    gl.link_program(program);
    gl.detach_shader(program, vertex);
    gl.detach_shader(program, fragment);

    if !gl.get_program_link_status(program) {
        let log = gl.get_program_info_log(program);
        gl.delete_program(program);
        engine_error!("aurora3d::opengl", "Program link failed:\n{}", log);
        return Err(Error::BackendError(format!("Program link failed: {}", log.trim())));
    }
    Ok(program)
}

impl Shader for OpenGLShader {
    fn id(&self) -> u64 {
        handle_of(self.program.0)
    }

    fn bind(&self) {
        unsafe { self.ctx.gl.use_program(Some(self.program)) };
    }

    fn has_uniform(&self, name: &str) -> bool {
        self.active_uniforms.contains(name)
    }

    fn set_bool(&self, name: &str, value: bool) {
        self.set_int(name, value as i32);
    }

    fn set_int(&self, name: &str, value: i32) {
        if let Some(location) = self.location(name) {
            unsafe { self.ctx.gl.uniform_1_i32(Some(&location), value) };
        }
    }

    fn set_float(&self, name: &str, value: f32) {
        if let Some(location) = self.location(name) {
            unsafe { self.ctx.gl.uniform_1_f32(Some(&location), value) };
        }
    }

    fn set_vec2(&self, name: &str, value: Vec2) {
        if let Some(location) = self.location(name) {
            unsafe { self.ctx.gl.uniform_2_f32(Some(&location), value.x, value.y) };
        }
    }

    fn set_vec3(&self, name: &str, value: Vec3) {
        if let Some(location) = self.location(name) {
            unsafe { self.ctx.gl.uniform_3_f32(Some(&location), value.x, value.y, value.z) };
        }
    }

    fn set_vec4(&self, name: &str, value: Vec4) {
        if let Some(location) = self.location(name) {
            unsafe { self.ctx.gl.uniform_4_f32(Some(&location), value.x, value.y, value.z, value.w) };
        }
    }

    fn set_mat2(&self, name: &str, value: &Mat2) {
        if let Some(location) = self.location(name) {
            unsafe { self.ctx.gl.uniform_matrix_2_f32_slice(Some(&location), false, &value.to_cols_array()) };
        }
    }

    fn set_mat3(&self, name: &str, value: &Mat3) {
        if let Some(location) = self.location(name) {
            unsafe { self.ctx.gl.uniform_matrix_3_f32_slice(Some(&location), false, &value.to_cols_array()) };
        }
    }

    fn set_mat4(&self, name: &str, value: &Mat4) {
        if let Some(location) = self.location(name) {
            unsafe { self.ctx.gl.uniform_matrix_4_f32_slice(Some(&location), false, &value.to_cols_array()) };
        }
    }
}

impl Drop for OpenGLShader {
    fn drop(&mut self) {
        unsafe { self.ctx.gl.delete_program(self.program) };
    }
}
