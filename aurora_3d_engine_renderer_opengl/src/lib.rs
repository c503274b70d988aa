/*!
# Aurora 3D Engine - OpenGL Renderer Backend

OpenGL 3.3 core / OpenGL ES 3.0 implementation of the Aurora 3D render
hardware interface, built on the `glow` bindings.

The crate does not create windows or contexts. The application makes a
context current, then either builds an [`OpenGLDevice`] directly or
registers the backend with a `DeviceCoordinator`.
*/

mod opengl_buffer;
mod opengl_context;
mod opengl_device;
mod opengl_format;
mod opengl_mesh;
mod opengl_render_target;
mod opengl_shader;
mod opengl_texture;

use std::cell::RefCell;
use std::ffi::c_void;
use std::rc::Rc;
use aurora_3d_engine::aurora3d::{
    Result,
    render::{DeviceConfig, DeviceCoordinator, GraphicsApi, SharedDevice},
};

pub use opengl_buffer::OpenGLBuffer;
pub use opengl_context::GlContext;
pub use opengl_device::OpenGLDevice;
pub use opengl_format::{is_supported_version, MIN_GLES_VERSION, MIN_GL_VERSION};
pub use opengl_mesh::OpenGLMesh;
pub use opengl_render_target::OpenGLRenderTarget;
pub use opengl_shader::OpenGLShader;
pub use opengl_texture::OpenGLTexture;

/// GL entry point loader (e.g. `glutin`'s `get_proc_address`)
pub type GlLoader = Rc<dyn Fn(&str) -> *const c_void>;

/// Register the OpenGL backend with a device coordinator
///
/// Every device the coordinator builds loads its entry points through
/// `loader`, so the matching context must be current whenever
/// `create_device(GraphicsApi::OpenGL, ..)` is called.
///
/// # Example
///
/// ```no_run
/// use std::rc::Rc;
/// use aurora_3d_engine::aurora3d::render::{DeviceConfig, DeviceCoordinator, GraphicsApi};
///
/// # fn get_proc_address(_: &str) -> *const std::ffi::c_void { std::ptr::null() }
/// let mut coordinator = DeviceCoordinator::new();
/// aurora_3d_engine_renderer_opengl::register(&mut coordinator, Rc::new(get_proc_address));
/// let device = coordinator.create_device(GraphicsApi::OpenGL, &DeviceConfig::default())?;
/// # Ok::<(), aurora_3d_engine::aurora3d::Error>(())
/// ```
pub fn register(coordinator: &mut DeviceCoordinator, loader: GlLoader) {
    coordinator.register(
        GraphicsApi::OpenGL,
        Box::new(move |config: &DeviceConfig| -> Result<SharedDevice> {
            let loader = loader.clone();
            let gl = unsafe { glow::Context::from_loader_function(move |name| loader(name)) };
            let device: SharedDevice = Rc::new(RefCell::new(OpenGLDevice::new(gl, config.clone())));
            Ok(device)
        }),
    );
}
