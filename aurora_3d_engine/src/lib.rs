/*!
# Aurora 3D Engine

Core traits and types for the Aurora real-time 3D rendering engine.

This crate provides the platform-agnostic rendering API as trait objects.
A backend crate (OpenGL via `aurora_3d_engine_renderer_opengl`) implements
the traits and registers a device factory with a `DeviceCoordinator`.

## Architecture

- **Device**: resource factory and owner of the current binding state
- **Buffer / Texture / Mesh / Shader / RenderTarget**: GPU resource traits
- **Material**: named uniform values and sampler bindings for one shader
- **CommandBuffer**: per-frame draw queue, bucketed by render queue
- **RenderPass / RenderPath**: per-frame orchestration of draws
- **Camera**: view/projection matrices and the culling frustum

Everything lives on the thread that owns the graphics context; shared
handles are `Rc`.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod rhi;
pub mod material;
pub mod camera;
pub mod render_pipeline;

// Main aurora3d namespace module
pub mod aurora3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging facade
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render hardware interface
    pub mod render {
        pub use crate::rhi::*;
    }

    // Material sub-module
    pub mod material {
        pub use crate::material::*;
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Render pipeline sub-module
    pub mod pipeline {
        pub use crate::render_pipeline::*;
    }
}

// Re-export math library at crate root
pub use glam;
