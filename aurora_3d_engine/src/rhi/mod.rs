//! Render Hardware Interface
//!
//! Backend-agnostic device and resource traits. Backends (OpenGL, ...)
//! implement these traits in their own crates; engine code only ever sees
//! `dyn Device`, `dyn Shader`, `dyn Texture`, ...

pub mod buffer;
pub mod device;
pub mod format;
pub mod mesh;
pub mod render_target;
pub mod shader;
pub mod texture;

#[cfg(test)]
pub(crate) mod mock_device;

pub use buffer::{check_update_range, Buffer, BufferDesc, BufferType, BufferUsage};
pub use device::{
    ClearFlags, Device, DeviceConfig, DeviceCoordinator, DeviceFactory, DeviceStats,
    GraphicsApi, SharedDevice, Viewport,
};
pub use format::Format;
pub use mesh::{Mesh, MeshDesc, PrimitiveType, VertexAttribute, VertexLayout};
pub use render_target::{
    Attachment, AttachmentSet, AttachmentType, RenderTarget, RenderTargetDesc,
};
pub use shader::{Shader, ShaderStage};
pub use texture::{check_pixel_data, Texture, TextureDesc, TextureFilter, TextureWrap};
