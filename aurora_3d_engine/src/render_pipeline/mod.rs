//! Render pipeline: command buffer, render passes and the render path
//!
//! Game code queues draws on a `RenderPath`; the path sorts them and hands
//! them to its passes (geometry over the deferred bucket, forward over the
//! forward bucket) once per frame.

mod command_buffer;
mod forward_pass;
mod geometry_pass;
mod render_pass;
mod render_path;

pub use command_buffer::{CommandBuffer, RenderCommand};
pub use forward_pass::{ForwardRenderPass, UNIFORM_MODEL, UNIFORM_PROJECTION, UNIFORM_VIEW};
pub use geometry_pass::GeometryRenderPass;
pub use render_pass::{PassContext, PassLifecycle, PassState, RenderPass, RenderPassType};
pub use render_path::{RenderPath, RenderPathConfig};
