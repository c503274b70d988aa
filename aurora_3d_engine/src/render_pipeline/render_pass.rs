/// Render pass trait and per-pass state.
///
/// A pass is one unit of GPU work per frame. The owning `RenderPath` drives
/// its lifecycle: `initialize` once, `execute` every frame while enabled,
/// `cleanup` once at shutdown. Passes reach the path's device, camera and
/// command buffer through a `PassContext` built for each call.

use std::rc::Rc;
use crate::camera::Camera;
use crate::error::Result;
use crate::rhi::{Device, RenderTarget, Viewport};
use super::command_buffer::CommandBuffer;

/// Identity of a pass inside a path (one pass per type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPassType {
    /// G-buffer pass over the deferred bucket
    Geometry,
    /// Forward-shaded pass over the forward bucket
    Forward,
    /// User pass
    Custom(&'static str),
}

/// Lifecycle position of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassLifecycle {
    #[default]
    Uninitialized,
    Initialized,
    CleanedUp,
}

/// State every pass carries
#[derive(Clone)]
pub struct PassState {
    pub enabled: bool,
    pub lifecycle: PassLifecycle,
    /// Result of an upstream pass this pass reads
    pub input: Option<Rc<dyn RenderTarget>>,
    /// Where this pass draws; `None` uses the path output
    pub output: Option<Rc<dyn RenderTarget>>,
}

impl Default for PassState {
    fn default() -> Self {
        Self {
            enabled: true,
            lifecycle: PassLifecycle::Uninitialized,
            input: None,
            output: None,
        }
    }
}

impl std::fmt::Debug for PassState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassState")
            .field("enabled", &self.enabled)
            .field("lifecycle", &self.lifecycle)
            .field("input", &self.input.as_ref().map(|t| t.handle()))
            .field("output", &self.output.as_ref().map(|t| t.handle()))
            .finish()
    }
}

/// Path state lent to a pass for one call
pub struct PassContext<'a> {
    pub device: &'a mut dyn Device,
    pub camera: Option<&'a Camera>,
    pub commands: &'a CommandBuffer,
    /// Path output target (`None` = default framebuffer)
    pub output: Option<&'a Rc<dyn RenderTarget>>,
    pub viewport: Viewport,
    pub clear_color: [f32; 4],
    /// Frustum culling requested for this frame
    pub cull: bool,
}

impl<'a> PassContext<'a> {
    /// Target a pass should draw into: its own output, else the path output
    pub fn resolve_output(&self, state: &PassState) -> Option<Rc<dyn RenderTarget>> {
        state.output.clone().or_else(|| self.output.cloned())
    }
}

/// A unit of GPU work inside a `RenderPath`
///
/// Passes execute in ascending `order()`; passes with equal order run in
/// registration order.
pub trait RenderPass {
    fn pass_type(&self) -> RenderPassType;

    /// Execution rank inside the path
    fn order(&self) -> i32;

    fn state(&self) -> &PassState;

    fn state_mut(&mut self) -> &mut PassState;

    /// One-time setup when added to a path
    fn initialize(&mut self, _ctx: &mut PassContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Record this frame's work
    fn execute(&mut self, ctx: &mut PassContext<'_>) -> Result<()>;

    /// Release pass-owned resources at path shutdown
    fn cleanup(&mut self, _device: &mut dyn Device) {}

    fn is_enabled(&self) -> bool {
        self.state().enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.state_mut().enabled = enabled;
    }

    fn lifecycle(&self) -> PassLifecycle {
        self.state().lifecycle
    }

    fn set_input(&mut self, target: Option<Rc<dyn RenderTarget>>) {
        self.state_mut().input = target;
    }

    fn set_output(&mut self, target: Option<Rc<dyn RenderTarget>>) {
        self.state_mut().output = target;
    }

    fn input(&self) -> Option<Rc<dyn RenderTarget>> {
        self.state().input.clone()
    }

    fn output(&self) -> Option<Rc<dyn RenderTarget>> {
        self.state().output.clone()
    }
}
