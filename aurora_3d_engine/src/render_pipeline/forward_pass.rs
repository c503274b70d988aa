/// Forward render pass: shades the forward bucket straight into the output.

use std::rc::Rc;
use glam::Mat4;
use crate::error::{Error, Result};
use crate::rhi::{Device, RenderTarget};
use super::command_buffer::RenderCommand;
use super::render_pass::{PassContext, PassLifecycle, PassState, RenderPass, RenderPassType};

/// Model matrix uniform set for every draw
pub const UNIFORM_MODEL: &str = "uModel";
/// View matrix uniform set for every draw
pub const UNIFORM_VIEW: &str = "uView";
/// Projection matrix uniform set for every draw
pub const UNIFORM_PROJECTION: &str = "uProj";

/// Issue one command: shader, transforms, samplers, uniforms, draw
///
/// Returns false (and draws nothing) when the material has no shader.
pub(crate) fn draw_command(device: &mut dyn Device, view: &Mat4, projection: &Mat4, command: &RenderCommand) -> bool {
    let material = command.material.borrow();
    let Some(shader) = material.shader() else {
        crate::engine_warn!(
            "aurora3d::RenderPass",
            "Skipping draw of mesh {}: material '{}' has no shader",
            command.mesh.handle(),
            material.name()
        );
        return false;
    };

    device.bind_shader(shader.as_ref());

    shader.set_mat4(UNIFORM_MODEL, &command.transform);
    shader.set_mat4(UNIFORM_VIEW, view);
    shader.set_mat4(UNIFORM_PROJECTION, projection);

    for (_, sampler) in material.samplers() {
        device.bind_texture(sampler.texture.as_ref(), sampler.unit);
    }

    for (name, value) in material.uniforms() {
        value.apply(shader.as_ref(), name);
    }

    device.draw_mesh(command.mesh.as_ref());
    true
}

/// Bind `target` (or the default framebuffer), then apply viewport and optional clear
///
/// `requires_depth` sets the depth-required flag on `target` for good.
pub(crate) fn begin_target(
    ctx: &mut PassContext<'_>,
    target: Option<&Rc<dyn RenderTarget>>,
    requires_depth: bool,
    clear: bool,
) -> Result<()> {
    if let Some(target) = target {
        if requires_depth {
            target.set_depth_required(true);
        }
    }

    if let Err(err) = ctx.device.bind_render_target(target.map(|t| &**t)) {
        crate::engine_error!("aurora3d::RenderPass", "Cannot bind pass output: {}", err);
        return Err(err);
    }

    ctx.device.set_viewport(ctx.viewport);
    if clear {
        ctx.device.clear(ctx.clear_color);
    }
    Ok(())
}

pub struct ForwardRenderPass {
    state: PassState,
    order: i32,
    requires_depth: bool,
    clear: bool,
    drawn_last_frame: usize,
}

impl ForwardRenderPass {
    /// Default rank, after the geometry pass
    pub const DEFAULT_ORDER: i32 = 100;

    pub fn new() -> Self {
        Self {
            state: PassState::default(),
            order: Self::DEFAULT_ORDER,
            requires_depth: true,
            clear: false,
            drawn_last_frame: 0,
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Require a depth attachment on off-screen outputs (default: true)
    ///
    /// The first frame with forward draws marks the output target
    /// depth-required and the flag is never cleared: a color-only output
    /// then fails to bind in that frame and in every later one. Use
    /// `with_depth(false)` for such outputs.
    pub fn with_depth(mut self, requires_depth: bool) -> Self {
        self.requires_depth = requires_depth;
        self
    }

    /// Clear the output before drawing (default: false, the path clears)
    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    /// Commands actually drawn by the last `execute`
    pub fn drawn_last_frame(&self) -> usize {
        self.drawn_last_frame
    }
}

impl Default for ForwardRenderPass {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPass for ForwardRenderPass {
    fn pass_type(&self) -> RenderPassType {
        RenderPassType::Forward
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn state(&self) -> &PassState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PassState {
        &mut self.state
    }

    fn execute(&mut self, ctx: &mut PassContext<'_>) -> Result<()> {
        self.drawn_last_frame = 0;

        let target = ctx.resolve_output(&self.state);
        let commands = ctx.commands;
        if commands.forward_commands(false, None).is_empty() {
            if self.clear {
                begin_target(ctx, target.as_ref(), self.requires_depth, true)?;
            }
            return Ok(());
        }

        let camera = ctx.camera.ok_or_else(|| {
            Error::InvalidState("Forward pass needs an active camera".to_string())
        })?;

        begin_target(ctx, target.as_ref(), self.requires_depth, self.clear)?;

        let view = *camera.view_matrix();
        let projection = *camera.projection_matrix();

        for command in commands.forward_commands(ctx.cull, Some(camera)) {
            if draw_command(ctx.device, &view, &projection, command) {
                self.drawn_last_frame += 1;
            }
        }

        crate::engine_trace!("aurora3d::ForwardRenderPass", "Drew {} commands", self.drawn_last_frame);
        Ok(())
    }

    fn cleanup(&mut self, _device: &mut dyn Device) {
        self.state.lifecycle = PassLifecycle::CleanedUp;
        self.drawn_last_frame = 0;
    }
}
