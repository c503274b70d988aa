/// Geometry render pass: draws the deferred bucket into a G-buffer target.
///
/// Without its own output the pass falls back to the path output and
/// behaves like a forward pass over deferred materials.

use crate::error::{Error, Result};
use crate::rhi::Device;
use super::forward_pass::{begin_target, draw_command};
use super::render_pass::{PassContext, PassLifecycle, PassState, RenderPass, RenderPassType};

pub struct GeometryRenderPass {
    state: PassState,
    order: i32,
    drawn_last_frame: usize,
}

impl GeometryRenderPass {
    /// Default rank, first in the path
    pub const DEFAULT_ORDER: i32 = 0;

    pub fn new() -> Self {
        Self {
            state: PassState::default(),
            order: Self::DEFAULT_ORDER,
            drawn_last_frame: 0,
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Commands actually drawn by the last `execute`
    pub fn drawn_last_frame(&self) -> usize {
        self.drawn_last_frame
    }
}

impl Default for GeometryRenderPass {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPass for GeometryRenderPass {
    fn pass_type(&self) -> RenderPassType {
        RenderPassType::Geometry
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

        let commands = ctx.commands;
        if commands.deferred_commands(false, None).is_empty() {
            return Ok(());
        }

        let camera = ctx.camera.ok_or_else(|| {
            Error::InvalidState("Geometry pass needs an active camera".to_string())
        })?;

        // A private G-buffer is cleared here; the path output was cleared by the path
        let owns_output = self.state.output.is_some();
        let target = ctx.resolve_output(&self.state);
        begin_target(ctx, target.as_ref(), true, owns_output)?;

        let view = *camera.view_matrix();
        let projection = *camera.projection_matrix();

        for command in commands.deferred_commands(ctx.cull, Some(camera)) {
            if draw_command(ctx.device, &view, &projection, command) {
                self.drawn_last_frame += 1;
            }
        }

        crate::engine_trace!("aurora3d::GeometryRenderPass", "Drew {} commands", self.drawn_last_frame);
        Ok(())
    }

    fn cleanup(&mut self, _device: &mut dyn Device) {
        self.state.lifecycle = PassLifecycle::CleanedUp;
        self.drawn_last_frame = 0;
    }
}
