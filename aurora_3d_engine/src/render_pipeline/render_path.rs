/// Render path: the per-frame orchestrator.
///
/// A path owns the command buffer, the active camera and the passes, and
/// renders them against one output target (or the default framebuffer).
/// Game code pushes draws with `push_render` and calls `render()` once per
/// frame.

use std::rc::Rc;
use glam::Mat4;
use crate::camera::{Camera, AABB};
use crate::error::{Error, Result};
use crate::material::SharedMaterial;
use crate::rhi::{Mesh, RenderTarget, SharedDevice, Viewport};
use super::command_buffer::CommandBuffer;
use super::forward_pass::ForwardRenderPass;
use super::geometry_pass::GeometryRenderPass;
use super::render_pass::{PassContext, PassLifecycle, RenderPass, RenderPassType};

/// Render path settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPathConfig {
    /// Color the output is cleared to at the start of a frame
    pub clear_color: [f32; 4],
    /// Clear color and depth of the output before the passes run
    pub clear_output: bool,
    /// Frustum cull commands that carry bounds
    pub cull_commands: bool,
}

impl Default for RenderPathConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            clear_output: true,
            cull_commands: false,
        }
    }
}

pub struct RenderPath {
    device: SharedDevice,
    config: RenderPathConfig,
    command_buffer: CommandBuffer,
    camera: Option<Camera>,
    output: Option<Rc<dyn RenderTarget>>,
    viewport: Viewport,
    /// (registration sequence, pass)
    passes: Vec<(u64, Box<dyn RenderPass>)>,
    next_sequence: u64,
    initialized: bool,
}

impl RenderPath {
    /// Create a path on `device`, clearing to the device's clear color
    pub fn new(device: SharedDevice) -> Self {
        let clear_color = device.borrow().config().clear_color;
        let config = RenderPathConfig {
            clear_color,
            ..RenderPathConfig::default()
        };
        Self::with_config(device, config)
    }

    pub fn with_config(device: SharedDevice, config: RenderPathConfig) -> Self {
        Self {
            device,
            config,
            command_buffer: CommandBuffer::new(),
            camera: None,
            output: None,
            viewport: Viewport::default(),
            passes: Vec::new(),
            next_sequence: 0,
            initialized: false,
        }
    }

    /// Install the default geometry and forward passes and initialize every pass
    ///
    /// Passes added before this call are kept; a default pass is only
    /// installed when no pass of its type exists. Calling again after
    /// success is a no-op.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        if !self.device.borrow().is_initialized() {
            crate::engine_error!("aurora3d::RenderPath", "Cannot initialize render path: device not initialized");
            return Err(Error::InitializationFailed("Device not initialized".to_string()));
        }

        if self.index_of(RenderPassType::Geometry).is_none() {
            self.insert_pass(Box::new(GeometryRenderPass::new()));
        }
        if self.index_of(RenderPassType::Forward).is_none() {
            self.insert_pass(Box::new(ForwardRenderPass::new()));
        }

        let mut device = self.device.borrow_mut();
        for (_, pass) in self.passes.iter_mut() {
            if pass.lifecycle() != PassLifecycle::Uninitialized {
                continue;
            }
            let mut ctx = PassContext {
                device: &mut *device,
                camera: self.camera.as_ref(),
                commands: &self.command_buffer,
                output: self.output.as_ref(),
                viewport: self.viewport,
                clear_color: self.config.clear_color,
                cull: self.config.cull_commands,
            };
            if let Err(err) = pass.initialize(&mut ctx) {
                crate::engine_error!(
                    "aurora3d::RenderPath",
                    "Failed to initialize {:?} pass: {}",
                    pass.pass_type(),
                    err
                );
                return Err(err);
            }
            pass.state_mut().lifecycle = PassLifecycle::Initialized;
        }
        drop(device);

        self.initialized = true;
        crate::engine_info!("aurora3d::RenderPath", "Render path initialized with {} passes", self.passes.len());
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Add a pass, replacing (and cleaning up) any pass of the same type
    ///
    /// On an initialized path the new pass is initialized immediately; if
    /// that fails the pass is dropped and the previous one stays in place.
    pub fn add_pass(&mut self, mut pass: Box<dyn RenderPass>) -> Result<()> {
        if self.initialized {
            let mut device = self.device.borrow_mut();
            let mut ctx = PassContext {
                device: &mut *device,
                camera: self.camera.as_ref(),
                commands: &self.command_buffer,
                output: self.output.as_ref(),
                viewport: self.viewport,
                clear_color: self.config.clear_color,
                cull: self.config.cull_commands,
            };
            if let Err(err) = pass.initialize(&mut ctx) {
                crate::engine_error!(
                    "aurora3d::RenderPath",
                    "Failed to initialize {:?} pass: {}",
                    pass.pass_type(),
                    err
                );
                return Err(err);
            }
            pass.state_mut().lifecycle = PassLifecycle::Initialized;
        }

        if let Some(mut old) = self.take_pass(pass.pass_type()) {
            crate::engine_debug!("aurora3d::RenderPath", "Replacing {:?} pass", old.pass_type());
            if old.lifecycle() == PassLifecycle::Initialized {
                old.cleanup(&mut *self.device.borrow_mut());
            }
        }

        self.insert_pass(pass);
        Ok(())
    }

    /// Remove the pass of `pass_type`, cleaning it up if it was initialized
    ///
    /// Returns the removed pass, or None if the path has no such pass.
    pub fn remove_pass(&mut self, pass_type: RenderPassType) -> Option<Box<dyn RenderPass>> {
        let mut pass = self.take_pass(pass_type)?;
        if pass.lifecycle() == PassLifecycle::Initialized {
            pass.cleanup(&mut *self.device.borrow_mut());
        }
        Some(pass)
    }

    pub fn pass(&self, pass_type: RenderPassType) -> Option<&dyn RenderPass> {
        self.passes
            .iter()
            .find(|(_, pass)| pass.pass_type() == pass_type)
            .map(|(_, pass)| pass.as_ref())
    }

    pub fn pass_mut(&mut self, pass_type: RenderPassType) -> Option<&mut dyn RenderPass> {
        for (_, pass) in self.passes.iter_mut() {
            if pass.pass_type() == pass_type {
                return Some(pass.as_mut());
            }
        }
        None
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Pass types in execution order
    pub fn pass_types(&self) -> Vec<RenderPassType> {
        self.execution_order()
            .into_iter()
            .map(|index| self.passes[index].1.pass_type())
            .collect()
    }

    // ===== FRAME STATE =====

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    pub fn clear_camera(&mut self) {
        self.camera = None;
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }

    pub fn set_viewport(&mut self, x: u32, y: u32, width: u32, height: u32) {
        self.viewport = Viewport::new(x, y, width, height);
    }

    /// Viewport used this frame
    ///
    /// Falls back to the camera viewport, then to the output target size,
    /// when no viewport was set on the path.
    pub fn viewport(&self) -> Viewport {
        if self.viewport.width > 0 && self.viewport.height > 0 {
            return self.viewport;
        }
        if let Some(camera) = &self.camera {
            let viewport = *camera.viewport();
            if viewport.width > 0 && viewport.height > 0 {
                return viewport;
            }
        }
        match &self.output {
            Some(target) => Viewport::new(0, 0, target.width(), target.height()),
            None => self.viewport,
        }
    }

    /// Render into `target` instead of the default framebuffer
    pub fn set_output_target(&mut self, target: Option<Rc<dyn RenderTarget>>) {
        self.output = target;
    }

    pub fn output_target(&self) -> Option<&Rc<dyn RenderTarget>> {
        self.output.as_ref()
    }

    pub fn config(&self) -> &RenderPathConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderPathConfig {
        &mut self.config
    }

    pub fn device(&self) -> &SharedDevice {
        &self.device
    }

    // ===== COMMANDS =====

    /// Queue a draw for the next `render()`
    pub fn push_render(&mut self, mesh: Rc<dyn Mesh>, material: SharedMaterial, transform: Mat4) {
        self.command_buffer.push(mesh, material, transform);
    }

    /// Queue a draw that frustum culling may skip
    pub fn push_render_with_bounds(&mut self, mesh: Rc<dyn Mesh>, material: SharedMaterial, transform: Mat4, bounds: AABB) {
        self.command_buffer.push_with_bounds(mesh, material, transform, bounds);
    }

    pub fn command_buffer(&self) -> &CommandBuffer {
        &self.command_buffer
    }

    pub fn command_buffer_mut(&mut self) -> &mut CommandBuffer {
        &mut self.command_buffer
    }

    // ===== FRAME =====

    /// Render one frame
    ///
    /// Sorts the queued commands, binds and clears the output, then runs
    /// every enabled pass in order. The command buffer is emptied
    /// afterwards, also when a pass fails. The first pass error stops the
    /// frame and is returned.
    pub fn render(&mut self) -> Result<()> {
        let result = self.render_frame();
        self.command_buffer.clear();
        result
    }

    /// Clean up and drop every pass
    ///
    /// A later `initialize()` installs fresh default passes.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        let mut device = self.device.borrow_mut();
        for (_, pass) in self.passes.iter_mut() {
            if pass.lifecycle() == PassLifecycle::Initialized {
                pass.cleanup(&mut *device);
            }
        }
        drop(device);

        self.passes.clear();
        self.command_buffer.clear();
        self.initialized = false;
        crate::engine_info!("aurora3d::RenderPath", "Render path shut down");
    }

    fn render_frame(&mut self) -> Result<()> {
        if !self.initialized {
            crate::engine_error!("aurora3d::RenderPath", "render() called before initialize()");
            return Err(Error::InvalidState("Render path not initialized".to_string()));
        }

        self.command_buffer.sort();
        let viewport = self.viewport();
        let order = self.execution_order();

        let mut device = self.device.borrow_mut();
        device.reset_stats();

        if let Err(err) = device.bind_render_target(self.output.as_deref()) {
            crate::engine_error!("aurora3d::RenderPath", "Cannot bind render path output: {}", err);
            return Err(err);
        }
        device.set_viewport(viewport);
        if self.config.clear_output {
            device.clear(self.config.clear_color);
        }

        for index in order {
            let pass = &mut self.passes[index].1;
            if !pass.is_enabled() {
                continue;
            }
            let mut ctx = PassContext {
                device: &mut *device,
                camera: self.camera.as_ref(),
                commands: &self.command_buffer,
                output: self.output.as_ref(),
                viewport,
                clear_color: self.config.clear_color,
                cull: self.config.cull_commands,
            };
            if let Err(err) = pass.execute(&mut ctx) {
                crate::engine_error!(
                    "aurora3d::RenderPath",
                    "{:?} pass failed: {}",
                    pass.pass_type(),
                    err
                );
                return Err(err);
            }
        }

        Ok(())
    }

    /// Pass indices sorted by (order, registration sequence)
    fn execution_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.passes.len()).collect();
        order.sort_by_key(|&index| {
            let (sequence, pass) = &self.passes[index];
            (pass.order(), *sequence)
        });
        order
    }

    fn index_of(&self, pass_type: RenderPassType) -> Option<usize> {
        self.passes.iter().position(|(_, pass)| pass.pass_type() == pass_type)
    }

    fn take_pass(&mut self, pass_type: RenderPassType) -> Option<Box<dyn RenderPass>> {
        let index = self.index_of(pass_type)?;
        Some(self.passes.remove(index).1)
    }

    fn insert_pass(&mut self, pass: Box<dyn RenderPass>) {
        self.passes.push((self.next_sequence, pass));
        self.next_sequence += 1;
    }
}

impl Drop for RenderPath {
    fn drop(&mut self) {
        // Skip cleanup when the device is borrowed elsewhere
        if self.initialized && self.device.try_borrow_mut().is_ok() {
            self.shutdown();
        }
    }
}

#[cfg(test)]
#[path = "render_path_tests.rs"]
mod tests;
