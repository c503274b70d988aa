/// Per-frame queue of draw requests.
///
/// Game code pushes (mesh, material, transform) triples; render passes read
/// them back by bucket. The buffer is cleared once per frame after dispatch
/// and reused, never reallocated.

use std::rc::Rc;
use glam::Mat4;
use crate::camera::{Camera, AABB};
use crate::material::{RenderQueue, SharedMaterial};
use crate::rhi::Mesh;

/// One draw request, valid for a single frame
#[derive(Clone)]
pub struct RenderCommand {
    pub transform: Mat4,
    pub mesh: Rc<dyn Mesh>,
    pub material: SharedMaterial,
    /// Local-space bounds; commands without bounds are never culled
    pub bounds: Option<AABB>,
}

impl RenderCommand {
    /// State-change key: (shader id, first texture handle, material address)
    ///
    /// Commands without a shader sort first so the pass rejects them early.
    pub fn sort_key(&self) -> (u64, u64, usize) {
        let material = self.material.borrow();
        let shader = material.shader().map_or(0, |s| s.id());
        let texture = material.first_texture_handle();
        (shader, texture, Rc::as_ptr(&self.material) as *const () as usize)
    }

    /// True when the world-space bounds touch the camera frustum
    pub fn is_visible(&self, camera: &Camera) -> bool {
        match &self.bounds {
            Some(bounds) => camera.frustum().intersects_aabb(&bounds.transformed(&self.transform)),
            None => true,
        }
    }
}

impl std::fmt::Debug for RenderCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderCommand")
            .field("mesh", &self.mesh.handle())
            .field("material", &self.material.borrow().name())
            .field("bounds", &self.bounds)
            .finish()
    }
}

/// Bucketed command storage
#[derive(Debug, Default)]
pub struct CommandBuffer {
    forward: Vec<RenderCommand>,
    deferred: Vec<RenderCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a draw; the bucket follows the material's render queue
    pub fn push(&mut self, mesh: Rc<dyn Mesh>, material: SharedMaterial, transform: Mat4) {
        self.push_command(RenderCommand {
            transform,
            mesh,
            material,
            bounds: None,
        });
    }

    /// Queue a draw that can be frustum culled
    pub fn push_with_bounds(&mut self, mesh: Rc<dyn Mesh>, material: SharedMaterial, transform: Mat4, bounds: AABB) {
        self.push_command(RenderCommand {
            transform,
            mesh,
            material,
            bounds: Some(bounds),
        });
    }

    pub fn push_command(&mut self, command: RenderCommand) {
        let queue = command.material.borrow().render_queue();
        match queue {
            RenderQueue::Forward => self.forward.push(command),
            RenderQueue::Deferred => self.deferred.push(command),
        }
    }

    /// Empty every bucket, keeping the allocations
    pub fn clear(&mut self) {
        self.forward.clear();
        self.deferred.clear();
    }

    /// Order each bucket by shader, then texture, then material
    ///
    /// Stable: commands with equal keys keep submission order.
    pub fn sort(&mut self) {
        for bucket in [&mut self.forward, &mut self.deferred] {
            bucket.sort_by_cached_key(|command| command.sort_key());
        }
    }

    /// Forward bucket, optionally culled against `camera`
    ///
    /// Culling only applies when a camera is given.
    pub fn forward_commands(&self, cull: bool, camera: Option<&Camera>) -> Vec<&RenderCommand> {
        Self::collect(&self.forward, cull, camera)
    }

    /// Deferred bucket, optionally culled against `camera`
    pub fn deferred_commands(&self, cull: bool, camera: Option<&Camera>) -> Vec<&RenderCommand> {
        Self::collect(&self.deferred, cull, camera)
    }

    pub fn len(&self) -> usize {
        self.forward.len() + self.deferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn collect<'a>(bucket: &'a [RenderCommand], cull: bool, camera: Option<&Camera>) -> Vec<&'a RenderCommand> {
        match (cull, camera) {
            (true, Some(camera)) => bucket.iter().filter(|c| c.is_visible(camera)).collect(),
            _ => bucket.iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "command_buffer_tests.rs"]
mod tests;
