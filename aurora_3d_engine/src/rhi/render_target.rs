/// Render target trait, attachments and completeness rules

use std::rc::Rc;
use crate::error::{Error, Result};
use super::texture::Texture;

/// Attachment slot of a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttachmentType {
    Color,
    Depth,
    Stencil,
    DepthStencil,
}

/// A texture attached to a render target
///
/// The target keeps a shared handle; the texture may be attached to
/// several targets or sampled by materials at the same time.
#[derive(Clone)]
pub struct Attachment {
    pub texture: Rc<dyn Texture>,
    pub mip_level: u32,
    /// Array layer (0 for plain 2D textures)
    pub layer: u32,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("texture", &self.texture.handle())
            .field("mip_level", &self.mip_level)
            .field("layer", &self.layer)
            .finish()
    }
}

/// Descriptor for creating a render target
#[derive(Debug, Clone, Copy)]
pub struct RenderTargetDesc {
    pub width: u32,
    pub height: u32,
    /// MSAA sample count (1 = no multisampling)
    pub samples: u32,
    /// A depth (or depth-stencil) attachment is needed for completeness
    pub depth_required: bool,
}

impl RenderTargetDesc {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            samples: 1,
            depth_required: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidResource(format!(
                "Render target dimensions must be non-zero (got {}x{})",
                self.width, self.height
            )));
        }
        if self.samples == 0 || !self.samples.is_power_of_two() {
            return Err(Error::InvalidResource(format!(
                "Render target sample count must be a power of two (got {})",
                self.samples
            )));
        }
        Ok(())
    }
}

/// Size of `extent` at `mip_level`, 0 past the end of the chain
fn mip_extent(extent: u32, mip_level: u32) -> u32 {
    extent.checked_shr(mip_level).unwrap_or(0)
}

/// Backend-independent attachment bookkeeping
///
/// Color attachments form an ordered list (draw buffer 0, 1, ...); the
/// other slots hold at most one texture each.
#[derive(Debug, Clone, Default)]
pub struct AttachmentSet {
    colors: Vec<Attachment>,
    depth: Option<Attachment>,
    stencil: Option<Attachment>,
    depth_stencil: Option<Attachment>,
}

impl AttachmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an attachment, returning the color index for color slots
    ///
    /// The texture format must match the slot (color format for Color,
    /// depth format for Depth, ...) and `mip_level` must exist in the
    /// texture's full mip chain.
    pub fn attach(&mut self, attachment_type: AttachmentType, attachment: Attachment) -> Result<Option<usize>> {
        let format = attachment.texture.format();
        let compatible = match attachment_type {
            AttachmentType::Color => format.is_color() && !format.is_compressed(),
            AttachmentType::Depth => format.is_depth(),
            AttachmentType::Stencil => format.has_stencil(),
            AttachmentType::DepthStencil => format.is_depth() && format.has_stencil(),
        };
        if !compatible {
            return Err(Error::InvalidResource(format!(
                "Format {:?} cannot be attached as {:?}",
                format, attachment_type
            )));
        }
        let texture = &attachment.texture;
        if mip_extent(texture.width().max(texture.height()), attachment.mip_level) == 0 {
            return Err(Error::InvalidResource(format!(
                "Mip level {} is outside the mip chain of a {}x{} texture",
                attachment.mip_level,
                texture.width(),
                texture.height()
            )));
        }

        match attachment_type {
            AttachmentType::Color => {
                self.colors.push(attachment);
                Ok(Some(self.colors.len() - 1))
            }
            AttachmentType::Depth => {
                self.depth = Some(attachment);
                Ok(None)
            }
            AttachmentType::Stencil => {
                self.stencil = Some(attachment);
                Ok(None)
            }
            AttachmentType::DepthStencil => {
                self.depth_stencil = Some(attachment);
                Ok(None)
            }
        }
    }

    /// Remove a slot; detaching Color removes every color attachment
    ///
    /// Returns the number of attachments removed.
    pub fn detach(&mut self, attachment_type: AttachmentType) -> usize {
        match attachment_type {
            AttachmentType::Color => {
                let count = self.colors.len();
                self.colors.clear();
                count
            }
            AttachmentType::Depth => self.depth.take().map_or(0, |_| 1),
            AttachmentType::Stencil => self.stencil.take().map_or(0, |_| 1),
            AttachmentType::DepthStencil => self.depth_stencil.take().map_or(0, |_| 1),
        }
    }

    /// First attachment of a slot
    pub fn get(&self, attachment_type: AttachmentType) -> Option<&Attachment> {
        match attachment_type {
            AttachmentType::Color => self.colors.first(),
            AttachmentType::Depth => self.depth.as_ref(),
            AttachmentType::Stencil => self.stencil.as_ref(),
            AttachmentType::DepthStencil => self.depth_stencil.as_ref(),
        }
    }

    pub fn colors(&self) -> &[Attachment] {
        &self.colors
    }

    pub fn has_depth(&self) -> bool {
        self.depth.is_some() || self.depth_stencil.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
            && self.depth.is_none()
            && self.stencil.is_none()
            && self.depth_stencil.is_none()
    }

    /// Attachments in binding order: colors first, then depth, stencil, depth-stencil
    pub fn iter(&self) -> impl Iterator<Item = (AttachmentType, &Attachment)> {
        self.colors
            .iter()
            .map(|a| (AttachmentType::Color, a))
            .chain(self.depth.iter().map(|a| (AttachmentType::Depth, a)))
            .chain(self.stencil.iter().map(|a| (AttachmentType::Stencil, a)))
            .chain(self.depth_stencil.iter().map(|a| (AttachmentType::DepthStencil, a)))
    }

    /// Completeness check shared by every backend
    ///
    /// Complete when at least one attachment exists, every attachment
    /// covers the target size, and a depth slot is filled when required.
    pub fn is_complete(&self, width: u32, height: u32, depth_required: bool) -> bool {
        if self.is_empty() {
            return false;
        }
        if depth_required && !self.has_depth() {
            return false;
        }
        self.iter().all(|(_, a)| {
            let w = mip_extent(a.texture.width(), a.mip_level).max(1);
            let h = mip_extent(a.texture.height(), a.mip_level).max(1);
            w == width && h == height
        })
    }
}

/// Off-screen framebuffer
///
/// Methods take `&self`; targets are shared between the render path and
/// its passes as `Rc<dyn RenderTarget>`.
pub trait RenderTarget {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn sample_count(&self) -> u32;

    fn is_multisampled(&self) -> bool {
        self.sample_count() > 1
    }

    /// Backend framebuffer name (opaque to engine code)
    fn handle(&self) -> u64;

    /// Attach `texture` to a slot. Color attachments append to the list.
    fn attach_texture(
        &self,
        attachment_type: AttachmentType,
        texture: Rc<dyn Texture>,
        mip_level: u32,
        layer: u32,
    ) -> Result<()>;

    /// Clear a slot (all color attachments for Color)
    fn detach_texture(&self, attachment_type: AttachmentType);

    fn attachment(&self, attachment_type: AttachmentType) -> Option<Rc<dyn Texture>>;

    fn color_attachments(&self) -> Vec<Rc<dyn Texture>>;

    /// Require a depth attachment for completeness (set by passes that depth-test)
    fn set_depth_required(&self, required: bool);

    fn depth_required(&self) -> bool;

    /// True when the target can be bound for drawing
    fn is_complete(&self) -> bool;
}

#[cfg(test)]
#[path = "render_target_tests.rs"]
mod tests;
