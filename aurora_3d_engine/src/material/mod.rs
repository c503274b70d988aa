//! Material system
//!
//! Uniform values are a tagged enum (`UniformValue`); render passes switch
//! on the tag to pick the matching shader setter.

mod material;
mod uniform;

pub use material::{
    Material, MaterialType, RenderQueue, SharedMaterial, DEFAULT_COLOR, DEFAULT_SPECULAR,
};
pub use uniform::{SamplerType, SamplerUniform, UniformType, UniformValue};
