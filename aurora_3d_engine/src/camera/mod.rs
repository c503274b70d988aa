//! Camera module: camera matrices, view frustum and bounding boxes.

mod aabb;
mod camera;
mod frustum;

pub use aabb::AABB;
pub use camera::Camera;
pub use frustum::Frustum;
