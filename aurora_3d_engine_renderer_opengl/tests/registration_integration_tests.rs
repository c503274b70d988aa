//! Integration tests for backend registration
//!
//! No GL context is created: the loader is never called until a device
//! is requested from the coordinator.

use std::cell::Cell;
use std::ffi::c_void;
use std::rc::Rc;
use aurora_3d_engine::aurora3d::render::{DeviceCoordinator, GraphicsApi};
use aurora_3d_engine_renderer_opengl::{is_supported_version, register, MIN_GLES_VERSION, MIN_GL_VERSION};

#[test]
fn test_register_makes_opengl_available() {
    let mut coordinator = DeviceCoordinator::new();
    assert!(!coordinator.is_registered(GraphicsApi::OpenGL));

    register(&mut coordinator, Rc::new(|_name: &str| std::ptr::null::<c_void>()));

    assert!(coordinator.is_registered(GraphicsApi::OpenGL));
    assert_eq!(coordinator.available_apis(), vec![GraphicsApi::OpenGL]);
}

#[test]
fn test_register_does_not_load_entry_points() {
    let calls = Rc::new(Cell::new(0u32));
    let counter = calls.clone();

    let mut coordinator = DeviceCoordinator::new();
    register(
        &mut coordinator,
        Rc::new(move |_name: &str| {
            counter.set(counter.get() + 1);
            std::ptr::null::<c_void>()
        }),
    );

    assert_eq!(calls.get(), 0);
}

#[test]
fn test_minimum_versions_are_supported() {
    assert!(is_supported_version(MIN_GL_VERSION.0, MIN_GL_VERSION.1, false));
    assert!(is_supported_version(MIN_GLES_VERSION.0, MIN_GLES_VERSION.1, true));
    assert!(!is_supported_version(2, 1, false));
}
