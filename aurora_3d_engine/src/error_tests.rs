//! Unit tests for error.rs
//!
//! Tests all Error variants, their trait implementations and the bail/err macros.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("glCompileShader failed".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("glCompileShader failed"));
}

#[test]
fn test_out_of_memory_display() {
    let err = Error::OutOfMemory;
    assert_eq!(format!("{}", err), "Out of GPU memory");
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("Vertex stride is zero".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid resource"));
    assert!(display.contains("Vertex stride is zero"));
}

#[test]
fn test_initialization_failed_display() {
    let err = Error::InitializationFailed("OpenGL 3.3 required".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Initialization failed"));
    assert!(display.contains("OpenGL 3.3 required"));
}

#[test]
fn test_invalid_state_display() {
    let err = Error::InvalidState("Buffer already mapped".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid state"));
    assert!(display.contains("Buffer already mapped"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    assert!(format!("{:?}", Error::BackendError("x".to_string())).contains("BackendError"));
    assert!(format!("{:?}", Error::OutOfMemory).contains("OutOfMemory"));
    assert!(format!("{:?}", Error::InvalidResource("x".to_string())).contains("InvalidResource"));
    assert!(format!("{:?}", Error::InvalidState("x".to_string())).contains("InvalidState"));
}

#[test]
fn test_error_clone_and_eq() {
    let err1 = Error::InitializationFailed("init".to_string());
    let err2 = err1.clone();
    assert_eq!(err1, err2);
    assert_ne!(err1, Error::OutOfMemory);
}

// ============================================================================
// RESULT TYPE / PROPAGATION
// ============================================================================

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::OutOfMemory)
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    assert_eq!(outer(), Err(Error::OutOfMemory));
}

// ============================================================================
// MACROS
// ============================================================================

#[test]
fn test_engine_bail_returns_backend_error() {
    fn fails(value: u32) -> Result<u32> {
        if value > 10 {
            crate::engine_bail!("aurora3d::tests", "Value {} too large", value);
        }
        Ok(value)
    }

    assert_eq!(fails(3), Ok(3));
    assert_eq!(
        fails(42),
        Err(Error::BackendError("Value 42 too large".to_string()))
    );
}

#[test]
fn test_engine_err_produces_value() {
    let err = crate::engine_err!("aurora3d::tests", "Missing {}", "shader");
    assert_eq!(err, Error::BackendError("Missing shader".to_string()));
}
