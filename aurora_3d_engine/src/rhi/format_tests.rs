use super::*;

#[test]
fn test_bytes_per_pixel_common_formats() {
    assert_eq!(Format::R8_UNORM.bytes_per_pixel(), 1);
    assert_eq!(Format::R8G8B8_UNORM.bytes_per_pixel(), 3);
    assert_eq!(Format::R8G8B8A8_SRGB.bytes_per_pixel(), 4);
    assert_eq!(Format::R16G16B16A16_FLOAT.bytes_per_pixel(), 8);
    assert_eq!(Format::R32G32B32_FLOAT.bytes_per_pixel(), 12);
    assert_eq!(Format::R32G32B32A32_FLOAT.bytes_per_pixel(), 16);
    assert_eq!(Format::D24_UNORM_S8_UINT.bytes_per_pixel(), 4);
}

#[test]
fn test_compressed_formats_have_no_pixel_size() {
    assert!(Format::BC1_UNORM.is_compressed());
    assert!(Format::BC7_SRGB.is_compressed());
    assert!(!Format::R8G8B8A8_UNORM.is_compressed());
}

#[test]
fn test_component_count_for_vertex_formats() {
    assert_eq!(Format::R32_FLOAT.component_count(), 1);
    assert_eq!(Format::R32G32_FLOAT.component_count(), 2);
    assert_eq!(Format::R32G32B32_FLOAT.component_count(), 3);
    assert_eq!(Format::R8G8B8A8_UNORM.component_count(), 4);
}

#[test]
fn test_depth_and_stencil_classification() {
    assert!(Format::D32_FLOAT.is_depth());
    assert!(!Format::D32_FLOAT.has_stencil());
    assert!(Format::D24_UNORM_S8_UINT.is_depth());
    assert!(Format::D24_UNORM_S8_UINT.has_stencil());
    assert!(Format::S8_UINT.has_stencil());
    assert!(!Format::S8_UINT.is_depth());
    assert!(!Format::S8_UINT.is_color());
    assert!(Format::R8G8B8A8_UNORM.is_color());
}

#[test]
fn test_hdr_formats() {
    assert!(Format::R16G16B16A16_FLOAT.is_hdr());
    assert!(Format::R32G32B32A32_FLOAT.is_hdr());
    assert!(!Format::R8G8B8A8_UNORM.is_hdr());
    assert!(!Format::R8G8B8A8_SRGB.is_hdr());
    assert!(Format::R8G8B8A8_SRGB.is_srgb());
}
