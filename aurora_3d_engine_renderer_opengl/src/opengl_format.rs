/// Conversions from engine enums to OpenGL enums
///
/// Pure functions, no context required.

use aurora_3d_engine::aurora3d::render::{
    AttachmentType, BufferType, BufferUsage, ClearFlags, Format, PrimitiveType, TextureFilter,
    TextureWrap,
};

/// Minimum desktop version the backend runs on
pub const MIN_GL_VERSION: (u32, u32) = (3, 3);

/// Minimum OpenGL ES version the backend runs on
pub const MIN_GLES_VERSION: (u32, u32) = (3, 0);

/// (internal format, pixel format, pixel type) for `tex_image_2d`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlTextureFormat {
    pub internal_format: i32,
    pub format: u32,
    pub data_type: u32,
}

/// Arguments of `vertex_attrib_pointer_*` for one attribute format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlVertexFormat {
    pub size: i32,
    pub data_type: u32,
    pub normalized: bool,
    /// Fed to the shader as integers (`vertex_attrib_pointer_i32`)
    pub integer: bool,
}

/// True if the reported context version is usable
pub fn is_supported_version(major: u32, minor: u32, is_embedded: bool) -> bool {
    let required = if is_embedded { MIN_GLES_VERSION } else { MIN_GL_VERSION };
    (major, minor) >= required
}

/// Texture upload format, `None` for block-compressed formats
pub fn texture_format(format: Format) -> Option<GlTextureFormat> {
    use Format::*;
    let (internal_format, format, data_type) = match format {
        R8_UNORM => (glow::R8, glow::RED, glow::UNSIGNED_BYTE),
        R8_SNORM => (glow::R8_SNORM, glow::RED, glow::BYTE),
        R8_UINT => (glow::R8UI, glow::RED_INTEGER, glow::UNSIGNED_BYTE),
        R8_SINT => (glow::R8I, glow::RED_INTEGER, glow::BYTE),
        R8G8_UNORM => (glow::RG8, glow::RG, glow::UNSIGNED_BYTE),
        R8G8_SNORM => (glow::RG8_SNORM, glow::RG, glow::BYTE),
        R8G8_UINT => (glow::RG8UI, glow::RG_INTEGER, glow::UNSIGNED_BYTE),
        R8G8_SINT => (glow::RG8I, glow::RG_INTEGER, glow::BYTE),
        R8G8B8_UNORM => (glow::RGB8, glow::RGB, glow::UNSIGNED_BYTE),
        R8G8B8_SNORM => (glow::RGB8_SNORM, glow::RGB, glow::BYTE),
        R8G8B8_SRGB => (glow::SRGB8, glow::RGB, glow::UNSIGNED_BYTE),
        R8G8B8A8_UNORM => (glow::RGBA8, glow::RGBA, glow::UNSIGNED_BYTE),
        R8G8B8A8_SNORM => (glow::RGBA8_SNORM, glow::RGBA, glow::BYTE),
        R8G8B8A8_UINT => (glow::RGBA8UI, glow::RGBA_INTEGER, glow::UNSIGNED_BYTE),
        R8G8B8A8_SINT => (glow::RGBA8I, glow::RGBA_INTEGER, glow::BYTE),
        R8G8B8A8_SRGB => (glow::SRGB8_ALPHA8, glow::RGBA, glow::UNSIGNED_BYTE),
        B8G8R8A8_UNORM => (glow::RGBA8, glow::BGRA, glow::UNSIGNED_BYTE),
        B8G8R8A8_SRGB => (glow::SRGB8_ALPHA8, glow::BGRA, glow::UNSIGNED_BYTE),
        R16_UNORM => (glow::R16, glow::RED, glow::UNSIGNED_SHORT),
        R16_UINT => (glow::R16UI, glow::RED_INTEGER, glow::UNSIGNED_SHORT),
        R16_SINT => (glow::R16I, glow::RED_INTEGER, glow::SHORT),
        R16_FLOAT => (glow::R16F, glow::RED, glow::HALF_FLOAT),
        R16G16_UNORM => (glow::RG16, glow::RG, glow::UNSIGNED_SHORT),
        R16G16_FLOAT => (glow::RG16F, glow::RG, glow::HALF_FLOAT),
        R16G16B16A16_UNORM => (glow::RGBA16, glow::RGBA, glow::UNSIGNED_SHORT),
        R16G16B16A16_FLOAT => (glow::RGBA16F, glow::RGBA, glow::HALF_FLOAT),
        R32_UINT => (glow::R32UI, glow::RED_INTEGER, glow::UNSIGNED_INT),
        R32_SINT => (glow::R32I, glow::RED_INTEGER, glow::INT),
        R32_FLOAT => (glow::R32F, glow::RED, glow::FLOAT),
        R32G32_UINT => (glow::RG32UI, glow::RG_INTEGER, glow::UNSIGNED_INT),
        R32G32_SINT => (glow::RG32I, glow::RG_INTEGER, glow::INT),
        R32G32_FLOAT => (glow::RG32F, glow::RG, glow::FLOAT),
        R32G32B32_UINT => (glow::RGB32UI, glow::RGB_INTEGER, glow::UNSIGNED_INT),
        R32G32B32_SINT => (glow::RGB32I, glow::RGB_INTEGER, glow::INT),
        R32G32B32_FLOAT => (glow::RGB32F, glow::RGB, glow::FLOAT),
        R32G32B32A32_UINT => (glow::RGBA32UI, glow::RGBA_INTEGER, glow::UNSIGNED_INT),
        R32G32B32A32_SINT => (glow::RGBA32I, glow::RGBA_INTEGER, glow::INT),
        R32G32B32A32_FLOAT => (glow::RGBA32F, glow::RGBA, glow::FLOAT),
        D16_UNORM => (glow::DEPTH_COMPONENT16, glow::DEPTH_COMPONENT, glow::UNSIGNED_SHORT),
        D24_UNORM_S8_UINT => (glow::DEPTH24_STENCIL8, glow::DEPTH_STENCIL, glow::UNSIGNED_INT_24_8),
        D32_FLOAT => (glow::DEPTH_COMPONENT32F, glow::DEPTH_COMPONENT, glow::FLOAT),
        D32_FLOAT_S8X24_UINT => (
            glow::DEPTH32F_STENCIL8,
            glow::DEPTH_STENCIL,
            glow::FLOAT_32_UNSIGNED_INT_24_8_REV,
        ),
        S8_UINT => (glow::STENCIL_INDEX8, glow::STENCIL_INDEX, glow::UNSIGNED_BYTE),
        BC1_UNORM | BC1_SRGB | BC3_UNORM | BC3_SRGB | BC5_UNORM | BC6H_UF16 | BC7_UNORM
        | BC7_SRGB => return None,
    };
    Some(GlTextureFormat {
        internal_format: internal_format as i32,
        format,
        data_type,
    })
}

/// Vertex attribute format, `None` for formats a vertex fetch cannot read
pub fn vertex_format(format: Format) -> Option<GlVertexFormat> {
    use Format::*;
    let (data_type, normalized, integer) = match format {
        R8_UNORM | R8G8_UNORM | R8G8B8_UNORM | R8G8B8A8_UNORM | R8G8B8_SRGB | R8G8B8A8_SRGB => {
            (glow::UNSIGNED_BYTE, true, false)
        }
        R8_SNORM | R8G8_SNORM | R8G8B8_SNORM | R8G8B8A8_SNORM => (glow::BYTE, true, false),
        R8_UINT | R8G8_UINT | R8G8B8A8_UINT => (glow::UNSIGNED_BYTE, false, true),
        R8_SINT | R8G8_SINT | R8G8B8A8_SINT => (glow::BYTE, false, true),
        R16_UNORM | R16G16_UNORM | R16G16B16A16_UNORM => (glow::UNSIGNED_SHORT, true, false),
        R16_UINT => (glow::UNSIGNED_SHORT, false, true),
        R16_SINT => (glow::SHORT, false, true),
        R16_FLOAT | R16G16_FLOAT | R16G16B16A16_FLOAT => (glow::HALF_FLOAT, false, false),
        R32_UINT | R32G32_UINT | R32G32B32_UINT | R32G32B32A32_UINT => (glow::UNSIGNED_INT, false, true),
        R32_SINT | R32G32_SINT | R32G32B32_SINT | R32G32B32A32_SINT => (glow::INT, false, true),
        R32_FLOAT | R32G32_FLOAT | R32G32B32_FLOAT | R32G32B32A32_FLOAT => (glow::FLOAT, false, false),
        _ => return None,
    };
    Some(GlVertexFormat {
        size: format.component_count() as i32,
        data_type,
        normalized,
        integer,
    })
}

pub fn primitive_mode(primitive: PrimitiveType) -> u32 {
    match primitive {
        PrimitiveType::Triangles => glow::TRIANGLES,
        PrimitiveType::TriangleStrip => glow::TRIANGLE_STRIP,
        PrimitiveType::Lines => glow::LINES,
        PrimitiveType::LineStrip => glow::LINE_STRIP,
        PrimitiveType::Points => glow::POINTS,
    }
}

/// Minification filter, picking the mipmapped variant when a mip chain exists
pub fn min_filter(filter: TextureFilter, mipmapped: bool) -> i32 {
    let value = match (filter, mipmapped) {
        (TextureFilter::Nearest, false) => glow::NEAREST,
        (TextureFilter::Linear, false) => glow::LINEAR,
        (TextureFilter::Nearest, true) => glow::NEAREST_MIPMAP_NEAREST,
        (TextureFilter::Linear, true) => glow::LINEAR_MIPMAP_LINEAR,
    };
    value as i32
}

pub fn mag_filter(filter: TextureFilter) -> i32 {
    let value = match filter {
        TextureFilter::Nearest => glow::NEAREST,
        TextureFilter::Linear => glow::LINEAR,
    };
    value as i32
}

pub fn wrap_mode(wrap: TextureWrap) -> i32 {
    let value = match wrap {
        TextureWrap::Repeat => glow::REPEAT,
        TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE,
        TextureWrap::ClampToBorder => glow::CLAMP_TO_BORDER,
    };
    value as i32
}

pub fn buffer_target(buffer_type: BufferType) -> u32 {
    match buffer_type {
        BufferType::Vertex => glow::ARRAY_BUFFER,
        BufferType::Index => glow::ELEMENT_ARRAY_BUFFER,
        BufferType::Uniform => glow::UNIFORM_BUFFER,
        BufferType::ShaderStorage => glow::SHADER_STORAGE_BUFFER,
    }
}

pub fn buffer_usage(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::Static => glow::STATIC_DRAW,
        BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
        BufferUsage::Stream => glow::STREAM_DRAW,
    }
}

/// Framebuffer attachment point; `color_index` is only used for color
pub fn attachment_point(attachment_type: AttachmentType, color_index: u32) -> u32 {
    match attachment_type {
        AttachmentType::Color => glow::COLOR_ATTACHMENT0 + color_index,
        AttachmentType::Depth => glow::DEPTH_ATTACHMENT,
        AttachmentType::Stencil => glow::STENCIL_ATTACHMENT,
        AttachmentType::DepthStencil => glow::DEPTH_STENCIL_ATTACHMENT,
    }
}

pub fn clear_mask(flags: ClearFlags) -> u32 {
    let mut mask = 0;
    if flags.contains(ClearFlags::COLOR) {
        mask |= glow::COLOR_BUFFER_BIT;
    }
    if flags.contains(ClearFlags::DEPTH) {
        mask |= glow::DEPTH_BUFFER_BIT;
    }
    if flags.contains(ClearFlags::STENCIL) {
        mask |= glow::STENCIL_BUFFER_BIT;
    }
    mask
}

/// Readable name of a `check_framebuffer_status` result
pub fn framebuffer_status_name(status: u32) -> &'static str {
    match status {
        glow::FRAMEBUFFER_COMPLETE => "complete",
        glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => "incomplete attachment",
        glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => "missing attachment",
        glow::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => "incomplete draw buffer",
        glow::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => "incomplete read buffer",
        glow::FRAMEBUFFER_UNSUPPORTED => "unsupported",
        glow::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => "incomplete multisample",
        _ => "unknown status",
    }
}

/// Readable name of a `get_error` code
pub fn gl_error_name(code: u32) -> &'static str {
    match code {
        glow::NO_ERROR => "no error",
        glow::INVALID_ENUM => "invalid enum",
        glow::INVALID_VALUE => "invalid value",
        glow::INVALID_OPERATION => "invalid operation",
        glow::INVALID_FRAMEBUFFER_OPERATION => "invalid framebuffer operation",
        glow::OUT_OF_MEMORY => "out of memory",
        glow::STACK_UNDERFLOW => "stack underflow",
        glow::STACK_OVERFLOW => "stack overflow",
        _ => "unknown error",
    }
}

#[cfg(test)]
#[path = "opengl_format_tests.rs"]
mod tests;
