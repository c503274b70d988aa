/// Pixel and vertex attribute formats shared by every backend.

/// Data layout of one texel or one vertex attribute element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Format {
    // 8-bit per channel
    R8_UNORM,
    R8_SNORM,
    R8_UINT,
    R8_SINT,
    R8G8_UNORM,
    R8G8_SNORM,
    R8G8_UINT,
    R8G8_SINT,
    R8G8B8_UNORM,
    R8G8B8_SNORM,
    R8G8B8A8_UNORM,
    R8G8B8A8_SNORM,
    R8G8B8A8_UINT,
    R8G8B8A8_SINT,
    R8G8B8A8_SRGB,
    R8G8B8_SRGB,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,

    // 16-bit per channel
    R16_UNORM,
    R16_UINT,
    R16_SINT,
    R16_FLOAT,
    R16G16_UNORM,
    R16G16_FLOAT,
    R16G16B16A16_UNORM,
    R16G16B16A16_FLOAT,

    // 32-bit per channel
    R32_UINT,
    R32_SINT,
    R32_FLOAT,
    R32G32_UINT,
    R32G32_SINT,
    R32G32_FLOAT,
    R32G32B32_UINT,
    R32G32B32_SINT,
    R32G32B32_FLOAT,
    R32G32B32A32_UINT,
    R32G32B32A32_SINT,
    R32G32B32A32_FLOAT,

    // Depth / stencil
    D16_UNORM,
    D24_UNORM_S8_UINT,
    D32_FLOAT,
    D32_FLOAT_S8X24_UINT,
    S8_UINT,

    // Block compressed
    BC1_UNORM,
    BC1_SRGB,
    BC3_UNORM,
    BC3_SRGB,
    BC5_UNORM,
    BC6H_UF16,
    BC7_UNORM,
    BC7_SRGB,
}

impl Format {
    /// Size of one element in bytes
    ///
    /// Block-compressed formats have no per-pixel size and return 0.
    pub fn bytes_per_pixel(&self) -> u32 {
        use Format::*;
        match self {
            R8_UNORM | R8_SNORM | R8_UINT | R8_SINT | S8_UINT => 1,
            R8G8_UNORM | R8G8_SNORM | R8G8_UINT | R8G8_SINT => 2,
            R16_UNORM | R16_UINT | R16_SINT | R16_FLOAT | D16_UNORM => 2,
            R8G8B8_UNORM | R8G8B8_SNORM | R8G8B8_SRGB => 3,
            R8G8B8A8_UNORM | R8G8B8A8_SNORM | R8G8B8A8_UINT | R8G8B8A8_SINT
            | R8G8B8A8_SRGB | B8G8R8A8_UNORM | B8G8R8A8_SRGB => 4,
            R16G16_UNORM | R16G16_FLOAT => 4,
            R32_UINT | R32_SINT | R32_FLOAT | D32_FLOAT | D24_UNORM_S8_UINT => 4,
            R16G16B16A16_UNORM | R16G16B16A16_FLOAT => 8,
            R32G32_UINT | R32G32_SINT | R32G32_FLOAT | D32_FLOAT_S8X24_UINT => 8,
            R32G32B32_UINT | R32G32B32_SINT | R32G32B32_FLOAT => 12,
            R32G32B32A32_UINT | R32G32B32A32_SINT | R32G32B32A32_FLOAT => 16,
            BC1_UNORM | BC1_SRGB | BC3_UNORM | BC3_SRGB | BC5_UNORM
            | BC6H_UF16 | BC7_UNORM | BC7_SRGB => 0,
        }
    }

    /// Number of channels (vertex attribute component count)
    pub fn component_count(&self) -> u32 {
        use Format::*;
        match self {
            R8_UNORM | R8_SNORM | R8_UINT | R8_SINT | R16_UNORM | R16_UINT | R16_SINT
            | R16_FLOAT | R32_UINT | R32_SINT | R32_FLOAT | D16_UNORM | D32_FLOAT
            | S8_UINT => 1,
            R8G8_UNORM | R8G8_SNORM | R8G8_UINT | R8G8_SINT | R16G16_UNORM | R16G16_FLOAT
            | R32G32_UINT | R32G32_SINT | R32G32_FLOAT | D24_UNORM_S8_UINT
            | D32_FLOAT_S8X24_UINT | BC5_UNORM => 2,
            R8G8B8_UNORM | R8G8B8_SNORM | R8G8B8_SRGB | R32G32B32_UINT | R32G32B32_SINT
            | R32G32B32_FLOAT | BC1_UNORM | BC1_SRGB | BC6H_UF16 => 3,
            R8G8B8A8_UNORM | R8G8B8A8_SNORM | R8G8B8A8_UINT | R8G8B8A8_SINT
            | R8G8B8A8_SRGB | B8G8R8A8_UNORM | B8G8R8A8_SRGB | R16G16B16A16_UNORM
            | R16G16B16A16_FLOAT | R32G32B32A32_UINT | R32G32B32A32_SINT
            | R32G32B32A32_FLOAT | BC3_UNORM | BC3_SRGB | BC7_UNORM | BC7_SRGB => 4,
        }
    }

    /// True for formats with a depth component
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            Format::D16_UNORM | Format::D24_UNORM_S8_UINT | Format::D32_FLOAT | Format::D32_FLOAT_S8X24_UINT
        )
    }

    /// True for formats with a stencil component
    pub fn has_stencil(&self) -> bool {
        matches!(
            self,
            Format::D24_UNORM_S8_UINT | Format::D32_FLOAT_S8X24_UINT | Format::S8_UINT
        )
    }

    /// True for color formats (neither depth nor stencil)
    pub fn is_color(&self) -> bool {
        !self.is_depth() && !self.has_stencil()
    }

    /// True for floating point color formats usable as HDR targets
    pub fn is_hdr(&self) -> bool {
        matches!(
            self,
            Format::R16_FLOAT
                | Format::R16G16_FLOAT
                | Format::R16G16B16A16_FLOAT
                | Format::R32_FLOAT
                | Format::R32G32_FLOAT
                | Format::R32G32B32_FLOAT
                | Format::R32G32B32A32_FLOAT
                | Format::BC6H_UF16
        )
    }

    pub fn is_srgb(&self) -> bool {
        matches!(
            self,
            Format::R8G8B8A8_SRGB
                | Format::R8G8B8_SRGB
                | Format::B8G8R8A8_SRGB
                | Format::BC1_SRGB
                | Format::BC3_SRGB
                | Format::BC7_SRGB
        )
    }

    pub fn is_compressed(&self) -> bool {
        self.bytes_per_pixel() == 0
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
