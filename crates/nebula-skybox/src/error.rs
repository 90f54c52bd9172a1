//! Skybox error types.

/// Errors from the offline skybox paths (software frames and cubemap bakes).
///
/// The per-pixel functions themselves cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum SkyboxError {
    /// The viewport has no pixels to render.
    #[error("viewport {width}x{height} has no pixels")]
    EmptyViewport { width: u32, height: u32 },

    /// The viewport exceeds [`crate::software::MAX_FRAME_DIMENSION`] on some axis.
    #[error("frame {width}x{height} exceeds the maximum frame size")]
    FrameTooLarge { width: u32, height: u32 },

    /// Cubemap faces must be between 1 and [`crate::cubemap::MAX_FACE_SIZE`] texels wide.
    #[error("invalid cubemap face size {0}")]
    InvalidFaceSize(u32),

    /// Failed to encode or write an image.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}
