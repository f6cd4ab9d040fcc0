/// Conversion pipeline module
///
/// This module handles everything between "Convert" and files on disk:
/// - Decode, resize and WebP encode steps (codec.rs)
/// - Output filename derivation (naming.rs)
/// - The sequential per-run orchestration (pipeline.rs)

pub mod codec;
pub mod naming;
pub mod pipeline;

/// Encoder quality on libwebp's 0 to 100 scale (0.8 of full quality)
pub const WEBP_QUALITY: f32 = 80.0;

/// Target width applied to a run when the user has not changed the field
pub const DEFAULT_TARGET_WIDTH: u32 = 800;
