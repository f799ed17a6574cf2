//! Layer file decoding.

/// Extension-selected PNG/JPEG decoding into premultiplied RGBA8.
pub mod decode;
