//! In-memory RGB images and the `image`-crate codec adapter.

pub mod codec;
pub mod frame;
