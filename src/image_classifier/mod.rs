pub mod impl_fake;
pub mod impl_tract_onnx;
pub mod interface;
pub mod loader;
pub mod model_config;
pub mod pixel_buffer;
