pub mod leftover_detector;
pub mod mask;
pub mod pixel;
pub mod scoring;
