use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart surface is not mounted")]
    SurfaceNotMounted,

    #[error("chart surface has zero size ({width}x{height})")]
    SurfaceNotSized { width: u32, height: u32 },

    #[error("chart backend error: {0}")]
    Backend(String),
}
