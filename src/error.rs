use thiserror::Error;
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    #[error("sample at index {index} does not advance time past {previous}")]
    NonMonotonicTime { index: usize, previous: f32 },
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to render trace: {0}")]
    Render(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for SignalError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        SignalError::Render(format!("{value:?}"))
    }
}
impl From<image::ImageError> for SignalError {
    fn from(value: image::ImageError) -> Self {
        SignalError::Render(value.to_string())
    }
}
