use miette::Diagnostic;
use thiserror::Error;

/// Main error type for chromavive operations
#[derive(Error, Diagnostic, Debug)]
pub enum ChromaError {
    #[error("IO error: {0}")]
    #[diagnostic(code(chromavive::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(chromavive::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Could not decode {path}: {message}")]
    #[diagnostic(
        code(chromavive::decode),
        help("The input must be a raster image the decoder understands (PNG, JPEG, GIF, WebP, ...)")
    )]
    Decode {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Invalid dimensions {width}x{height}")]
    #[diagnostic(
        code(chromavive::dimension),
        help("Width, height and render limit must all be at least 1")
    )]
    InvalidDimension { width: u32, height: u32 },

    #[error("Colour component {component} is out of range: {value}")]
    #[diagnostic(
        code(chromavive::colour),
        help("Each of r, g and b must be between 0 and 255")
    )]
    InvalidColorComponent { component: char, value: i64 },

    #[error("Intensity is out of range: {value}")]
    #[diagnostic(
        code(chromavive::intensity),
        help("Use a value between 0 and 1, or a percentage such as 40%")
    )]
    InvalidIntensity { value: f64 },

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    #[diagnostic(code(chromavive::buffer))]
    BufferLengthMismatch { expected: usize, actual: usize },

    #[error("Parse error: {message}")]
    #[diagnostic(code(chromavive::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Watch error: {message}")]
    #[diagnostic(code(chromavive::watch))]
    Watch { message: String },
}

pub type Result<T> = std::result::Result<T, ChromaError>;
