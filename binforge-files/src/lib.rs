use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("The file is violating the expected format, because: {reason}")]
    FormatError { reason: &'static str },

    #[error("Malformed number in line {line}: {token}")]
    MalformedNumber { line: usize, token: String },

    /// Represents an empty source. For example, an OBJ file without any
    /// face definitions being given to the STL exporter.
    #[error("Source contains no data")]
    EmptySource,

    #[error("Face index {index} is out of bounds in line {line}")]
    IndexOutOfBounds { index: i64, line: usize },

    /// Represents all cases of `std::io::Error`.
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    UTF8ConversationError(#[from] std::string::FromUtf8Error),
}

pub mod common;
pub mod obj;
pub mod stl;
