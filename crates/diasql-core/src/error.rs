use thiserror::Error;

/// Core error type for diagram parsing and schema resolution.
#[derive(Debug, Error)]
pub enum Error {
    /// The diagram bytes are not valid UTF-8.
    #[error("diagram is not valid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// The diagram is not well-formed XML.
    #[error("xml error: {0}")]
    Xml(String),
    /// A reference connector names a table id that does not exist.
    #[error("unresolved reference: connector {end} points to unknown table id '{id}'")]
    UnresolvedReference { end: &'static str, id: String },
    /// A boolean property holds something other than `true`/`false`.
    #[error("invalid boolean for property '{property}': '{value}'")]
    InvalidBoolean { property: String, value: String },
    /// Two table objects share the same diagram id.
    #[error("duplicate table id: {0}")]
    DuplicateTableId(String),
    /// The diagram graph is missing structure the model requires.
    #[error("malformed diagram: {0}")]
    MalformedDiagram(String),
}

impl From<roxmltree::Error> for Error {
    fn from(value: roxmltree::Error) -> Self {
        Error::Xml(value.to_string())
    }
}

/// Convenience alias for results returned by diasql crates.
pub type Result<T> = std::result::Result<T, Error>;
