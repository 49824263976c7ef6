use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty id field, ignored id field, etc.).
    ConfigValidation(String),
    /// A reference line is not a JSON object.
    LineParse { line: u64, message: String },
    /// A reference record has no usable identifier.
    MissingIdentifier { line: u64, field: String },
    /// IO error while reading the reference source.
    Io(String),
    /// The report sink rejected an entry (closed pipe, full disk, ...).
    Sink(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::LineParse { line, message } => {
                write!(f, "line {line}: invalid JSON record: {message}")
            }
            Self::MissingIdentifier { line, field } => {
                write!(f, "line {line}: no identifier in field '{field}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Sink(msg) => write!(f, "report output error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

impl From<std::io::Error> for ReconError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
