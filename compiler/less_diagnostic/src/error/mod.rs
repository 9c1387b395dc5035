use std::fmt;

/// Category of a surfaced error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Unresolvable or self-referential names.
    Name,
    /// Failures while evaluating calls, operations and mixin dispatch.
    Runtime,
    /// Malformed values found while producing output.
    Syntax,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Name => "Name",
            ErrorKind::Runtime => "Runtime",
            ErrorKind::Syntax => "Syntax",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An evaluation error with its source location.
///
/// `filename` and `index` are attached by the node that raised or first saw
/// the error; inner layers leave them unset so the outermost node with a
/// location wins. `line` and `column` are 1-based and only present when the
/// source contents were available.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LessError {
    pub kind: ErrorKind,
    pub message: String,
    pub filename: Option<String>,
    pub index: Option<usize>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl LessError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        LessError {
            kind,
            message: message.into(),
            filename: None,
            index: None,
            line: None,
            column: None,
        }
    }

    pub fn name(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Name, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Runtime, message)
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    /// Attach a location unless one is already present.
    #[must_use]
    pub fn at(mut self, filename: Option<&str>, index: Option<usize>) -> Self {
        if self.filename.is_none() {
            self.filename = filename.map(str::to_string);
        }
        if self.index.is_none() {
            self.index = index;
        }
        self
    }

    #[must_use]
    pub fn with_line_column(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn has_line_column(&self) -> bool {
        self.line.is_some() && self.column.is_some()
    }
}

impl fmt::Display for LessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Error: {}", self.kind, self.message)?;
        if let Some(filename) = self.filename.as_deref().filter(|name| !name.is_empty()) {
            write!(f, " in {filename}")?;
        }
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, " on line {line}, column {column}"),
            _ => Ok(()),
        }
    }
}

impl std::error::Error for LessError {}

#[cfg(test)]
mod tests;
