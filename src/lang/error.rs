use super::Column;

pub struct Error {
    code: ErrorCode,
    column: Column,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_column($col)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, ..$col:expr;  $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_column($col)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            column: 0..0,
            message: String::new(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn column(&self) -> Column {
        self.column.clone()
    }

    /// Everything except the infinite-length signal aborts a run.
    pub fn is_fatal(&self) -> bool {
        self.code != ErrorCode::Infinite
    }

    pub fn in_column(self, column: &Column) -> Error {
        Error {
            column: column.clone(),
            ..self
        }
    }

    /// Attach a column only if none has been recorded closer to the fault.
    pub fn or_column(self, column: &Column) -> Error {
        if self.column == (0..0) {
            self.in_column(column)
        } else {
            self
        }
    }

    /// Move a recorded column from slice-relative to absolute.
    pub fn shifted(self, offset: usize) -> Error {
        if self.column == (0..0) {
            return self;
        }
        let column = self.column.start + offset..self.column.end + offset;
        Error { column, ..self }
    }

    pub fn message(self, message: &str) -> Error {
        debug_assert!(self.message.is_empty());
        Error {
            message: message.to_string(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    SyntaxError = 1,
    ValueError = 2,
    TypeError = 3,
    Underflow = 4,
    Infinite = 5,
    Interrupted = 6,
    InternalError = 51,
    FileNotFound = 53,
    IoError = 57,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ErrorCode::*;
        let code_str = match self.code {
            SyntaxError => "SYNTAX ERROR",
            ValueError => "VALUE ERROR",
            TypeError => "TYPE ERROR",
            Underflow => "UNDERFLOW",
            Infinite => "INFINITE LENGTH",
            Interrupted => "INTERRUPTED",
            InternalError => "INTERNAL ERROR",
            FileNotFound => "FILE NOT FOUND",
            IoError => "I/O ERROR",
        };
        let mut suffix = String::new();
        if (0..0) != self.column {
            suffix.push_str(&format!(" AT {}..{}", self.column.start, self.column.end));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        write!(f, "{}{}", code_str, suffix)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Error {
        let msg = error.to_string();
        match error.kind() {
            std::io::ErrorKind::NotFound => error!(FileNotFound; &msg),
            _ => error!(IoError; &msg),
        }
    }
}
