// ─── Error ──────────────────────────────────────────────────────────────────
use smol_str::SmolStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("wrong number of arguments (given {given}, expected {expected})")]
    WrongArgumentCount { given: usize, expected: &'static str },
    #[error("record size differs (given {given}, max {max})")]
    TooManyValues { given: usize, max: usize },
    #[error("unknown keywords: {}", join_keys(.0))]
    UnknownKeywords(Vec<SmolStr>),
    #[error("duplicate member: {0}")]
    DuplicateMember(SmolStr),
    #[error("{}", wrong_constructor(.keyword_init))]
    WrongConstructor { keyword_init: bool },
    #[error("keyword construction expects a JSON object")]
    NotAnObject,
    #[error("identifier {0} needs to be constant")]
    InvalidIdentifier(String),
    #[error("no member '{0}' in record")]
    UnknownMember(SmolStr),
    #[error("offset {index} too large for record(size:{size})")]
    IndexOutOfRange { index: i64, size: usize },
    #[error("record type {0} is already defined")]
    AlreadyDefined(SmolStr),
}

/// Coarse classification of a [`RecordError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong arity at definition or construction, or a bad keyword mapping.
    Argument,
    InvalidIdentifier,
    UnknownMember,
    IndexOutOfRange,
    /// A name is already bound in a registry that rejects duplicates.
    NameCollision,
}

impl RecordError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordError::WrongArgumentCount { .. }
            | RecordError::TooManyValues { .. }
            | RecordError::UnknownKeywords(_)
            | RecordError::DuplicateMember(_)
            | RecordError::WrongConstructor { .. }
            | RecordError::NotAnObject => ErrorKind::Argument,
            RecordError::InvalidIdentifier(_) => ErrorKind::InvalidIdentifier,
            RecordError::UnknownMember(_) => ErrorKind::UnknownMember,
            RecordError::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            RecordError::AlreadyDefined(_) => ErrorKind::NameCollision,
        }
    }

    #[inline]
    pub fn is_argument_error(&self) -> bool {
        self.kind() == ErrorKind::Argument
    }
}

fn join_keys(keys: &[SmolStr]) -> String {
    keys.iter()
        .map(SmolStr::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn wrong_constructor(keyword_init: &bool) -> &'static str {
    if *keyword_init {
        "keyword_init record types take a single mapping"
    } else {
        "positional record types take positional values"
    }
}
