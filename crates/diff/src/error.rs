use thiserror::Error;

/// Errors raised while turning a tagged stream into a descriptor.
///
/// Every variant means the line diff source produced something the builder
/// cannot interpret. None of them are recoverable; the build is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// A hint entry with no base-only or modified-only line before it
    #[error("stray hint at entry {index}: no base-only or modified-only line precedes it")]
    StrayHint { index: usize },

    /// A hint describing more characters than its line holds
    #[error("hint at entry {index} covers {hint_len} characters but its line has {line_len}")]
    HintTooLong {
        index: usize,
        hint_len: usize,
        line_len: usize,
    },

    /// A hint character outside of ` `, `-`, `+` and `^`
    #[error("unknown hint mark {mark:?} at offset {offset}")]
    UnknownHintMark { mark: char, offset: usize },

    /// An ndiff line whose two-character prefix is not a known tag
    #[error("unrecognized ndiff tag on line {line_number}: {line:?}")]
    UnknownTag { line_number: usize, line: String },
}

pub type Result<T, E = DiffError> = std::result::Result<T, E>;
