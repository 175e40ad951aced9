#[derive(Debug, thiserror::Error, Copy, Clone, Eq, PartialEq)]
pub enum ParseJsonPointerError {
    #[error("json pointer must be empty or start with `/`")]
    MissingSlash,
    #[error("`~` must be followed by `0` or `1`")]
    InvalidEscape,
}
