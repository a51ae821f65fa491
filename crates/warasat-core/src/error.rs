use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstateError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("unknown inheritor: {0}")]
    UnknownInheritor(String),

    #[error("unknown property: {0}")]
    UnknownProperty(String),
}
