//! Tagged result of a store read, keeping "nothing there" apart from "store failed".

use crate::application::repos::RepoError;

#[derive(Debug)]
pub enum FetchOutcome<T, E = RepoError> {
    Found(T),
    Empty,
    Failed(E),
}

impl<T, E> FetchOutcome<T, E> {
    pub fn from_optional(result: Result<Option<T>, E>) -> Self {
        match result {
            Ok(Some(value)) => Self::Found(value),
            Ok(None) => Self::Empty,
            Err(err) => Self::Failed(err),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U, E> {
        match self {
            Self::Found(value) => FetchOutcome::Found(f(value)),
            Self::Empty => FetchOutcome::Empty,
            Self::Failed(err) => FetchOutcome::Failed(err),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Empty | Self::Failed(_) => None,
        }
    }
}

impl<T, E> FetchOutcome<Vec<T>, E> {
    /// An empty list is `Empty`, not `Found(vec![])`.
    pub fn from_list(result: Result<Vec<T>, E>) -> Self {
        match result {
            Ok(values) if values.is_empty() => Self::Empty,
            Ok(values) => Self::Found(values),
            Err(err) => Self::Failed(err),
        }
    }

    pub fn into_list(self) -> Vec<T> {
        self.into_option().unwrap_or_default()
    }
}
