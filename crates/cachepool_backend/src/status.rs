// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::Error;

/// The outcome of a single storage backend call.
///
/// Backends translate engine-specific status codes into one of three states so that
/// callers never have to know which engine they are talking to. "Not found" is a normal
/// outcome, not a failure.
///
/// # Examples
///
/// ```
/// use cachepool_backend::{BackendStatus, Error};
///
/// let found: BackendStatus<i32> = BackendStatus::Success(7);
/// assert_eq!(found.success(), Some(7));
///
/// let missing: BackendStatus<i32> = BackendStatus::NotFound;
/// assert!(missing.is_not_found());
///
/// let failed: BackendStatus<i32> = BackendStatus::Failure(Error::from_message("timeout"));
/// assert!(failed.into_result().is_err());
/// ```
#[derive(Debug)]
pub enum BackendStatus<T = ()> {
    /// The call succeeded.
    Success(T),
    /// The addressed record does not exist.
    NotFound,
    /// The engine reported an error.
    Failure(Error),
}

impl<T> BackendStatus<T> {
    /// Returns `true` for [`BackendStatus::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` for [`BackendStatus::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns `true` for [`BackendStatus::Failure`].
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Maps the success value, leaving the other states untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BackendStatus<U> {
        match self {
            Self::Success(value) => BackendStatus::Success(f(value)),
            Self::NotFound => BackendStatus::NotFound,
            Self::Failure(error) => BackendStatus::Failure(error),
        }
    }

    /// Returns the success value, discarding "not found" and failures.
    #[must_use]
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::NotFound | Self::Failure(_) => None,
        }
    }

    /// Converts into a `Result`, where "not found" becomes `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the backend error for [`BackendStatus::Failure`].
    pub fn into_result(self) -> Result<Option<T>, Error> {
        match self {
            Self::Success(value) => Ok(Some(value)),
            Self::NotFound => Ok(None),
            Self::Failure(error) => Err(error),
        }
    }
}

impl<T> From<Result<T, Error>> for BackendStatus<T> {
    fn from(result: Result<T, Error>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}
