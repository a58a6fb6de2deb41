// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error type for storage backend failures.

/// A failure reported by a storage backend.
///
/// This is an opaque error that wraps whatever the underlying engine reported: a client
/// error, a non-OK status code, a timeout. Use [`std::error::Error::source()`] to reach the
/// engine's own error if one was attached.
///
/// # Example
///
/// ```
/// use cachepool_backend::Error;
///
/// let error = Error::from_message("record too big");
/// assert!(error.to_string().contains("record too big"));
/// ```
#[ohno::error]
pub struct Error {}

impl Error {
    /// Creates a new error from any type that can be converted to an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachepool_backend::Error;
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out");
    /// let error = Error::from_message(io);
    /// ```
    pub fn from_message(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(cause)
    }
}

/// A specialized [`Result`] type for backend setup, such as connecting.
pub type Result<T> = std::result::Result<T, Error>;
