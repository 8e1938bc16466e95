// Copyright 2021 Datafuse Labs
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![allow(non_snake_case)]

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

use thiserror::Error;

pub type Result<T, E = ErrorCode> = std::result::Result<T, E>;

/// The error type shared by every crate of the workspace.
///
/// Constructors are generated from the code table in `exception_code.rs`, e.g.
/// `ErrorCode::BadArguments("...")`.
#[derive(Error)]
pub struct ErrorCode {
    code: u16,
    name: String,
    display_text: String,
    cause: Option<Box<dyn std::error::Error + Sync + Send>>,
}

impl ErrorCode {
    pub(crate) fn create(
        code: u16,
        name: impl ToString,
        display_text: String,
        cause: Option<Box<dyn std::error::Error + Sync + Send>>,
    ) -> ErrorCode {
        ErrorCode {
            code,
            name: name.to_string(),
            display_text,
            cause,
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn name(&self) -> String {
        self.name.clone()
    }

    pub fn message(&self) -> String {
        let msg = self.display_text();
        if msg.is_empty() {
            self.cause
                .as_ref()
                .map(|cause| cause.to_string())
                .unwrap_or_default()
        } else {
            msg
        }
    }

    pub fn display_text(&self) -> String {
        self.display_text.clone()
    }

    /// Prepends context to the message, e.g. the function that failed.
    #[must_use]
    pub fn add_message(self, msg: impl AsRef<str>) -> Self {
        let display_text = format!("{}\n{}", msg.as_ref(), self.display_text);
        Self {
            display_text,
            ..self
        }
    }

    /// Appends context to the message.
    #[must_use]
    pub fn add_message_back(self, msg: impl AsRef<str>) -> Self {
        let display_text = format!("{}{}", self.display_text, msg.as_ref());
        Self {
            display_text,
            ..self
        }
    }
}

impl Debug for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}. Code: {}, Text = {}.",
            self.name,
            self.code,
            self.message()
        )
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}. Code: {}, Text = {}.",
            self.name,
            self.code,
            self.message()
        )
    }
}

/// Converts a foreign error into an [`ErrorCode`] with extra context.
pub trait ToErrorCode<T, E, CtxFn>
where E: Display + Send + Sync + 'static
{
    /// Wrap the error value with ErrorCode. It is lazily evaluated:
    /// only when an error does occur.
    ///
    /// `err_code_fn` is one of the ErrorCode builder function such as `ErrorCode::Ok`.
    /// `context_fn` builds display_text for the ErrorCode.
    fn map_err_to_code<ErrFn, D>(self, err_code_fn: ErrFn, context_fn: CtxFn) -> Result<T>
    where
        ErrFn: FnOnce(String) -> ErrorCode,
        D: Display,
        CtxFn: FnOnce() -> D;
}

impl<T, E, CtxFn> ToErrorCode<T, E, CtxFn> for std::result::Result<T, E>
where E: Display + Send + Sync + 'static
{
    fn map_err_to_code<ErrFn, D>(self, make_exception: ErrFn, context_fn: CtxFn) -> Result<T>
    where
        ErrFn: FnOnce(String) -> ErrorCode,
        D: Display,
        CtxFn: FnOnce() -> D,
    {
        self.map_err(|error| {
            let err_text = format!("{}, cause: {}", context_fn(), error);
            make_exception(err_text)
        })
    }
}
