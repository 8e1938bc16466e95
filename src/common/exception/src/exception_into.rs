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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::ErrorCode;

#[derive(thiserror::Error)]
enum OtherErrors {
    ParseInt { error: std::num::ParseIntError },
    Base64 { error: base64::DecodeError },
    Io { error: std::io::Error },
    SerdeJson { error: serde_json::Error },
}

impl Display for OtherErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OtherErrors::ParseInt { error } => write!(f, "{}", error),
            OtherErrors::Base64 { error } => write!(f, "{}", error),
            OtherErrors::Io { error } => write!(f, "{}", error),
            OtherErrors::SerdeJson { error } => write!(f, "{}", error),
        }
    }
}

impl std::fmt::Debug for OtherErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OtherErrors::ParseInt { error } => write!(f, "{:?}", error),
            OtherErrors::Base64 { error } => write!(f, "{:?}", error),
            OtherErrors::Io { error } => write!(f, "{:?}", error),
            OtherErrors::SerdeJson { error } => write!(f, "{:?}", error),
        }
    }
}

impl From<std::num::ParseIntError> for ErrorCode {
    fn from(error: std::num::ParseIntError) -> Self {
        ErrorCode::create(
            1010,
            "BadDataValueType",
            String::new(),
            Some(Box::new(OtherErrors::ParseInt { error })),
        )
    }
}

impl From<base64::DecodeError> for ErrorCode {
    fn from(error: base64::DecodeError) -> Self {
        ErrorCode::create(
            1046,
            "BadBytes",
            String::new(),
            Some(Box::new(OtherErrors::Base64 { error })),
        )
    }
}

impl From<std::io::Error> for ErrorCode {
    fn from(error: std::io::Error) -> Self {
        ErrorCode::create(
            1046,
            "BadBytes",
            String::new(),
            Some(Box::new(OtherErrors::Io { error })),
        )
    }
}

impl From<serde_json::Error> for ErrorCode {
    fn from(error: serde_json::Error) -> Self {
        ErrorCode::create(
            1010,
            "BadDataValueType",
            String::new(),
            Some(Box::new(OtherErrors::SerdeJson { error })),
        )
    }
}

/// The wire form of an [`ErrorCode`], for handing batch-fatal errors back to a caller that
/// lives outside the process.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SerializedError {
    pub code: u16,
    pub name: String,
    pub message: String,
}

impl From<&ErrorCode> for SerializedError {
    fn from(e: &ErrorCode) -> Self {
        SerializedError {
            code: e.code(),
            name: e.name(),
            message: e.message(),
        }
    }
}

impl From<&SerializedError> for ErrorCode {
    fn from(se: &SerializedError) -> Self {
        ErrorCode::create(se.code, &se.name, se.message.clone(), None)
    }
}
