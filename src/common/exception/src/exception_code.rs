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

use crate::ErrorCode;

macro_rules! build_exceptions {
    ($($(#[$meta:meta])* $body:ident($code:expr)),*$(,)*) => {
        impl ErrorCode {
            $(
                $(#[$meta])*
                pub fn $body(display_text: impl Into<String>) -> ErrorCode {
                    ErrorCode::create($code, stringify!($body), display_text.into(), None)
                }
            )*
        }
    }
}

// Internal errors [0, 1000].
build_exceptions! {
    Ok(0),
    /// Internal means this is the internal error that no action
    /// can be taken by neither developers or users.
    /// In most of the time, they are code bugs.
    ///
    /// If there is an error that are unexpected and no other actions
    /// to taken, please use this error code.
    Internal(1001),
    Unimplemented(1002),
    BadArguments(1006),
    IllegalDataType(1007),
    UnknownFunction(1008),
    BadDataValueType(1010),
    NumberArgumentsNotMatch(1028),
    BadBytes(1046),
    /// A size-proportional function (stringify or array materialization) met a bitmap whose
    /// cardinality exceeds `max_length_for_bitmap_function`. Aborts the whole batch.
    BitmapLimitExceeded(1070),
    Overflow(1049),
}

// Settings errors [2800-2900].
build_exceptions! {
    UnknownSetting(2801),
    WrongValueForVariable(2803),
}
