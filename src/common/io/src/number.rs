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

use bitmapdb_common_exception::ErrorCode;
use bitmapdb_common_exception::Result;

/// Parses base-10 text as an unsigned 64-bit integer.
///
/// Surrounding ASCII whitespace and a leading `+` are accepted; a sign `-`, an empty string,
/// stray characters and values above `u64::MAX` are rejected.
pub fn parse_unsigned_int(text: &str) -> Result<u64> {
    let trimmed = text.trim_matches(|c: char| c.is_ascii_whitespace());
    if trimmed.is_empty() {
        return Err(ErrorCode::BadDataValueType("cannot parse integer from empty string"));
    }
    Ok(trimmed.parse::<u64>()?)
}

/// Splits `text` on `delimiter` and parses every non-empty field with [`parse_unsigned_int`].
///
/// The whole input fails if any field fails, so a caller never sees a partial list.
pub fn split_and_parse_unsigned(text: &str, delimiter: char) -> Result<Vec<u64>> {
    text.split(delimiter)
        .filter(|field| !field.trim_matches(|c: char| c.is_ascii_whitespace()).is_empty())
        .map(parse_unsigned_int)
        .collect()
}
