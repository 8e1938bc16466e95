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

use std::collections::HashMap;
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::sync::Arc;

use bitmapdb_common_exception::ErrorCode;
use bitmapdb_common_exception::Result;
use once_cell::sync::OnceCell;

static DEFAULT_SETTINGS: OnceCell<Arc<DefaultSettings>> = OnceCell::new();

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingRange(pub RangeInclusive<u64>);

impl Display for SettingRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.0.start(), self.0.end())
    }
}

impl SettingRange {
    /// Checks if an integer value is within the numeric range.
    pub fn is_within_numeric_range(&self, value: u64) -> Result<()> {
        if self.0.contains(&value) {
            Ok(())
        } else {
            Err(ErrorCode::WrongValueForVariable(format!(
                "Value {} is not within the range {}",
                value, self
            )))
        }
    }
}

#[derive(Clone, Debug)]
pub struct DefaultSettingValue {
    pub(crate) value: u64,
    pub(crate) desc: &'static str,
    pub(crate) range: SettingRange,
}

impl DefaultSettingValue {
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn desc(&self) -> &'static str {
        self.desc
    }

    pub fn range(&self) -> &SettingRange {
        &self.range
    }
}

#[derive(Clone)]
pub struct DefaultSettings {
    pub(crate) settings: HashMap<String, DefaultSettingValue>,
}

impl DefaultSettings {
    pub fn instance() -> Result<Arc<DefaultSettings>> {
        Ok(Arc::clone(DEFAULT_SETTINGS.get_or_try_init(
            || -> Result<Arc<DefaultSettings>> {
                let default_settings = HashMap::from([
                    ("max_length_for_bitmap_function", DefaultSettingValue {
                        value: 1_000_000,
                        desc: "Sets the maximum number of bitmap members a single call to a bitmap function may materialize.",
                        range: SettingRange(1..=u32::MAX as u64),
                    }),
                    ("max_length_for_bitmap_from_string", DefaultSettingValue {
                        value: i32::MAX as u64,
                        desc: "Sets the maximum length in bytes of the text bitmap_from_string accepts; longer texts yield NULL.",
                        range: SettingRange(1..=i32::MAX as u64),
                    }),
                ]);

                Ok(Arc::new(DefaultSettings {
                    settings: default_settings
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), v))
                        .collect(),
                }))
            },
        )?))
    }

    pub fn has_setting(key: &str) -> Result<bool> {
        Ok(Self::instance()?.settings.contains_key(key))
    }

    pub fn get(key: &str) -> Result<DefaultSettingValue> {
        Self::instance()?
            .settings
            .get(key)
            .cloned()
            .ok_or_else(|| ErrorCode::UnknownSetting(format!("Unknown setting: {:?}", key)))
    }

    pub fn try_get_u64(key: &str) -> Result<u64> {
        Ok(Self::get(key)?.value)
    }

    /// Parses `v` for the setting `k` and checks it against the setting's range.
    pub fn convert_value(k: String, v: String) -> Result<(String, u64)> {
        let setting_value = Self::get(&k)?;
        let u64_val = Self::parse_to_u64(&v)?;
        setting_value.range.is_within_numeric_range(u64_val)?;
        Ok((k, u64_val))
    }

    fn parse_to_u64(v: &str) -> Result<u64> {
        v.trim().parse::<u64>().map_err(|_| {
            ErrorCode::WrongValueForVariable(format!("{} is not a valid integer value", v))
        })
    }
}
