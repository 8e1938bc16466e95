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
use std::sync::Arc;

use bitmapdb_common_exception::Result;
use dashmap::DashMap;
use itertools::Itertools;
use log::info;
use serde::Deserialize;
use serde::Serialize;

use crate::settings_default::DefaultSettingValue;
use crate::settings_default::DefaultSettings;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeValue {
    pub value: u64,
}

/// The overrides of one session on top of [`DefaultSettings`].
#[derive(Debug, Default)]
pub struct Settings {
    pub(crate) changes: DashMap<String, ChangeValue>,
}

impl Settings {
    pub fn create() -> Arc<Settings> {
        Arc::new(Settings::default())
    }

    pub fn has_setting(&self, key: &str) -> Result<bool> {
        DefaultSettings::has_setting(key)
    }

    pub fn check_and_get_default_value(&self, key: &str) -> Result<u64> {
        DefaultSettings::try_get_u64(key)
    }

    pub fn set_setting(&self, k: String, v: String) -> Result<()> {
        let (key, value) = DefaultSettings::convert_value(k, v)?;
        info!("Set setting {} = {}", key, value);
        self.changes.insert(key, ChangeValue { value });
        Ok(())
    }

    /// Applies every known setting of `settings`, skipping unknown names.
    pub fn set_batch_settings(&self, settings: &HashMap<String, String>) -> Result<()> {
        for (k, v) in settings.iter() {
            if self.has_setting(k.as_str())? {
                self.set_setting(k.to_string(), v.to_string())?;
            }
        }

        Ok(())
    }

    pub fn unset_setting(&self, k: &str) {
        if self.changes.remove(k).is_some() {
            info!("Unset setting {}", k);
        }
    }

    pub fn is_changed(&self, key: &str) -> bool {
        self.changes.contains_key(key)
    }

    pub(crate) fn try_get_u64(&self, key: &str) -> Result<u64> {
        match self.changes.get(key) {
            Some(v) => Ok(v.value),
            None => DefaultSettings::try_get_u64(key),
        }
    }

    pub(crate) fn try_set_u64(&self, key: &str, val: u64) -> Result<()> {
        DefaultSettings::get(key)?
            .range()
            .is_within_numeric_range(val)?;
        info!("Set setting {} = {}", key, val);
        self.changes
            .insert(key.to_string(), ChangeValue { value: val });
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SettingsItem {
    pub name: String,
    pub desc: &'static str,
    pub user_value: u64,
    pub default_value: u64,
    pub range: String,
}

pub struct SettingsIter<'a> {
    settings: &'a Settings,
    inner: std::vec::IntoIter<(String, DefaultSettingValue)>,
}

impl<'a> SettingsIter<'a> {
    pub fn create(settings: &'a Settings) -> Result<SettingsIter<'a>> {
        let iter = DefaultSettings::instance()?
            .settings
            .clone()
            .into_iter()
            .sorted_by(|(l, _), (r, _)| Ord::cmp(l, r));

        Ok(SettingsIter::<'a> {
            settings,
            inner: iter,
        })
    }
}

impl<'a> Iterator for SettingsIter<'a> {
    type Item = SettingsItem;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, default_value) = self.inner.next()?;
        let user_value = match self.settings.changes.get(&key) {
            Some(change_value) => change_value.value,
            None => default_value.value,
        };
        Some(SettingsItem {
            name: key,
            desc: default_value.desc,
            user_value,
            default_value: default_value.value,
            range: default_value.range.to_string(),
        })
    }
}
