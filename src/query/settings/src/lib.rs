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

#![allow(clippy::uninlined_format_args)]

//! Session settings: the default table every session starts from, per-session overrides, and
//! the [`FunctionContext`](bitmapdb_common_expression::FunctionContext) snapshot handed to
//! the functions.

mod settings;
mod settings_default;
mod settings_getter_setter;

pub use settings::ChangeValue;
pub use settings::Settings;
pub use settings::SettingsItem;
pub use settings::SettingsIter;
pub use settings_default::DefaultSettingValue;
pub use settings_default::DefaultSettings;
pub use settings_default::SettingRange;
