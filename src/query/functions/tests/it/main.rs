// Copyright 2022 Datafuse Labs.
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

use once_cell::sync::Lazy;
use parking_lot::Mutex;


static TRACING_INITIALIZED: Lazy<Mutex<()>> = Lazy::new(|| {
    let _ = env_logger::builder().is_test(true).try_init();
    Mutex::new(())
});

pub(crate) fn ensure_tracing_initialized() {
    let _guard = TRACING_INITIALIZED.lock();
}
