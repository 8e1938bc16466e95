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

use bitmapdb_common_column::buffer::Buffer;

#[test]
fn test_slice_shares_storage() {
    let buffer: Buffer<i64> = vec![1, 2, 3, 4, 5].into();
    let sliced = buffer.clone().sliced(1, 3);
    assert_eq!(sliced.as_slice(), &[2, 3, 4]);
    assert_eq!(buffer.len(), 5);

    let nested = sliced.sliced(1, 2);
    assert_eq!(nested.as_slice(), &[3, 4]);
    assert_eq!(nested.into_vec(), vec![3, 4]);
}

#[test]
#[should_panic]
fn test_slice_out_of_bounds() {
    let buffer: Buffer<u8> = vec![1, 2].into();
    let _ = buffer.sliced(1, 2);
}
