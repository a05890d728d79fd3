// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use fury_core::error::Error;
use fury_core::value::Value;
use fury_core::Fury;

// `levels` nested lists around a single int
fn nested(levels: usize) -> Value {
    let mut value = Value::Int32(0);
    for _ in 0..levels {
        value = Value::list(vec![value]);
    }
    value
}

#[test]
fn test_max_depth_within_limit() {
    let fury = Fury::default().max_depth(5);
    let value = nested(4);
    let bytes = fury.serialize(&value).unwrap();
    assert_eq!(fury.deserialize(&bytes).unwrap(), value);
}

#[test]
fn test_max_depth_exceeded_on_write() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let fury = Fury::default().max_depth(4);
    let result = fury.serialize(&nested(4));
    assert!(matches!(result, Err(Error::DepthExceeded(_))));
}

#[test]
fn test_max_depth_exceeded_on_read() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let bytes = Fury::default().serialize(&nested(10)).unwrap();
    let fury = Fury::default().max_depth(3);
    let err = fury.deserialize(&bytes).unwrap_err();
    assert!(matches!(err, Error::DepthExceeded(_)));
    assert!(format!("{}", err).contains("3"));
}

#[test]
fn test_default_depth_allows_deep_graphs() {
    let fury = Fury::default();
    let value = nested(100);
    let bytes = fury.serialize(&value).unwrap();
    assert_eq!(fury.deserialize(&bytes).unwrap(), value);
}
