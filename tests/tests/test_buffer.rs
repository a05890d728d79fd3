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

use fury_core::buffer::{Reader, Writer};
use fury_core::error::Error;

#[test]
fn test_varint32() {
    let test_data: Vec<i32> = vec![
        // 1 byte
        0,
        1,
        -1,
        63,
        -64,
        // 2 byte
        64,
        300,
        -300,
        // 3 byte
        16_384,
        -1_000_000,
        // 4 byte
        100_000_000,
        // 5 byte
        i32::MAX,
        i32::MIN,
    ];
    for &data in &test_data {
        let mut writer = Writer::default();
        writer.write_varint32(data);
        let binding = writer.dump();
        let mut reader = Reader::new(binding.as_slice());
        let res = reader.read_varint32().unwrap();
        assert_eq!(res, data);
        assert_eq!(reader.remaining(), 0);
    }
}

#[test]
fn test_varuint32_lengths() {
    let test_data: Vec<(u32, usize)> = vec![
        (0, 1),
        (127, 1),
        (128, 2),
        (16_383, 2),
        (16_384, 3),
        (2_097_151, 3),
        (2_097_152, 4),
        (268_435_455, 4),
        (268_435_456, 5),
        (u32::MAX, 5),
    ];
    for &(data, len) in &test_data {
        let mut writer = Writer::default();
        writer.write_varuint32(data);
        assert_eq!(writer.len(), len, "encoded length of {}", data);
        let binding = writer.dump();
        let mut reader = Reader::new(binding.as_slice());
        assert_eq!(reader.read_varuint32().unwrap(), data);
    }
}

#[test]
fn test_varuint64() {
    let test_data: Vec<u64> = vec![0, 1, 127, 128, 1 << 35, (1 << 56) - 1, 1 << 56, u64::MAX];
    for &data in &test_data {
        let mut writer = Writer::default();
        writer.write_varuint64(data);
        assert!(writer.len() <= 9);
        let binding = writer.dump();
        let mut reader = Reader::new(binding.as_slice());
        assert_eq!(reader.read_varuint64().unwrap(), data);
    }
    let mut writer = Writer::default();
    writer.write_varint64(i64::MIN);
    let binding = writer.dump();
    assert_eq!(Reader::new(&binding).read_varint64().unwrap(), i64::MIN);
}

#[test]
fn test_fixed_width_little_endian() {
    let mut writer = Writer::default();
    writer.write_i32(0x0102_0304);
    writer.write_u16(0xAABB);
    writer.write_f64(1.5);
    writer.write_bool(true);
    assert_eq!(&writer.as_slice()[..6], &[4, 3, 2, 1, 0xBB, 0xAA]);

    let binding = writer.dump();
    let mut reader = Reader::new(&binding);
    assert_eq!(reader.read_i32().unwrap(), 0x0102_0304);
    assert_eq!(reader.read_u16().unwrap(), 0xAABB);
    assert_eq!(reader.read_f64().unwrap(), 1.5);
    assert!(reader.read_bool().unwrap());
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_set_bytes_patches_in_place() {
    let mut writer = Writer::default();
    writer.write_u8(9);
    writer.skip(4);
    writer.write_u8(7);
    writer.set_bytes(1, &42u32.to_le_bytes()).unwrap();
    assert_eq!(writer.as_slice(), &[9, 42, 0, 0, 0, 7]);
}

#[test]
fn test_reader_errors() {
    if fury_core::error::should_panic_on_error() {
        return;
    }
    let mut reader = Reader::new(&[1, 2]);
    assert!(matches!(
        reader.read_u32(),
        Err(Error::BufferUnderflow(0, 4, 2))
    ));
    assert!(matches!(reader.set_cursor(3), Err(Error::BufferBounds(_))));
    assert!(matches!(
        Reader::new(&[2]).read_bool(),
        Err(Error::MalformedStream(_))
    ));
    assert!(matches!(
        Reader::new(&[0xFF, 0xFF]).read_utf8_string(2),
        Err(Error::MalformedStream(_))
    ));
}
