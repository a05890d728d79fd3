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

use crate::bail;
use crate::error::Error;
use byteorder::{ByteOrder, LittleEndian};

macro_rules! write_fixed {
    ($($name:ident: $ty:ty => $size:expr, $put:ident;)*) => {
        $(
            #[inline(always)]
            pub fn $name(&mut self, value: $ty) {
                let mut bytes = [0u8; $size];
                LittleEndian::$put(&mut bytes, value);
                self.bf.extend_from_slice(&bytes);
            }
        )*
    };
}

macro_rules! read_fixed {
    ($($name:ident: $ty:ty => $size:expr, $get:ident;)*) => {
        $(
            #[inline(always)]
            pub fn $name(&mut self) -> Result<$ty, Error> {
                let result = LittleEndian::$get(self.take($size)?);
                Ok(result)
            }
        )*
    };
}

/// Append-only output buffer. The write cursor is the buffer length.
#[derive(Default)]
pub struct Writer {
    pub(crate) bf: Vec<u8>,
}

impl Writer {
    pub fn with_capacity(capacity: usize) -> Self {
        Writer {
            bf: Vec::with_capacity(capacity),
        }
    }

    pub fn reset(&mut self) {
        // keep capacity and reset len to 0
        self.bf.clear();
    }

    pub fn dump(&self) -> Vec<u8> {
        self.bf.clone()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bf
    }

    pub fn len(&self) -> usize {
        self.bf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bf.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.bf.reserve(additional);
    }

    /// Appends `len` zero bytes, to be filled later with [`Writer::set_bytes`].
    pub fn skip(&mut self, len: usize) {
        self.bf.resize(self.bf.len() + len, 0);
    }

    /// Overwrites already written bytes at `offset`.
    pub fn set_bytes(&mut self, offset: usize, data: &[u8]) -> Result<(), Error> {
        let len = self.bf.len();
        match offset
            .checked_add(data.len())
            .and_then(|end| self.bf.get_mut(offset..end))
        {
            Some(dst) => {
                dst.copy_from_slice(data);
                Ok(())
            }
            None => Err(Error::buffer_bounds(format!(
                "cannot set {} bytes at offset {} of a {} byte buffer",
                data.len(),
                offset,
                len
            ))),
        }
    }

    pub fn write_bytes(&mut self, v: &[u8]) -> usize {
        self.bf.extend_from_slice(v);
        v.len()
    }

    #[inline(always)]
    pub fn write_u8(&mut self, value: u8) {
        self.bf.push(value);
    }

    #[inline(always)]
    pub fn write_i8(&mut self, value: i8) {
        self.bf.push(value as u8);
    }

    #[inline(always)]
    pub fn write_bool(&mut self, value: bool) {
        self.bf.push(value as u8);
    }

    write_fixed! {
        write_u16: u16 => 2, write_u16;
        write_i16: i16 => 2, write_i16;
        write_u32: u32 => 4, write_u32;
        write_i32: i32 => 4, write_i32;
        write_u64: u64 => 8, write_u64;
        write_i64: i64 => 8, write_i64;
        write_f32: f32 => 4, write_f32;
        write_f64: f64 => 8, write_f64;
    }

    pub fn write_varint32(&mut self, value: i32) {
        let zigzag = ((value as i64) << 1) ^ ((value as i64) >> 31);
        self.write_varuint32(zigzag as u32)
    }

    pub fn write_varuint32(&mut self, value: u32) {
        if value < 0x80 {
            self.write_u8(value as u8);
        } else if value < 0x4000 {
            // 2 bytes
            let u1 = ((value as u8) & 0x7F) | 0x80;
            let u2 = (value >> 7) as u8;
            self.write_u16(((u2 as u16) << 8) | u1 as u16);
        } else if value < 0x200000 {
            // 3 bytes
            let u1 = ((value as u8) & 0x7F) | 0x80;
            let u2 = (((value >> 7) as u8) & 0x7F) | 0x80;
            let u3 = (value >> 14) as u8;
            self.write_u16(((u2 as u16) << 8) | u1 as u16);
            self.write_u8(u3);
        } else if value < 0x10000000 {
            // 4 bytes
            let u1 = ((value as u8) & 0x7F) | 0x80;
            let u2 = (((value >> 7) as u8) & 0x7F) | 0x80;
            let u3 = (((value >> 14) as u8) & 0x7F) | 0x80;
            let u4 = (value >> 21) as u8;
            self.write_u32(
                ((u4 as u32) << 24) | ((u3 as u32) << 16) | ((u2 as u32) << 8) | u1 as u32,
            );
        } else {
            // 5 bytes
            let u1 = ((value as u8) & 0x7F) | 0x80;
            let u2 = (((value >> 7) as u8) & 0x7F) | 0x80;
            let u3 = (((value >> 14) as u8) & 0x7F) | 0x80;
            let u4 = (((value >> 21) as u8) & 0x7F) | 0x80;
            let u5 = (value >> 28) as u8;
            self.write_u32(
                ((u4 as u32) << 24) | ((u3 as u32) << 16) | ((u2 as u32) << 8) | u1 as u32,
            );
            self.write_u8(u5);
        }
    }

    pub fn write_varint64(&mut self, value: i64) {
        let zigzag = ((value << 1) ^ (value >> 63)) as u64;
        self.write_varuint64(zigzag)
    }

    /// At most 9 bytes: eight 7-bit groups, then a full 8-bit group.
    pub fn write_varuint64(&mut self, mut value: u64) {
        for _ in 0..8 {
            if value < 0x80 {
                self.write_u8(value as u8);
                return;
            }
            self.write_u8(((value as u8) & 0x7F) | 0x80);
            value >>= 7;
        }
        self.write_u8(value as u8);
    }

    /// Writes the raw UTF-8 bytes of `s`, without any length prefix.
    pub fn write_utf8_string(&mut self, s: &str) {
        self.bf.extend_from_slice(s.as_bytes());
    }
}

/// Sequential reader over a borrowed byte slice.
pub struct Reader<'a> {
    bf: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bf: &'a [u8]) -> Reader<'a> {
        Reader { bf, cursor: 0 }
    }

    #[inline(always)]
    pub fn get_cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor to `cursor`, which may equal the input length.
    pub fn set_cursor(&mut self, cursor: usize) -> Result<(), Error> {
        if cursor > self.bf.len() {
            return Err(Error::buffer_bounds(format!(
                "cursor {} is past the end of a {} byte input",
                cursor,
                self.bf.len()
            )));
        }
        self.cursor = cursor;
        Ok(())
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bf.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bf.is_empty()
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.bf.len() - self.cursor
    }

    pub fn slice_after_cursor(&self) -> &'a [u8] {
        &self.bf[self.cursor..]
    }

    /// Checks that `len` bytes starting at `offset` lie inside the input.
    pub fn check_bound(&self, offset: usize, len: usize) -> Result<(), Error> {
        match offset.checked_add(len) {
            Some(end) if end <= self.bf.len() => Ok(()),
            _ => Err(Error::buffer_bounds(format!(
                "range {} + {} is outside a {} byte input",
                offset,
                len,
                self.bf.len()
            ))),
        }
    }

    #[inline(always)]
    fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let start = self.cursor;
        match start.checked_add(len) {
            Some(end) if end <= self.bf.len() => {
                self.cursor = end;
                Ok(&self.bf[start..end])
            }
            _ => Err(Error::buffer_underflow(start, len, self.bf.len())),
        }
    }

    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        match self.bf.get(self.cursor) {
            Some(b) => {
                self.cursor += 1;
                Ok(*b)
            }
            None => Err(Error::buffer_underflow(self.cursor, 1, self.bf.len())),
        }
    }

    #[inline(always)]
    pub fn read_i8(&mut self) -> Result<i8, Error> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(Error::malformed_stream(format!("invalid bool byte {}", v))),
        }
    }

    read_fixed! {
        read_u16: u16 => 2, read_u16;
        read_i16: i16 => 2, read_i16;
        read_u32: u32 => 4, read_u32;
        read_i32: i32 => 4, read_i32;
        read_u64: u64 => 8, read_u64;
        read_i64: i64 => 8, read_i64;
        read_f32: f32 => 4, read_f32;
        read_f64: f64 => 8, read_f64;
    }

    pub fn read_varuint32(&mut self) -> Result<u32, Error> {
        let mut result: u32 = 0;
        for i in 0..4 {
            let b = self.read_u8()? as u32;
            result |= (b & 0x7F) << (7 * i);
            if b < 0x80 {
                return Ok(result);
            }
        }
        let b = self.read_u8()? as u32;
        if b > 0x0F {
            bail!("varuint32 overflows at offset {}", self.cursor - 1);
        }
        Ok(result | (b << 28))
    }

    pub fn read_varint32(&mut self) -> Result<i32, Error> {
        let encoded = self.read_varuint32()?;
        Ok(((encoded >> 1) as i32) ^ -((encoded & 1) as i32))
    }

    pub fn read_varuint64(&mut self) -> Result<u64, Error> {
        let mut result: u64 = 0;
        for i in 0..8 {
            let b = self.read_u8()? as u64;
            result |= (b & 0x7F) << (7 * i);
            if b < 0x80 {
                return Ok(result);
            }
        }
        let b = self.read_u8()? as u64;
        Ok(result | (b << 56))
    }

    pub fn read_varint64(&mut self) -> Result<i64, Error> {
        let encoded = self.read_varuint64()?;
        Ok(((encoded >> 1) as i64) ^ -((encoded & 1) as i64))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        self.take(len)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), Error> {
        self.take(len).map(|_| ())
    }

    pub fn read_utf8_string(&mut self, len: usize) -> Result<String, Error> {
        let bytes = self.take(len)?;
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_string()),
            Err(e) => Err(Error::malformed_stream(format!(
                "string payload is not valid utf-8: {}",
                e
            ))),
        }
    }
}
