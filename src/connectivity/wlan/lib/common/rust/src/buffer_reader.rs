// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    std::mem::size_of,
    zerocopy::{ByteSlice, FromBytes, LayoutVerified, Unaligned},
};

/// Sequentially reads unaligned zerocopy views out of a byte buffer.
pub struct BufferReader<B> {
    buffer: Option<B>,
    bytes_read: usize,
}

impl<B: ByteSlice> BufferReader<B> {
    pub fn new(bytes: B) -> Self {
        BufferReader { buffer: Some(bytes), bytes_read: 0 }
    }

    pub fn peek<T: Unaligned>(&self) -> Option<LayoutVerified<&[u8], T>> {
        let buffer = self.buffer.as_ref()?;
        LayoutVerified::new_unaligned_from_prefix(&buffer[..]).map(|(t, _)| t)
    }

    pub fn peek_value<T: Unaligned + FromBytes + Copy>(&self) -> Option<T> {
        self.peek::<T>().map(|t| *t)
    }

    pub fn read<T: Unaligned>(&mut self) -> Option<LayoutVerified<B, T>> {
        if self.bytes_remaining() < size_of::<T>() {
            return None;
        }
        let (t, rest) = LayoutVerified::new_unaligned_from_prefix(self.buffer.take()?)?;
        self.bytes_read += size_of::<T>();
        self.buffer = Some(rest);
        Some(t)
    }

    pub fn read_bytes(&mut self, len: usize) -> Option<B> {
        if self.bytes_remaining() < len {
            return None;
        }
        let (head, rest) = self.buffer.take()?.split_at(len);
        self.bytes_read += len;
        self.buffer = Some(rest);
        Some(head)
    }

    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    pub fn bytes_remaining(&self) -> usize {
        self.buffer.as_ref().map_or(0, |b| b.len())
    }

    pub fn into_remaining(self) -> Option<B> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_advances() {
        let bytes = [1u8, 2, 3, 4, 5];
        let mut reader = BufferReader::new(&bytes[..]);
        let first = reader.read::<[u8; 2]>().expect("expected two bytes");
        assert_eq!(*first, [1, 2]);
        assert_eq!(reader.bytes_read(), 2);
        assert_eq!(reader.bytes_remaining(), 3);
        assert_eq!(reader.peek_value::<u8>(), Some(3));
        assert_eq!(reader.read_bytes(3), Some(&[3u8, 4, 5][..]));
        assert_eq!(reader.bytes_remaining(), 0);
    }

    #[test]
    fn read_too_long_leaves_buffer_untouched() {
        let bytes = [1u8, 2];
        let mut reader = BufferReader::new(&bytes[..]);
        assert!(reader.read::<[u8; 3]>().is_none());
        assert!(reader.read_bytes(3).is_none());
        assert_eq!(reader.bytes_remaining(), 2);
        assert_eq!(reader.into_remaining(), Some(&[1u8, 2][..]));
    }
}
