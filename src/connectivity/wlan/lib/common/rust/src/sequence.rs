// Copyright 2020 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Modular arithmetic on 12-bit sequence numbers.
//! IEEE Std 802.11-2016, 10.3.2.11.3 and 10.24.7.

pub type SequenceNumber = u16;

/// Sequence numbers count modulo this value.
pub const SEQ_MODULO: u16 = 1 << 12;
pub const SEQ_MASK: u16 = SEQ_MODULO - 1;
const SEQ_HALF_RANGE: u16 = SEQ_MODULO / 2;

pub fn add(sn: SequenceNumber, n: u16) -> SequenceNumber {
    sn.wrapping_add(n) & SEQ_MASK
}

pub fn sub(sn: SequenceNumber, n: u16) -> SequenceNumber {
    sn.wrapping_sub(n) & SEQ_MASK
}

pub fn next(sn: SequenceNumber) -> SequenceNumber {
    add(sn, 1)
}

/// Number of increments needed to get from `from` to `to`.
pub fn distance(from: SequenceNumber, to: SequenceNumber) -> u16 {
    to.wrapping_sub(from) & SEQ_MASK
}

/// `a` lies in the half of the sequence space starting at `b`.
pub fn is_greater_or_equal(a: SequenceNumber, b: SequenceNumber) -> bool {
    distance(b, a) < SEQ_HALF_RANGE
}

/// `a` is strictly ahead of `b`, i.e. `a` follows `b` by less than half the sequence space.
pub fn is_greater(a: SequenceNumber, b: SequenceNumber) -> bool {
    let d = distance(b, a);
    d != 0 && d < SEQ_HALF_RANGE
}

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    #[test_case(5, 4 => true; "simple")]
    #[test_case(4, 5 => false; "simple reversed")]
    #[test_case(7, 7 => false; "equal")]
    #[test_case(5, 4090 => true; "across wrap")]
    #[test_case(4090, 5 => false; "behind across wrap")]
    #[test_case(2047, 0 => true; "just under half range")]
    #[test_case(2048, 0 => false; "exactly half range")]
    fn greater(a: u16, b: u16) -> bool {
        is_greater(a, b)
    }

    #[test_case(7, 7 => true; "equal")]
    #[test_case(0, 4095 => true; "wrapped")]
    #[test_case(4095, 0 => false; "behind")]
    fn greater_or_equal(a: u16, b: u16) -> bool {
        is_greater_or_equal(a, b)
    }

    #[test]
    fn distance_wraps() {
        assert_eq!(distance(4094, 1), 3);
        assert_eq!(distance(1, 4094), 4093);
        assert_eq!(distance(10, 10), 0);
    }

    #[test]
    fn add_and_sub_wrap() {
        assert_eq!(next(4095), 0);
        assert_eq!(add(4090, 10), 4);
        assert_eq!(sub(3, 5), 4094);
        assert_eq!(sub(add(17, 4000), 4000), 17);
    }
}
