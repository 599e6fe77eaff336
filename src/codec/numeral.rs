//! Arbitrary-precision naturals for word numerals
//!
//! A word of `k` letters maps to a numeral of roughly `4.7 * k` bits, so even
//! ordinary prose overflows `u64` past thirteen letters. [`Numeral`] stores the
//! value as little-endian 32-bit limbs and supports exactly the operations the
//! codec needs: multiply-accumulate by a small factor, small addition and
//! subtraction, and division with remainder by a small divisor.

use std::fmt;

/// A natural number of unbounded size
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Numeral {
    /// Little-endian limbs, no trailing zero limbs. Zero is the empty vector.
    limbs: Vec<u32>,
}

impl Numeral {
    pub fn zero() -> Self {
        Numeral { limbs: Vec::new() }
    }

    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    pub fn is_even(&self) -> bool {
        self.limbs.first().map_or(true, |low| low & 1 == 0)
    }

    /// `self = self * factor + addend`
    pub fn mul_add(&mut self, factor: u32, addend: u32) {
        let mut carry = addend as u64;
        for limb in &mut self.limbs {
            let wide = *limb as u64 * factor as u64 + carry;
            *limb = wide as u32;
            carry = wide >> 32;
        }
        if carry != 0 {
            self.limbs.push(carry as u32);
        }
        self.normalize();
    }

    pub fn add_small(&mut self, addend: u32) {
        self.mul_add(1, addend);
    }

    /// `self -= amount`, leaving `self` untouched and returning false if the
    /// result would be negative
    pub fn sub_small(&mut self, amount: u32) -> bool {
        if self.limbs.len() <= 1 && self.limbs.first().copied().unwrap_or(0) < amount {
            return false;
        }
        let mut borrow = amount;
        for limb in &mut self.limbs {
            if borrow == 0 {
                break;
            }
            let (value, underflow) = limb.overflowing_sub(borrow);
            *limb = value;
            borrow = underflow as u32;
        }
        self.normalize();
        true
    }

    /// Divide in place by `divisor`, returning the remainder
    pub fn div_rem_small(&mut self, divisor: u32) -> u32 {
        debug_assert!(divisor != 0);
        let divisor = divisor as u64;
        let mut rem = 0u64;
        for limb in self.limbs.iter_mut().rev() {
            let current = (rem << 32) | *limb as u64;
            *limb = (current / divisor) as u32;
            rem = current % divisor;
        }
        self.normalize();
        rem as u32
    }

    pub fn rem_small(&self, divisor: u32) -> u32 {
        debug_assert!(divisor != 0);
        let divisor = divisor as u64;
        self.limbs
            .iter()
            .rev()
            .fold(0u64, |rem, &limb| ((rem << 32) | limb as u64) % divisor) as u32
    }

    /// The value as a `u64`, if it fits
    pub fn to_u64(&self) -> Option<u64> {
        match self.limbs.as_slice() {
            [] => Some(0),
            [low] => Some(*low as u64),
            [low, high] => Some((*high as u64) << 32 | *low as u64),
            _ => None,
        }
    }

    fn normalize(&mut self) {
        while self.limbs.last() == Some(&0) {
            self.limbs.pop();
        }
    }
}

impl From<u64> for Numeral {
    fn from(value: u64) -> Self {
        let mut numeral = Numeral {
            limbs: vec![value as u32, (value >> 32) as u32],
        };
        numeral.normalize();
        numeral
    }
}

impl fmt::Display for Numeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        // Peel off base-10^9 chunks, least significant first
        const CHUNK: u32 = 1_000_000_000;
        let mut rest = self.clone();
        let mut chunks = Vec::new();
        while !rest.is_zero() {
            chunks.push(rest.div_rem_small(CHUNK));
        }
        let mut iter = chunks.iter().rev();
        if let Some(head) = iter.next() {
            write!(f, "{}", head)?;
        }
        for chunk in iter {
            write!(f, "{:09}", chunk)?;
        }
        Ok(())
    }
}
