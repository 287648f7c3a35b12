//! Reinterpretation checking for integral configuration values.
//!
//! A stored value may be read back at a different integral type only if the
//! target type is not wider than the stored one (the consumer would otherwise
//! read more than was written) and the value fits the target's range. All
//! range arithmetic is carried out in `i128`, which represents every value of
//! every supported type exactly, so signed/unsigned comparisons need no
//! special casing.

mod sealed {
    pub trait Sealed {}
}

/// Type token for the integral types a config entry can hold.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum IntegralType {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
}

impl IntegralType {
    /// Size of the type in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::Bool | Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 => 4,
            Self::U64 | Self::I64 => 8,
        }
    }

    /// Smallest representable value.
    pub const fn min(self) -> i128 {
        match self {
            Self::Bool | Self::U8 | Self::U16 | Self::U32 | Self::U64 => 0,
            Self::I8 => i8::MIN as i128,
            Self::I16 => i16::MIN as i128,
            Self::I32 => i32::MIN as i128,
            Self::I64 => i64::MIN as i128,
        }
    }

    /// Largest representable value.
    pub const fn max(self) -> i128 {
        match self {
            Self::Bool => 1,
            Self::U8 => u8::MAX as i128,
            Self::I8 => i8::MAX as i128,
            Self::U16 => u16::MAX as i128,
            Self::I16 => i16::MAX as i128,
            Self::U32 => u32::MAX as i128,
            Self::I32 => i32::MAX as i128,
            Self::U64 => u64::MAX as i128,
            Self::I64 => i64::MAX as i128,
        }
    }

    /// Rust source name of the type, used in diagnostics and dumps.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::U32 => "u32",
            Self::I32 => "i32",
            Self::U64 => "u64",
            Self::I64 => "i64",
        }
    }
}

/// The integral types usable as config values. Sealed; implemented for
/// `bool` and the eight sized integer widths.
pub trait Integral: Copy + sealed::Sealed + Send + Sync + 'static {
    /// Token for `Self`.
    const TYPE: IntegralType;

    /// Exact widening of the value.
    fn as_i128(self) -> i128;

    /// Inverse of [`as_i128`](Integral::as_i128). Callers must have verified
    /// the value is in range via [`check`] or [`fits`].
    fn from_i128(value: i128) -> Self;
}

macro_rules! impl_integral {
    ($($ty:ty => $token:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl Integral for $ty {
                const TYPE: IntegralType = IntegralType::$token;

                #[inline]
                fn as_i128(self) -> i128 {
                    self as i128
                }

                #[inline]
                fn from_i128(value: i128) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_integral! {
    u8 => U8, i8 => I8,
    u16 => U16, i16 => I16,
    u32 => U32, i32 => I32,
    u64 => U64, i64 => I64,
}

impl sealed::Sealed for bool {}
impl Integral for bool {
    const TYPE: IntegralType = IntegralType::Bool;

    #[inline]
    fn as_i128(self) -> i128 {
        self as i128
    }

    #[inline]
    fn from_i128(value: i128) -> Self {
        value != 0
    }
}

/// Whether a value of type `T` may be re-read as `target`.
#[inline]
pub fn check<T: Integral>(value: T, target: IntegralType) -> bool {
    fits(value.as_i128(), T::TYPE, target)
}

/// Core rule shared with the config layer, which carries its stored values
/// pre-widened.
#[inline]
pub(crate) fn fits(value: i128, source: IntegralType, target: IntegralType) -> bool {
    target.size() <= source.size() && target.min() <= value && value <= target.max()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assert the checker outcome for the five representative values of `T`:
    /// `T::MIN`, the bit pattern of `-1`, `0`, `1`, `T::MAX`.
    fn matrix<T: Integral>(target: IntegralType, expected: [bool; 5]) {
        let from = |v: i128| T::from_i128(v);
        let values = [
            from(T::TYPE.min()),
            from(-1), // wraps to T::MAX for unsigned sources
            from(0),
            from(1),
            from(T::TYPE.max()),
        ];

        for (value, want) in values.into_iter().zip(expected) {
            assert_eq!(
                check(value, target),
                want,
                "{} -> {:?}, value {}",
                T::TYPE.name(),
                target,
                value.as_i128()
            );
        }
    }

    #[test]
    fn signed_to_signed() {
        matrix::<i8>(IntegralType::I8, [true, true, true, true, true]);
        matrix::<i8>(IntegralType::I16, [false, false, false, false, false]);
        matrix::<i8>(IntegralType::I32, [false, false, false, false, false]);
        matrix::<i8>(IntegralType::I64, [false, false, false, false, false]);

        matrix::<i16>(IntegralType::I8, [false, true, true, true, false]);
        matrix::<i16>(IntegralType::I16, [true, true, true, true, true]);
        matrix::<i16>(IntegralType::I32, [false, false, false, false, false]);
        matrix::<i16>(IntegralType::I64, [false, false, false, false, false]);

        matrix::<i32>(IntegralType::I8, [false, true, true, true, false]);
        matrix::<i32>(IntegralType::I16, [false, true, true, true, false]);
        matrix::<i32>(IntegralType::I32, [true, true, true, true, true]);
        matrix::<i32>(IntegralType::I64, [false, false, false, false, false]);

        matrix::<i64>(IntegralType::I8, [false, true, true, true, false]);
        matrix::<i64>(IntegralType::I16, [false, true, true, true, false]);
        matrix::<i64>(IntegralType::I32, [false, true, true, true, false]);
        matrix::<i64>(IntegralType::I64, [true, true, true, true, true]);
    }

    #[test]
    fn signed_to_unsigned() {
        matrix::<i8>(IntegralType::U8, [false, false, true, true, true]);
        matrix::<i8>(IntegralType::U16, [false, false, false, false, false]);
        matrix::<i8>(IntegralType::U32, [false, false, false, false, false]);
        matrix::<i8>(IntegralType::U64, [false, false, false, false, false]);

        matrix::<i16>(IntegralType::U8, [false, false, true, true, false]);
        matrix::<i16>(IntegralType::U16, [false, false, true, true, true]);
        matrix::<i16>(IntegralType::U32, [false, false, false, false, false]);
        matrix::<i16>(IntegralType::U64, [false, false, false, false, false]);

        matrix::<i32>(IntegralType::U8, [false, false, true, true, false]);
        matrix::<i32>(IntegralType::U16, [false, false, true, true, false]);
        matrix::<i32>(IntegralType::U32, [false, false, true, true, true]);
        matrix::<i32>(IntegralType::U64, [false, false, false, false, false]);

        matrix::<i64>(IntegralType::U8, [false, false, true, true, false]);
        matrix::<i64>(IntegralType::U16, [false, false, true, true, false]);
        matrix::<i64>(IntegralType::U32, [false, false, true, true, false]);
        matrix::<i64>(IntegralType::U64, [false, false, true, true, true]);
    }

    #[test]
    fn unsigned_to_signed() {
        matrix::<u8>(IntegralType::I8, [true, false, true, true, false]);
        matrix::<u8>(IntegralType::I16, [false, false, false, false, false]);
        matrix::<u8>(IntegralType::I32, [false, false, false, false, false]);
        matrix::<u8>(IntegralType::I64, [false, false, false, false, false]);

        matrix::<u16>(IntegralType::I8, [true, false, true, true, false]);
        matrix::<u16>(IntegralType::I16, [true, false, true, true, false]);
        matrix::<u16>(IntegralType::I32, [false, false, false, false, false]);
        matrix::<u16>(IntegralType::I64, [false, false, false, false, false]);

        matrix::<u32>(IntegralType::I8, [true, false, true, true, false]);
        matrix::<u32>(IntegralType::I16, [true, false, true, true, false]);
        matrix::<u32>(IntegralType::I32, [true, false, true, true, false]);
        matrix::<u32>(IntegralType::I64, [false, false, false, false, false]);

        matrix::<u64>(IntegralType::I8, [true, false, true, true, false]);
        matrix::<u64>(IntegralType::I16, [true, false, true, true, false]);
        matrix::<u64>(IntegralType::I32, [true, false, true, true, false]);
        matrix::<u64>(IntegralType::I64, [true, false, true, true, false]);
    }

    #[test]
    fn unsigned_to_unsigned() {
        matrix::<u8>(IntegralType::U8, [true, true, true, true, true]);
        matrix::<u8>(IntegralType::U16, [false, false, false, false, false]);
        matrix::<u8>(IntegralType::U32, [false, false, false, false, false]);
        matrix::<u8>(IntegralType::U64, [false, false, false, false, false]);

        matrix::<u16>(IntegralType::U8, [true, false, true, true, false]);
        matrix::<u16>(IntegralType::U16, [true, true, true, true, true]);
        matrix::<u16>(IntegralType::U32, [false, false, false, false, false]);
        matrix::<u16>(IntegralType::U64, [false, false, false, false, false]);

        matrix::<u32>(IntegralType::U8, [true, false, true, true, false]);
        matrix::<u32>(IntegralType::U16, [true, false, true, true, false]);
        matrix::<u32>(IntegralType::U32, [true, true, true, true, true]);
        matrix::<u32>(IntegralType::U64, [false, false, false, false, false]);

        matrix::<u64>(IntegralType::U8, [true, false, true, true, false]);
        matrix::<u64>(IntegralType::U16, [true, false, true, true, false]);
        matrix::<u64>(IntegralType::U32, [true, false, true, true, false]);
        matrix::<u64>(IntegralType::U64, [true, true, true, true, true]);
    }

    #[test]
    fn bool_is_integral() {
        assert!(check(true, IntegralType::Bool));
        assert!(check(true, IntegralType::U8));
        assert!(check(true, IntegralType::I8));
        assert!(!check(true, IntegralType::U16));

        assert!(check(0u8, IntegralType::Bool));
        assert!(check(1u8, IntegralType::Bool));
        assert!(!check(2u8, IntegralType::Bool));
        assert!(!check(1u16, IntegralType::Bool));
    }
}
