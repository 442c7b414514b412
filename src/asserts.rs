#[cfg(not(feature = "debug-checks"))]
pub const CHRONET_ASSERT_LEVEL_DEFINITION: u8 = CHRONET_ASSERT_SIMPLE;

#[cfg(feature = "debug-checks")]
pub const CHRONET_ASSERT_LEVEL_DEFINITION: u8 = CHRONET_ASSERT_EXTREME;

pub const CHRONET_ASSERT_SIMPLE: u8 = 1;
pub const CHRONET_ASSERT_MODERATE: u8 = 2;
pub const CHRONET_ASSERT_ADVANCED: u8 = 3;
pub const CHRONET_ASSERT_EXTREME: u8 = 4;

#[macro_export]
#[doc(hidden)]
macro_rules! chronet_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::CHRONET_ASSERT_LEVEL_DEFINITION >= $crate::asserts::CHRONET_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! chronet_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::CHRONET_ASSERT_LEVEL_DEFINITION >= $crate::asserts::CHRONET_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! chronet_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::CHRONET_ASSERT_LEVEL_DEFINITION >= $crate::asserts::CHRONET_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! chronet_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::CHRONET_ASSERT_LEVEL_DEFINITION >= $crate::asserts::CHRONET_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! chronet_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::asserts::CHRONET_ASSERT_LEVEL_DEFINITION >= $crate::asserts::CHRONET_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}
