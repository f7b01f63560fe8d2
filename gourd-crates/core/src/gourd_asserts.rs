#[cfg(not(feature = "debug-checks"))]
pub(crate) const GOURD_ASSERT_LEVEL_DEFINITION: u8 = GOURD_ASSERT_SIMPLE;

#[cfg(feature = "debug-checks")]
pub(crate) const GOURD_ASSERT_LEVEL_DEFINITION: u8 = GOURD_ASSERT_ADVANCED;

pub(crate) const GOURD_ASSERT_SIMPLE: u8 = 1;
pub(crate) const GOURD_ASSERT_MODERATE: u8 = 2;
pub(crate) const GOURD_ASSERT_ADVANCED: u8 = 3;

macro_rules! print_gourd_assert_warning_message {
    () => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION >= $crate::gourd_asserts::GOURD_ASSERT_MODERATE {
            log::warn!("Potential performance degradation: the Gourd assert level is set to {}, meaning many debug asserts are active which may result in performance degradation.", $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION);
        };
    };
}

macro_rules! gourd_assert_simple {
    ($($arg:tt)*) => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION >= $crate::gourd_asserts::GOURD_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

macro_rules! gourd_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION >= $crate::gourd_asserts::GOURD_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

macro_rules! gourd_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION >= $crate::gourd_asserts::GOURD_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

macro_rules! gourd_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION >= $crate::gourd_asserts::GOURD_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

pub(crate) use gourd_assert_advanced;
pub(crate) use gourd_assert_eq_simple;
pub(crate) use gourd_assert_moderate;
pub(crate) use gourd_assert_simple;
pub(crate) use print_gourd_assert_warning_message;
