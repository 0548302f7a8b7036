use std::fmt::Debug;
use std::ops::Add;

/// Element types a batch can hold.
///
/// `Acc` is the accumulator used when padding blocks are summed. It is at least as
/// wide as the element itself, and results are narrowed back once per output column.
/// Narrowing an integer accumulator truncates (wraps) like an `as` cast.
pub trait Element: bytemuck::Pod + Default + PartialEq + Debug + Send + Sync {
    type Acc: Copy + Default + Add<Output = Self::Acc> + Send + Sync;

    fn widen(self) -> Self::Acc;

    fn narrow(acc: Self::Acc) -> Self;
}

macro_rules! impl_element {
    ($t:ty, $acc:ty) => {
        impl Element for $t {
            type Acc = $acc;

            #[inline]
            fn widen(self) -> $acc {
                self as $acc
            }

            #[inline]
            fn narrow(acc: $acc) -> $t {
                acc as $t
            }
        }
    };
}

impl_element!(f32, f64);
impl_element!(f64, f64);
impl_element!(i32, i64);
impl_element!(i64, i128);
impl_element!(u8, u64);
impl_element!(u32, u64);
