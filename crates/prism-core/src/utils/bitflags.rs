// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The `prism_bitflags!` macro.
//!
//! Generates a `Copy` newtype over an integer with named flag constants, set
//! operations and a `Debug` that prints flag names. Used for buffer usages,
//! shader stages, and vertex attribute masks.

/// Declares a bitflag set.
///
/// ```
/// prism_core::prism_bitflags! {
///     /// Example flags.
///     pub struct Channels: u8 {
///         /// Red.
///         const RED = 1 << 0;
///         /// Green.
///         const GREEN = 1 << 1;
///     }
/// }
///
/// let rg = Channels::RED | Channels::GREEN;
/// assert!(rg.contains(Channels::RED));
/// assert_eq!(rg.len(), 2);
/// ```
#[macro_export]
macro_rules! prism_bitflags {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                $(#[$flag_attr:meta])*
                const $flag:ident = $value:expr;
            )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
        $vis struct $name {
            bits: $ty,
        }

        impl $name {
            $(
                $(#[$flag_attr])*
                pub const $flag: Self = Self { bits: $value };
            )*

            /// The set with no flags.
            pub const EMPTY: Self = Self { bits: 0 };

            /// Every named flag, in declaration order, paired with its name.
            pub const NAMED: &'static [(&'static str, Self)] = &[
                $((stringify!($flag), Self::$flag),)*
            ];

            /// Wraps raw bits, keeping bits that match no named flag.
            pub const fn from_bits_retain(bits: $ty) -> Self {
                Self { bits }
            }

            /// The raw bits.
            pub const fn bits(self) -> $ty {
                self.bits
            }

            /// `true` when no bit is set.
            pub const fn is_empty(self) -> bool {
                self.bits == 0
            }

            /// The number of set bits.
            pub const fn len(self) -> u32 {
                self.bits.count_ones()
            }

            /// `true` if every flag of `other` is set in `self`.
            pub const fn contains(self, other: Self) -> bool {
                self.bits & other.bits == other.bits
            }

            /// `true` if `self` and `other` share at least one flag.
            pub const fn intersects(self, other: Self) -> bool {
                self.bits & other.bits != 0
            }

            /// Sets the flags of `other`.
            pub fn insert(&mut self, other: Self) {
                self.bits |= other.bits;
            }

            /// Clears the flags of `other`.
            pub fn remove(&mut self, other: Self) {
                self.bits &= !other.bits;
            }

            /// Sets or clears the flags of `other` depending on `value`.
            pub fn set(&mut self, other: Self, value: bool) {
                if value {
                    self.insert(other);
                } else {
                    self.remove(other);
                }
            }

            /// Returns a copy with the flags of `other` set.
            #[must_use]
            pub const fn union(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }

            /// Iterates over the names of the named flags present in `self`.
            pub fn iter_names(self) -> impl Iterator<Item = &'static str> {
                Self::NAMED
                    .iter()
                    .filter(move |(_, flag)| !flag.is_empty() && self.contains(*flag))
                    .map(|(name, _)| *name)
            }
        }

        impl core::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                self.union(rhs)
            }
        }

        impl core::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.insert(rhs);
            }
        }

        impl core::ops::BitAnd for $name {
            type Output = Self;
            fn bitand(self, rhs: Self) -> Self {
                Self { bits: self.bits & rhs.bits }
            }
        }

        impl core::ops::Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self { bits: self.bits & !rhs.bits }
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let mut set = f.debug_set();
                let mut known = 0;
                for name in self.iter_names() {
                    set.entry(&format_args!("{}", name));
                }
                for (_, flag) in Self::NAMED {
                    known |= flag.bits;
                }
                let unknown = self.bits & !known;
                if unknown != 0 {
                    set.entry(&format_args!("{:#x}", unknown));
                }
                set.finish()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::prism_bitflags! {
        struct TestFlags: u32 {
            const A = 1 << 0;
            const B = 1 << 1;
            const C = 1 << 2;
        }
    }

    #[test]
    fn set_operations() {
        let mut flags = TestFlags::A | TestFlags::C;
        assert!(flags.contains(TestFlags::A));
        assert!(!flags.contains(TestFlags::A | TestFlags::B));
        assert!(flags.intersects(TestFlags::B | TestFlags::C));
        assert_eq!(flags.len(), 2);

        flags.set(TestFlags::A, false);
        flags |= TestFlags::B;
        assert_eq!(flags, TestFlags::B | TestFlags::C);
        assert_eq!(flags - TestFlags::C, TestFlags::B);
        assert!(TestFlags::EMPTY.is_empty());
    }

    #[test]
    fn debug_lists_names_and_unknown_bits() {
        let flags = TestFlags::A | TestFlags::from_bits_retain(1 << 8);
        assert_eq!(format!("{:?}", flags), "{A, 0x100}");
        assert_eq!(format!("{:?}", TestFlags::EMPTY), "{}");
    }
}
