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


//! Compact flag sets.
//!
//! The binding cache keeps a few "re-send before the next draw" bits per
//! pipeline kind and one dirty bit per shader stage. Both are declared with
//! [`dxr_bitflags!`](crate::dxr_bitflags).

/// Declares a `Copy` newtype over an integer with named flag constants.
///
/// Flags may be combinations of other flags. `Debug` prints the named flags
/// that cover the value, in declaration order, followed by any leftover bits.
#[macro_export]
#[doc(hidden)]
macro_rules! dxr_bitflags {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                $(#[$flag_attr:meta])*
                const $flag_name:ident = $flag_value:expr;
            )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name {
            bits: $ty,
        }

        impl $name {
            $(
                $(#[$flag_attr])*
                pub const $flag_name: Self = Self { bits: $flag_value };
            )*

            /// No flag set.
            pub const EMPTY: Self = Self { bits: 0 };

            const NAMED: &'static [(&'static str, $ty)] =
                &[$((stringify!($flag_name), $flag_value)),*];

            /// Wraps raw bits as they are, undeclared bits included.
            pub const fn from_bits_retain(bits: $ty) -> Self {
                Self { bits }
            }

            /// The raw value.
            pub const fn bits(&self) -> $ty {
                self.bits
            }

            /// Whether no bit is set.
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }

            /// Whether every bit of `other` is set.
            pub const fn contains(&self, other: Self) -> bool {
                self.bits & other.bits == other.bits
            }

            /// Whether at least one bit of `other` is set.
            pub const fn intersects(&self, other: Self) -> bool {
                self.bits & other.bits != 0
            }

            /// Sets the bits of `other`.
            pub fn insert(&mut self, other: Self) {
                *self = self.with(other);
            }

            /// Clears the bits of `other`.
            pub fn remove(&mut self, other: Self) {
                *self = self.without(other);
            }

            /// Sets or clears the bits of `other`.
            pub fn set(&mut self, other: Self, value: bool) {
                if value {
                    self.insert(other);
                } else {
                    self.remove(other);
                }
            }

            /// Clears the bits of `other`, reporting whether any of them was set.
            pub fn take(&mut self, other: Self) -> bool {
                let was_set = self.intersects(other);
                self.remove(other);
                was_set
            }

            /// A copy with the bits of `other` set.
            #[must_use]
            pub const fn with(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }

            /// A copy with the bits of `other` cleared.
            #[must_use]
            pub const fn without(self, other: Self) -> Self {
                Self { bits: self.bits & !other.bits }
            }
        }

        impl core::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                self.with(rhs)
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

        impl core::ops::BitAndAssign for $name {
            fn bitand_assign(&mut self, rhs: Self) {
                self.bits &= rhs.bits;
            }
        }

        impl core::ops::Not for $name {
            type Output = Self;
            fn not(self) -> Self {
                Self { bits: !self.bits }
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{} {{ ", stringify!($name))?;
                let mut rest = self.bits;
                let mut separator = "";
                for &(name, value) in Self::NAMED {
                    if value != 0 && (rest & value) == value {
                        write!(f, "{separator}{name}")?;
                        rest &= !value;
                        separator = " | ";
                    }
                }
                if rest != 0 {
                    write!(f, "{separator}UNKNOWN({rest:#x})")?;
                    separator = " | ";
                }
                if separator.is_empty() {
                    f.write_str("EMPTY")?;
                }
                f.write_str(" }")
            }
        }
    };
}
