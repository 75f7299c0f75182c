// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros shared by the status enums.

/// Generate a `Display` impl that maps enum variants to the same upper-case
/// strings the board shows and the snapshot stores.
///
/// ```ignore
/// crate::simple_display! {
///     TicketStatus {
///         Open => "OPEN",
///         Cancelled => "CANCELLED",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident => $str:expr ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant => $str, )+
                })
            }
        }
    };
}
