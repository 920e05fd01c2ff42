// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Declares a configuration section together with its sparse edit mirror.
//!
//! ```ignore
//! config_section! {
//!     /// Bluetooth settings
//!     pub struct BluetoothConfig / EditedBluetoothConfig {
//!         enabled: bool,
//!         fixed_pin: u32,
//!     }
//!     sections {
//!         pairing: PairingConfig,
//!     }
//! }
//! ```
//!
//! Leaves become `Edit<T>` in the mirror; nested sections become the nested
//! section's own mirror. The mirror rejects unknown keys, so an edit document
//! can only name fields the full section actually has.

macro_rules! config_section {
    (
        $(#[$meta:meta])*
        pub struct $name:ident / $edited:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
        $( sections {
            $( $(#[$smeta:meta])* $section:ident : $sty:ty ),* $(,)?
        } )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $ty, )*
            $($( $(#[$smeta])* pub $section: $sty, )*)?
        }

        #[doc = concat!("Sparse staged edits for [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
        #[serde(default, rename_all = "camelCase", deny_unknown_fields)]
        pub struct $edited {
            $(
                #[serde(skip_serializing_if = "crate::model::is_untouched")]
                pub $field: $crate::model::Edit<$ty>,
            )*
            $($(
                #[serde(skip_serializing_if = "crate::model::is_untouched")]
                pub $section: <$sty as $crate::model::Reconcile>::Edit,
            )*)?
        }

        impl $crate::model::Reconcile for $name {
            type Edit = $edited;

            fn reconcile(&self, edit: &$edited) -> Self {
                Self {
                    $( $field: edit.$field.resolve(&self.$field), )*
                    $($(
                        $section: $crate::model::Reconcile::reconcile(
                            &self.$section,
                            &edit.$section,
                        ),
                    )*)?
                }
            }
        }

        impl $crate::model::StagedEdit for $edited {
            fn is_untouched(&self) -> bool {
                true
                    $( && $crate::model::StagedEdit::is_untouched(&self.$field) )*
                    $($( && $crate::model::StagedEdit::is_untouched(&self.$section) )*)?
            }

            fn has_overrides(&self) -> bool {
                false
                    $( || $crate::model::StagedEdit::has_overrides(&self.$field) )*
                    $($( || $crate::model::StagedEdit::has_overrides(&self.$section) )*)?
            }
        }
    };
}
