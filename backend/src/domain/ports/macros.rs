//! Defines helper macros for generating domain port error enums.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor and message checks against the generated port errors.

    use crate::domain::ports::{CompletionRepositoryError, SessionTokenError, UserPersistenceError};

    #[test]
    fn string_fields_accept_borrowed_text() {
        let err = CompletionRepositoryError::conflict("habit toggled twice");
        assert_eq!(
            err,
            CompletionRepositoryError::Conflict {
                message: "habit toggled twice".to_owned(),
            }
        );
        assert_eq!(
            err.to_string(),
            "completion repository conflict: habit toggled twice"
        );
    }

    #[test]
    fn fieldless_variants_get_nullary_constructors() {
        let err = SessionTokenError::expired();
        assert_eq!(err, SessionTokenError::Expired);
        assert_eq!(err.to_string(), "session token expired");
    }

    #[test]
    fn string_fields_accept_owned_text() {
        let err = UserPersistenceError::query(String::from("relation missing"));
        assert!(matches!(
            err,
            UserPersistenceError::Query { ref message } if message == "relation missing"
        ));
        assert_eq!(
            err.to_string(),
            "user repository query failed: relation missing"
        );
    }
}
