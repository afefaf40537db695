//! Boxed error carrier shared by the workspace crates.
//!
//! Each module declares its own `ErrorType` enum and wraps it with
//! [`mk_err_wrapper!`], which yields a module-local `Error`, a `Res<T>` alias
//! and the `error!`/`bail!` shorthands.

use std::{backtrace::Backtrace, error::Error as StdError, fmt};

struct ErrorImpl<T: StdError> {
    tp: T,
    backtrace: Backtrace,
}

pub struct Error<T: StdError>(Box<ErrorImpl<T>>);

pub trait ErrorWrap {
    type E: StdError;
}

impl<T: StdError> Error<T> {
    pub fn new(tp: T) -> Self {
        Self(Box::new(ErrorImpl {
            tp,
            backtrace: Backtrace::capture(),
        }))
    }

    pub fn new_with(backtrace: Backtrace, tp: T) -> Self {
        Self(Box::new(ErrorImpl { tp, backtrace }))
    }

    pub fn error_type(&self) -> &T {
        &self.0.tp
    }

    pub fn unwrap(self) -> (Backtrace, T) {
        let ErrorImpl { tp, backtrace } = *self.0;
        (backtrace, tp)
    }
}

impl<T: StdError> fmt::Display for Error<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.tp, f)
    }
}

impl<T: StdError> fmt::Debug for Error<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.tp)?;
        if let std::backtrace::BacktraceStatus::Captured = self.0.backtrace.status() {
            write!(f, "\n\n{}", self.0.backtrace)?;
        }
        Ok(())
    }
}

impl<T: StdError> StdError for Error<T> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.tp.source()
    }
}

#[macro_export]
macro_rules! mk_err_wrapper {
    {
        $et:ident $({
            $($err_variant:ident => $tp:ty),*
            $(,)?
        })?
    } => {
        impl $crate::ErrorWrap for $et {
            type E = Error;
        }

        #[derive(Debug, ::thiserror::Error)]
        #[error(transparent)]
        #[repr(transparent)]
        pub struct Error($crate::Error<$et>);
        impl ::core::ops::Deref for Error {
            type Target = $crate::Error<$et>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl ::core::ops::DerefMut for Error {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl Error {
            pub fn new(tp: $et) -> Self {
                Self($crate::Error::new(tp))
            }

            pub fn new_with(backtrace: ::std::backtrace::Backtrace, tp: $et) -> Self {
                Self($crate::Error::new_with(backtrace, tp))
            }

            pub fn unwrap(self) -> (::std::backtrace::Backtrace, $et) {
                self.0.unwrap()
            }
        }

        #[allow(unused)]
        pub type Res<T> = Result<T, Error>;

        $($(
            impl ::core::convert::From<<$tp as $crate::ErrorWrap>::E> for Error {
                fn from(value: <$tp as $crate::ErrorWrap>::E) -> Self {
                    let (backtrace, tp) = value.unwrap();
                    Error::new_with(backtrace, $et::$err_variant(tp))
                }
            }
        )*)?

        #[allow(unused)]
        macro_rules! error {
            ($e:expr) => {{
                #[allow(unused_imports)]
                use $et::*;
                Error::new($e)
            }}
        }

        #[allow(unused)]
        macro_rules! bail {
            ($e:expr) => {{
                #[allow(unused_imports)]
                use $et::*;
                return Err(Error::new($e));
            }}
        }
    }
}

#[cfg(test)]
mod test {
    use super::Error;

    #[derive(Debug, thiserror::Error)]
    enum Kind {
        #[error("name `{0}` is not known")]
        Unknown(String),
    }

    #[test]
    fn displays_inner_type() {
        let err = Error::new(Kind::Unknown("quux".into()));
        assert_eq!(err.to_string(), "name `quux` is not known");
        assert!(matches!(err.error_type(), Kind::Unknown(n) if n == "quux"));
    }

    #[test]
    fn unwrap_keeps_type() {
        let err = Error::new(Kind::Unknown("x".into()));
        let (_, tp) = err.unwrap();
        assert!(matches!(tp, Kind::Unknown(n) if n == "x"));
    }
}
