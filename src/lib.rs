//! # memocall
//!
//! Memoização de funções com argumentos posicionais e nomeados.
//!
//! Uma função envolvida por [`wrap`] é executada no máximo uma vez para
//! cada chave de cache distinta. A chave considera os posicionais em ordem
//! e os nomeados como conjunto, então `f(2, 3, c=4, d=5)` e
//! `f(2, 3, d=5, c=4)` compartilham a mesma entrada.
//!
//! ```
//! use memocall::{args, wrap_infallible};
//!
//! let mut multiply = wrap_infallible(|a: &memocall::Args| {
//!     a.positional.iter().chain(a.keyword.iter().map(|(_, v)| v))
//!         .filter_map(|v| v.as_int())
//!         .product::<i64>()
//! });
//!
//! assert_eq!(*multiply.call(&args![2, 3; c = 4, d = 5]).unwrap(), 120);
//! assert_eq!(*multiply.call(&args![2, 3; d = 5, c = 4]).unwrap(), 120);
//! assert_eq!(multiply.stats().misses, 1);
//! ```
//!
//! ## Módulos
//!
//! - [`cache`] - Chaves de cache e o wrapper [`Memoized`]
//! - [`types`] - Argumentos, assinaturas, configuração e erros

pub mod cache;
pub mod types;

pub use cache::{wrap, wrap_infallible, CacheKey, CacheStats, Memoized};
pub use types::args::{Args, Value};
pub use types::config::MemoConfig;
pub use types::errors::{ArgPosition, ConfigError, ConfigResult, InvalidKeyError, MemoError};
pub use types::signature::Signature;

/// Monta [`Args`]: posicionais separados por vírgula e, após `;`, os
/// nomeados no formato `nome = valor`.
///
/// ```
/// use memocall::{args, Value};
///
/// let a = args![10; b = 5];
/// assert_eq!(a.get(0), Some(&Value::Int(10)));
/// assert_eq!(a.get_kw("b"), Some(&Value::Int(5)));
///
/// let only_named = args![; a = 1];
/// assert!(only_named.positional.is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($pos:expr),* ; $($name:ident = $val:expr),* $(,)?) => {
        $crate::Args::new()
            $(.arg($pos))*
            $(.kwarg(stringify!($name), $val))*
    };
    ($($pos:expr),+ $(,)?) => {
        $crate::Args::new()$(.arg($pos))+
    };
}
