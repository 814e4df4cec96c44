//! Cache de memoização.
//!
//! Este módulo envolve uma função para que chamadas repetidas com
//! argumentos iguais devolvam o resultado já calculado, em vez de
//! executá-la de novo.

mod key;
mod memo;

pub use key::{CacheKey, KeyValue};
pub use memo::{wrap, wrap_infallible, CacheStats, Memoized};
