//! Wrapper de memoização.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::cache::key::CacheKey;
use crate::types::args::Args;
use crate::types::config::MemoConfig;
use crate::types::errors::{InvalidKeyError, MemoError};
use crate::types::signature::Signature;

/// Estatísticas do cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Número atual de entradas.
    pub size: usize,

    /// Número de acertos (cache hits).
    pub hits: u64,

    /// Número de erros (cache misses), incluindo os que falharam.
    pub misses: u64,

    /// Chamadas da função envolvida que retornaram erro.
    pub failures: u64,
}

impl CacheStats {
    /// Calcula a taxa de acerto.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Função memoizada.
///
/// Cada instância tem seu próprio cache, criado junto com ela e descartado
/// com ela. O cache só cresce: não há evicção, limite de tamanho nem
/// expiração, então uma instância de vida longa com muitas chaves distintas
/// consome memória sem limite. Use `growth_warning_threshold` em
/// [`MemoConfig`] para ser avisado.
///
/// Resultados são guardados em `Rc` e um hit devolve o mesmo `Rc`, nunca
/// uma cópia.
pub struct Memoized<F, R, E> {
    func: F,
    cache: HashMap<CacheKey, Rc<R>>,
    signature: Option<Signature>,
    config: MemoConfig,
    hits: u64,
    misses: u64,
    failures: u64,
    growth_warned: bool,
    _error: PhantomData<fn() -> E>,
}

/// Envolve uma função que pode falhar.
pub fn wrap<F, R, E>(func: F) -> Memoized<F, R, E>
where
    F: FnMut(&Args) -> Result<R, E>,
{
    Memoized::new(func)
}

/// Envolve uma função que não falha.
pub fn wrap_infallible<F, R>(
    mut func: F,
) -> Memoized<impl FnMut(&Args) -> Result<R, Infallible>, R, Infallible>
where
    F: FnMut(&Args) -> R,
{
    Memoized::new(move |args: &Args| Ok(func(args)))
}

impl<F, R, E> Memoized<F, R, E>
where
    F: FnMut(&Args) -> Result<R, E>,
{
    /// Cria um wrapper com configuração padrão.
    pub fn new(func: F) -> Self {
        Self::with_config(func, MemoConfig::default_config())
    }

    /// Cria um wrapper com a configuração dada.
    pub fn with_config(func: F, config: MemoConfig) -> Self {
        Self {
            func,
            cache: HashMap::new(),
            signature: None,
            config,
            hits: 0,
            misses: 0,
            failures: 0,
            growth_warned: false,
            _error: PhantomData,
        }
    }

    /// Associa argumentos aos parâmetros declarados antes de gerar a chave.
    ///
    /// Sem assinatura, `f(10, 5)` e `f(b=5, a=10)` ocupam entradas
    /// distintas.
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Chama a função, ou devolve o resultado guardado para estes argumentos.
    ///
    /// A chave é gerada antes de qualquer chamada; uma chave inválida
    /// retorna [`MemoError::InvalidKey`] sem executar a função. Erros da
    /// função retornam como [`MemoError::Call`] e nada é guardado.
    pub fn call(&mut self, args: &Args) -> Result<Rc<R>, MemoError<E>> {
        let key = self.key_for(args).inspect_err(|e| {
            tracing::debug!(cache = %self.config.name, error = %e, "Invalid cache key");
        })?;

        if let Some(stored) = self.cache.get(&key) {
            self.hits += 1;
            if self.config.log_hits {
                tracing::debug!(cache = %self.config.name, key = %key.fingerprint(), "Cache hit");
            } else {
                tracing::trace!(cache = %self.config.name, key = %key.fingerprint(), "Cache hit");
            }
            return Ok(Rc::clone(stored));
        }

        self.misses += 1;
        tracing::debug!(cache = %self.config.name, key = %key.fingerprint(), "Cache miss");

        match (self.func)(args) {
            Ok(value) => {
                tracing::trace!(
                    cache = %self.config.name,
                    key = %key.fingerprint(),
                    size = self.cache.len() + 1,
                    "Storing result"
                );
                let stored = Rc::clone(self.cache.entry(key).or_insert_with(|| Rc::new(value)));
                self.check_growth();
                Ok(stored)
            }
            Err(e) => {
                self.failures += 1;
                tracing::debug!(
                    cache = %self.config.name,
                    key = %key.fingerprint(),
                    "Call failed, result not cached"
                );
                Err(MemoError::Call(e))
            }
        }
    }

    /// Verifica se há resultado guardado para estes argumentos.
    ///
    /// Nunca chama a função nem altera as estatísticas.
    pub fn contains(&self, args: &Args) -> Result<bool, InvalidKeyError> {
        Ok(self.cache.contains_key(&self.key_for(args)?))
    }

    /// Número de entradas no cache.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Retorna estatísticas do cache.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.cache.len(),
            hits: self.hits,
            misses: self.misses,
            failures: self.failures,
        }
    }

    pub fn config(&self) -> &MemoConfig {
        &self.config
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Descarta o cache e devolve a função original.
    pub fn into_inner(self) -> F {
        self.func
    }

    fn key_for(&self, args: &Args) -> Result<CacheKey, InvalidKeyError> {
        match &self.signature {
            Some(signature) => CacheKey::bound(args, signature),
            None => CacheKey::from_args(args),
        }
    }

    fn check_growth(&mut self) {
        let Some(threshold) = self.config.growth_warning_threshold else {
            return;
        };
        if !self.growth_warned && self.cache.len() >= threshold {
            self.growth_warned = true;
            tracing::warn!(
                cache = %self.config.name,
                size = self.cache.len(),
                threshold,
                "Memoization cache reached growth threshold; entries are never evicted"
            );
        }
    }
}

impl<F, R, E> fmt::Debug for Memoized<F, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("name", &self.config.name)
            .field("size", &self.cache.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .field("failures", &self.failures)
            .finish_non_exhaustive()
    }
}
