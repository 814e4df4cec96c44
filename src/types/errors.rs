//! Tipos de erro do memocall.

use std::fmt;

use thiserror::Error;

/// Tipo de resultado padrão para operações de configuração.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Posição de um argumento dentro de uma chamada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgPosition {
    /// Argumento posicional (índice a partir de 0).
    Positional(usize),
    /// Argumento nomeado.
    Keyword(String),
}

impl fmt::Display for ArgPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgPosition::Positional(index) => write!(f, "argumento posicional #{}", index),
            ArgPosition::Keyword(name) => write!(f, "argumento nomeado '{}'", name),
        }
    }
}

/// Os argumentos de uma chamada não formam uma chave de cache estável.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidKeyError {
    #[error("Tipo não hashable ({type_name}) no {position}")]
    Unhashable {
        position: ArgPosition,
        type_name: &'static str,
    },

    #[error("NaN não é comparável no {position}")]
    NotANumber { position: ArgPosition },

    #[error("Argumento nomeado '{name}' informado mais de uma vez")]
    DuplicateKeyword { name: String },

    #[error("Esperava no máximo {expected} argumentos posicionais, recebeu {given}")]
    TooManyPositional { expected: usize, given: usize },

    #[error("Argumento nomeado inesperado: '{name}'")]
    UnknownKeyword { name: String },

    #[error("Múltiplos valores para o parâmetro '{name}'")]
    MultipleValues { name: String },

    #[error("Parâmetro obrigatório ausente: '{name}'")]
    MissingArgument { name: String },
}

/// Erros de uma chamada memoizada.
///
/// `E` é o erro da própria função envolvida, devolvido sem alteração.
#[derive(Error, Debug)]
pub enum MemoError<E> {
    #[error("Chave de cache inválida: {0}")]
    InvalidKey(#[from] InvalidKeyError),

    #[error("Função memoizada falhou: {0}")]
    Call(#[source] E),
}

impl<E> MemoError<E> {
    /// Retorna o erro da função envolvida, se for o caso.
    pub fn into_call_error(self) -> Option<E> {
        match self {
            MemoError::Call(e) => Some(e),
            MemoError::InvalidKey(_) => None,
        }
    }

    /// Retorna o erro de chave, se for o caso.
    pub fn as_invalid_key(&self) -> Option<&InvalidKeyError> {
        match self {
            MemoError::InvalidKey(e) => Some(e),
            MemoError::Call(_) => None,
        }
    }
}

/// Erros ao carregar ou salvar a configuração.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Erro de IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro ao parsear TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Erro ao serializar TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuração inválida: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Cria um erro de configuração inválida.
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::Invalid(msg.into())
    }
}
