//! Assinatura declarada de uma função memoizada.
//!
//! Com uma assinatura, posicionais e nomeados são associados aos nomes dos
//! parâmetros antes de gerar a chave, e `sub(10, 5)` passa a coincidir com
//! `sub(b=5, a=10)`.

use crate::types::args::{Args, Value};
use crate::types::errors::InvalidKeyError;

/// Parâmetro declarado.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Nome do parâmetro.
    pub name: String,

    /// Valor padrão, se houver.
    pub default: Option<Value>,
}

/// Lista ordenada de parâmetros.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    /// Cria uma assinatura com os parâmetros na ordem dada, todos obrigatórios.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            params: names
                .into_iter()
                .map(|name| Param {
                    name: name.into(),
                    default: None,
                })
                .collect(),
        }
    }

    /// Define o valor padrão de um parâmetro, acrescentando-o se não existir.
    pub fn with_default(mut self, name: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.params.iter_mut().find(|p| p.name == name) {
            Some(param) => param.default = Some(value),
            None => self.params.push(Param {
                name: name.to_string(),
                default: Some(value),
            }),
        }
        self
    }

    /// Parâmetros declarados.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Associa os argumentos aos parâmetros.
    ///
    /// Retorna um par (nome, valor) por parâmetro, na ordem declarada.
    pub fn bind<'a>(
        &'a self,
        args: &'a Args,
    ) -> Result<Vec<(&'a str, &'a Value)>, InvalidKeyError> {
        if args.positional.len() > self.params.len() {
            return Err(InvalidKeyError::TooManyPositional {
                expected: self.params.len(),
                given: args.positional.len(),
            });
        }

        let mut slots: Vec<Option<&'a Value>> = vec![None; self.params.len()];
        for (slot, value) in slots.iter_mut().zip(&args.positional) {
            *slot = Some(value);
        }

        for (name, value) in &args.keyword {
            let index = self
                .params
                .iter()
                .position(|p| &p.name == name)
                .ok_or_else(|| InvalidKeyError::UnknownKeyword { name: name.clone() })?;
            if slots[index].is_some() {
                return Err(InvalidKeyError::MultipleValues { name: name.clone() });
            }
            slots[index] = Some(value);
        }

        self.params
            .iter()
            .zip(slots)
            .map(|(param, slot)| {
                slot.or(param.default.as_ref())
                    .map(|value| (param.name.as_str(), value))
                    .ok_or_else(|| InvalidKeyError::MissingArgument {
                        name: param.name.clone(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multiply() -> Signature {
        Signature::new(["a", "b"])
            .with_default("c", 1)
            .with_default("d", 1)
    }

    #[test]
    fn test_bind_positional_and_keyword() {
        let sig = multiply();
        let args = Args::new().arg(2).kwarg("d", 5).kwarg("b", 3);
        let bound = sig.bind(&args).unwrap();

        assert_eq!(
            bound,
            vec![
                ("a", &Value::Int(2)),
                ("b", &Value::Int(3)),
                ("c", &Value::Int(1)),
                ("d", &Value::Int(5)),
            ]
        );
    }

    #[test]
    fn test_bind_too_many_positional() {
        let sig = Signature::new(["a"]);
        let err = sig.bind(&Args::new().arg(1).arg(2)).unwrap_err();
        assert_eq!(
            err,
            InvalidKeyError::TooManyPositional {
                expected: 1,
                given: 2
            }
        );
    }

    #[test]
    fn test_bind_unknown_keyword() {
        let sig = Signature::new(["a"]);
        let err = sig.bind(&Args::new().kwarg("z", 1)).unwrap_err();
        assert!(matches!(err, InvalidKeyError::UnknownKeyword { ref name } if name == "z"));
    }

    #[test]
    fn test_bind_multiple_values() {
        let sig = Signature::new(["a", "b"]);
        let err = sig.bind(&Args::new().arg(1).kwarg("a", 2)).unwrap_err();
        assert!(matches!(err, InvalidKeyError::MultipleValues { ref name } if name == "a"));
    }

    #[test]
    fn test_bind_missing_argument() {
        let sig = Signature::new(["a", "b"]);
        let err = sig.bind(&Args::new().arg(1)).unwrap_err();
        assert!(matches!(err, InvalidKeyError::MissingArgument { ref name } if name == "b"));
    }

    #[test]
    fn test_with_default_overrides_existing() {
        let sig = Signature::new(["a", "c"]).with_default("c", 7);
        assert_eq!(sig.params().len(), 2);
        assert_eq!(sig.params()[1].default, Some(Value::Int(7)));
    }
}
