//! Construção de chaves de cache a partir dos argumentos de uma chamada.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::types::args::{Args, Value};
use crate::types::errors::{ArgPosition, InvalidKeyError};
use crate::types::signature::Signature;

/// Projeção hashable de um [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyValue {
    None,
    Bool(bool),
    Int(i64),
    /// Bits do float, com `-0.0` normalizado para `0.0`.
    Float(u64),
    Str(String),
    Bytes(Vec<u8>),
    Tuple(Vec<KeyValue>),
}

impl KeyValue {
    /// Converte um valor, falhando para tipos mutáveis e NaN.
    pub fn from_value(value: &Value, position: &ArgPosition) -> Result<Self, InvalidKeyError> {
        match value {
            Value::None => Ok(KeyValue::None),
            Value::Bool(b) => Ok(KeyValue::Bool(*b)),
            Value::Int(i) => Ok(KeyValue::Int(*i)),
            Value::Float(f) => Self::from_float(*f, position),
            Value::Str(s) => Ok(KeyValue::Str(s.clone())),
            Value::Bytes(b) => Ok(KeyValue::Bytes(b.clone())),
            Value::Tuple(items) => items
                .iter()
                .map(|item| Self::from_value(item, position))
                .collect::<Result<Vec<_>, _>>()
                .map(KeyValue::Tuple),
            Value::List(_) | Value::Map(_) => Err(InvalidKeyError::Unhashable {
                position: position.clone(),
                type_name: value.type_name(),
            }),
        }
    }

    fn from_float(f: f64, position: &ArgPosition) -> Result<Self, InvalidKeyError> {
        if f.is_nan() {
            return Err(InvalidKeyError::NotANumber {
                position: position.clone(),
            });
        }
        // -0.0 == 0.0, mas os bits diferem
        let f = if f == 0.0 { 0.0 } else { f };
        Ok(KeyValue::Float(f.to_bits()))
    }

    fn write_to(&self, hasher: &mut Sha256) {
        match self {
            KeyValue::None => hasher.update([0u8]),
            KeyValue::Bool(b) => hasher.update([1u8, *b as u8]),
            KeyValue::Int(i) => {
                hasher.update([2u8]);
                hasher.update(i.to_le_bytes());
            }
            KeyValue::Float(bits) => {
                hasher.update([3u8]);
                hasher.update(bits.to_le_bytes());
            }
            KeyValue::Str(s) => {
                hasher.update([4u8]);
                hasher.update((s.len() as u64).to_le_bytes());
                hasher.update(s.as_bytes());
            }
            KeyValue::Bytes(b) => {
                hasher.update([5u8]);
                hasher.update((b.len() as u64).to_le_bytes());
                hasher.update(b);
            }
            KeyValue::Tuple(items) => {
                hasher.update([6u8]);
                hasher.update((items.len() as u64).to_le_bytes());
                for item in items {
                    item.write_to(hasher);
                }
            }
        }
    }
}

/// Chave de cache de uma chamada.
///
/// Posicionais em ordem; nomeados como conjunto (ordenados por nome), de
/// modo que `f(a, b, c=4, d=5)` e `f(a, b, d=5, c=4)` geram a mesma chave.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    positional: Vec<KeyValue>,
    keyword: BTreeMap<String, KeyValue>,
}

impl CacheKey {
    /// Gera a chave literal da chamada.
    ///
    /// Um argumento passado por posição e o mesmo passado por nome geram
    /// chaves diferentes. Para unificá-los, use [`CacheKey::bound`].
    pub fn from_args(args: &Args) -> Result<Self, InvalidKeyError> {
        let positional = args
            .positional
            .iter()
            .enumerate()
            .map(|(i, v)| KeyValue::from_value(v, &ArgPosition::Positional(i)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut keyword = BTreeMap::new();
        for (name, value) in &args.keyword {
            let kv = KeyValue::from_value(value, &ArgPosition::Keyword(name.clone()))?;
            if keyword.insert(name.clone(), kv).is_some() {
                return Err(InvalidKeyError::DuplicateKeyword { name: name.clone() });
            }
        }

        Ok(Self {
            positional,
            keyword,
        })
    }

    /// Gera a chave após associar os argumentos aos parâmetros declarados.
    ///
    /// A chave resultante só tem nomeados, então `sub(10, 5)` e
    /// `sub(b=5, a=10)` coincidem.
    pub fn bound(args: &Args, signature: &Signature) -> Result<Self, InvalidKeyError> {
        let keyword = signature
            .bind(args)?
            .into_iter()
            .map(|(name, value)| {
                let position = ArgPosition::Keyword(name.to_string());
                KeyValue::from_value(value, &position).map(|kv| (name.to_string(), kv))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(Self {
            positional: Vec::new(),
            keyword,
        })
    }

    /// Impressão digital SHA256 da chave, em hex (16 caracteres).
    ///
    /// Usada apenas para identificar entradas nos logs.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.positional.len() as u64).to_le_bytes());
        for value in &self.positional {
            value.write_to(&mut hasher);
        }
        hasher.update((self.keyword.len() as u64).to_le_bytes());
        for (name, value) in &self.keyword {
            hasher.update((name.len() as u64).to_le_bytes());
            hasher.update(name.as_bytes());
            value.write_to(&mut hasher);
        }

        let digest = hex::encode(hasher.finalize());
        digest[..16].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_order_is_ignored() {
        let k1 = CacheKey::from_args(&Args::new().arg(2).arg(3).kwarg("c", 4).kwarg("d", 5))
            .unwrap();
        let k2 = CacheKey::from_args(&Args::new().arg(2).arg(3).kwarg("d", 5).kwarg("c", 4))
            .unwrap();

        assert_eq!(k1, k2);
        assert_eq!(k1.fingerprint(), k2.fingerprint());
    }

    #[test]
    fn test_positional_order_matters() {
        let k1 = CacheKey::from_args(&Args::new().arg(1).arg(2)).unwrap();
        let k2 = CacheKey::from_args(&Args::new().arg(2).arg(1)).unwrap();

        assert_ne!(k1, k2);
    }

    #[test]
    fn test_positional_and_keyword_differ_literally() {
        let k1 = CacheKey::from_args(&Args::new().arg(10).arg(5)).unwrap();
        let k2 = CacheKey::from_args(&Args::new().kwarg("b", 5).kwarg("a", 10)).unwrap();

        assert_ne!(k1, k2);
    }

    #[test]
    fn test_list_is_unhashable() {
        let args = Args::new().arg(Value::List(vec![Value::Int(1), Value::Int(2)]));
        let err = CacheKey::from_args(&args).unwrap_err();

        assert_eq!(
            err,
            InvalidKeyError::Unhashable {
                position: ArgPosition::Positional(0),
                type_name: "list",
            }
        );
    }

    #[test]
    fn test_list_nested_in_tuple_is_unhashable() {
        let nested = Value::Tuple(vec![Value::Int(1), Value::List(vec![])]);
        let err = CacheKey::from_args(&Args::new().kwarg("x", nested)).unwrap_err();

        assert!(matches!(
            err,
            InvalidKeyError::Unhashable { position: ArgPosition::Keyword(ref n), .. } if n == "x"
        ));
    }

    #[test]
    fn test_tuple_is_hashable() {
        let t = || Value::Tuple(vec![Value::Int(1), Value::from("a")]);
        let k1 = CacheKey::from_args(&Args::new().arg(t())).unwrap();
        let k2 = CacheKey::from_args(&Args::new().arg(t())).unwrap();

        assert_eq!(k1, k2);
    }

    #[test]
    fn test_nan_is_rejected() {
        let err = CacheKey::from_args(&Args::new().arg(f64::NAN)).unwrap_err();
        assert!(matches!(err, InvalidKeyError::NotANumber { .. }));
    }

    #[test]
    fn test_float_normalization() {
        let int = CacheKey::from_args(&Args::new().arg(1)).unwrap();
        let float = CacheKey::from_args(&Args::new().arg(1.0)).unwrap();
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(int, float);

        let again = CacheKey::from_args(&Args::new().arg(1.0)).unwrap();
        assert_eq!(float, again);

        let pos = CacheKey::from_args(&Args::new().arg(0.0)).unwrap();
        let neg = CacheKey::from_args(&Args::new().arg(-0.0)).unwrap();
        assert_eq!(pos, neg);

        let half = CacheKey::from_args(&Args::new().arg(0.5)).unwrap();
        assert_ne!(half, pos);
    }

    #[test]
    fn test_bool_is_not_int() {
        let b = CacheKey::from_args(&Args::new().arg(true)).unwrap();
        let i = CacheKey::from_args(&Args::new().arg(1)).unwrap();
        assert_ne!(b, i);
    }

    #[test]
    fn test_duplicate_keyword_rejected() {
        let args = Args::new().kwarg("c", 1).kwarg("c", 2);
        let err = CacheKey::from_args(&args).unwrap_err();
        assert_eq!(
            err,
            InvalidKeyError::DuplicateKeyword {
                name: "c".to_string()
            }
        );
    }

    #[test]
    fn test_fingerprint_distinguishes_shapes() {
        let pos = CacheKey::from_args(&Args::new().arg("ab")).unwrap();
        let split = CacheKey::from_args(&Args::new().arg("a").arg("b")).unwrap();

        assert_eq!(pos.fingerprint().len(), 16);
        assert_ne!(pos.fingerprint(), split.fingerprint());
    }
}
