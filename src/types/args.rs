//! Argumentos de chamada: valores posicionais e nomeados.

use serde::{Deserialize, Serialize};

/// Valor de argumento com tipagem dinâmica.
///
/// `Tuple` é uma sequência imutável e pode compor chaves de cache. `List` e
/// `Map` são coleções mutáveis e nunca formam uma chave estável.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Ausência de valor.
    None,
    /// Booleano.
    Bool(bool),
    /// Inteiro com sinal.
    Int(i64),
    /// Ponto flutuante.
    Float(f64),
    /// Texto.
    Str(String),
    /// Bytes imutáveis.
    Bytes(Vec<u8>),
    /// Sequência imutável.
    Tuple(Vec<Value>),
    /// Sequência mutável.
    List(Vec<Value>),
    /// Mapeamento mutável.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Nome curto do tipo, usado em mensagens de erro.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) | Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::None)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                // u64 acima de i64::MAX também cai aqui
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Argumentos de uma chamada.
///
/// Os nomeados preservam a ordem em que foram escritos; a chave de cache
/// é que os trata como conjunto.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Args {
    /// Argumentos posicionais, em ordem.
    #[serde(default)]
    pub positional: Vec<Value>,

    /// Argumentos nomeados, na ordem da chamada.
    #[serde(default)]
    pub keyword: Vec<(String, Value)>,
}

impl Args {
    /// Cria uma lista de argumentos vazia.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona um argumento posicional.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Adiciona um argumento nomeado.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.push((name.into(), value.into()));
        self
    }

    /// Busca um argumento posicional.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Busca um argumento nomeado. Com nomes repetidos, vale o último.
    pub fn get_kw(&self, name: &str) -> Option<&Value> {
        self.keyword
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Posicional no índice ou, na falta dele, o nomeado.
    pub fn param(&self, index: usize, name: &str) -> Option<&Value> {
        self.get(index).or_else(|| self.get_kw(name))
    }

    /// Número total de argumentos.
    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}
