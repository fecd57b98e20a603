//! Runtime Value Model
//!
//! The closed set of values that flow through the argument binder:
//! - Numbers kept in textual form (`Int`, `Dec`)
//! - Strings, path literals, booleans, `Nil`, `None`
//! - Slices, points, lists and keyword maps
//! - Registered keyword words
//! - The three deferred kinds: `Variable`, `Expression`, `Block`

use indexmap::{IndexMap, IndexSet};

/// A deferred embedded expression, written `(prefix#body)` or `(body)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// Evaluator prefix; `None` selects the host's default evaluator.
    pub prefix: Option<String>,
    pub body: String,
    /// Set when the body was wrapped in a second pair of parentheses,
    /// requesting evaluation at bind time regardless of the target
    /// parameter's declared type.
    pub auto_evaluate: bool,
}

/// A deferred sequence of command invocations, written `{cmd; cmd}`.
///
/// The pieces are kept as source text and go through the full line parser
/// when the block is evaluated, so variable forms work inside blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub commands: Vec<String>,
    /// Set when the block was wrapped in a second pair of braces.
    pub auto_evaluate: bool,
}

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer literal, textual form preserved.
    Int(String),
    /// Decimal literal, textual form preserved.
    Dec(String),
    Str(String),
    /// Filesystem path literal; env-vars are already expanded.
    Path(String),
    Bool(bool),
    /// The distinguished empty value, printed `Nil`.
    Nil,
    /// Explicit null, printed `None`; distinct from `Nil`.
    None,
    Slice(Option<i64>, Option<i64>, Option<i64>),
    /// Comma-separated decimals, textual forms preserved.
    Point(Vec<String>),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    /// A registered keyword word.
    Word(String),
    /// Deferred reference into the session context.
    Variable(String),
    /// Deferred embedded expression.
    Expression(Expression),
    /// Deferred command block.
    Block(Block),
}

impl Value {
    /// Human-readable name of the value kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Dec(_) => "Dec",
            Value::Str(_) => "Str",
            Value::Path(_) => "Path",
            Value::Bool(_) => "Bool",
            Value::Nil => "Nil",
            Value::None => "None",
            Value::Slice(..) => "Slice",
            Value::Point(_) => "Point",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Word(_) => "Word",
            Value::Variable(_) => "Variable",
            Value::Expression(_) => "Expression",
            Value::Block(_) => "Block",
        }
    }

    /// Whether realization of this value is postponed until bind time.
    pub fn is_deferred(&self) -> bool {
        matches!(
            self,
            Value::Variable(_) | Value::Expression(_) | Value::Block(_)
        )
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Nil | Value::None => false,
            Value::Int(text) => text.trim_start_matches('-').chars().any(|c| c != '0'),
            Value::Dec(text) => text.parse::<f64>().map(|d| d != 0.0).unwrap_or(true),
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            _ => true,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(text) => text.parse().ok(),
            _ => None,
        }
    }

    pub fn as_dec(&self) -> Option<f64> {
        match self {
            Value::Int(text) | Value::Dec(text) => text.parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// The open set of registered keyword words.
///
/// Once a name is added it parses as a `Word` literal; the literal parser
/// consults this set before variable-name matching. Two parses of the same
/// registered name compare equal.
#[derive(Debug, Clone, Default)]
pub struct WordSet {
    names: IndexSet<String>,
}

/// Words registered out of the box.
pub const DEFAULT_WORDS: &[&str] = &["as", "else", "in"];

impl WordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A word set pre-populated with [`DEFAULT_WORDS`].
    pub fn with_defaults() -> Self {
        let mut set = Self::new();
        for name in DEFAULT_WORDS {
            set.add(name);
        }
        set
    }

    pub fn add(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Int("3".into()).kind_name(), "Int");
        assert_eq!(Value::Nil.kind_name(), "Nil");
        assert_eq!(Value::Variable("x".into()).kind_name(), "Variable");
    }

    #[test]
    fn test_deferred_kinds() {
        assert!(Value::Variable("x".into()).is_deferred());
        assert!(Value::Expression(Expression {
            prefix: None,
            body: "1".into(),
            auto_evaluate: false,
        })
        .is_deferred());
        assert!(Value::Block(Block { commands: vec![], auto_evaluate: false }).is_deferred());
        assert!(!Value::Int("1".into()).is_deferred());
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::None.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Int("0".into()).is_truthy());
        assert!(!Value::Int("-0".into()).is_truthy());
        assert!(Value::Int("-3".into()).is_truthy());
        assert!(!Value::Dec("0.0".into()).is_truthy());
        assert!(Value::Dec("0.5".into()).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(Value::Str("x".into()).is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
    }

    #[test]
    fn test_word_singleton_equality() {
        let a = Value::Word("as".into());
        let b = Value::Word("as".into());
        assert_eq!(a, b);
        assert_ne!(a, Value::Word("in".into()));
    }

    #[test]
    fn test_word_set() {
        let mut words = WordSet::with_defaults();
        assert!(words.contains("as"));
        assert!(words.contains("else"));
        assert!(!words.contains("also"));
        words.add("also");
        assert!(words.contains("also"));
        // Re-adding keeps a single entry.
        words.add("also");
        assert_eq!(words.iter().filter(|w| *w == "also").count(), 1);
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(Value::Int("-42".into()).as_int(), Some(-42));
        assert_eq!(Value::Dec("2.5".into()).as_dec(), Some(2.5));
        assert_eq!(Value::Int("7".into()).as_dec(), Some(7.0));
        assert_eq!(Value::Str("7".into()).as_int(), None);
    }
}
