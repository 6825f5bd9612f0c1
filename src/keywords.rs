//! The alias registry: which surface tokens stand for which SQL operation.
//!
//! ```text
//! tralalero tralala id name lirili larila users
//! ────┬──── ───┬─── ───┬─── ──┬─── ──┬─── ──┬──
//!     │        │       │      │      │      └── table
//!     │        │       │      └──────┴── FROM aliases
//!     │        │       └── columns
//!     └────────┴── SELECT aliases
//! ```
//!
//! A registry is built once at startup (the seed table plus any configured
//! extensions) and then shared read-only with every parse.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{BrainrotError, BrainrotResult};

/// A canonical SQL concept addressed by one or more aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Select,
    Update,
    Insert,
    Delete,
    From,
    Where,
    Join,
    And,
    Or,
    Not,
    Is,
    Null,
    BeginTransaction,
    Commit,
    Rollback,
    Values,
    Set,
    SetEqual,
    All,
}

impl Operation {
    pub const VARIANTS: [Operation; 19] = [
        Operation::Select,
        Operation::Update,
        Operation::Insert,
        Operation::Delete,
        Operation::From,
        Operation::Where,
        Operation::Join,
        Operation::And,
        Operation::Or,
        Operation::Not,
        Operation::Is,
        Operation::Null,
        Operation::BeginTransaction,
        Operation::Commit,
        Operation::Rollback,
        Operation::Values,
        Operation::Set,
        Operation::SetEqual,
        Operation::All,
    ];

    /// Canonical upper-case name, as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Select => "SELECT",
            Operation::Update => "UPDATE",
            Operation::Insert => "INSERT",
            Operation::Delete => "DELETE",
            Operation::From => "FROM",
            Operation::Where => "WHERE",
            Operation::Join => "JOIN",
            Operation::And => "AND",
            Operation::Or => "OR",
            Operation::Not => "NOT",
            Operation::Is => "IS",
            Operation::Null => "NULL",
            Operation::BeginTransaction => "BEGIN_TRANSACTION",
            Operation::Commit => "COMMIT",
            Operation::Rollback => "ROLLBACK",
            Operation::Values => "VALUES",
            Operation::Set => "SET",
            Operation::SetEqual => "SET_EQUAL",
            Operation::All => "ALL",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = BrainrotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace([' ', '-'], "_");
        Operation::VARIANTS
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| BrainrotError::Config(format!("Unknown operation '{}'", s)))
    }
}

/// The standard vocabulary.
const SEED: &[(Operation, &[&str])] = &[
    (Operation::Select, &["tralalero", "tralala", "tralaleritos", "troppi", "trippa"]),
    (Operation::Update, &["cappuccino", "assassino", "capuccina", "caramello"]),
    (Operation::Insert, &["bombardiro", "crocodilo", "bardiro", "bombardi"]),
    (Operation::Delete, &["bombombini", "gusini", "bomby", "bombiti"]),
    (Operation::From, &["lirili", "larila", "lirilì", "larilà"]),
    (Operation::Where, &["patapim", "brrbrr", "brrbrius", "patapum"]),
    (Operation::Join, &["boneca", "ambalabu", "bonecus", "ambalabra"]),
    (Operation::And, &["camelo", "frigo", "frigus", "camelus"]),
    (Operation::Or, &["vaca", "saturno", "vacus", "saturnito"]),
    (Operation::Not, &["zibra", "zubra", "zibrus", "zubralini"]),
    (Operation::Is, &["bobrito", "bandito", "bobrini", "banditi"]),
    (Operation::Null, &["girafa", "celestre", "celestra"]),
    (Operation::BeginTransaction, &["tung", "sahur", "tung", "tung"]),
    (Operation::Commit, &["ballerina", "cappuccina"]),
    (Operation::Rollback, &["chimpanzini", "banana", "chimp"]),
    (Operation::Values, &["trulimero", "valuerus", "valus"]),
    (Operation::Set, &["cocofanto", "elefanto", "cococo"]),
    (Operation::SetEqual, &["burbaloni", "lulilolli", "burburifici"]),
    (Operation::All, &["frulli", "frulla", "frullifrullo"]),
];

/// Tokens with grammatical meaning of their own; never valid as aliases.
const RESERVED: &[&str] = &[",", "(", ")", "*", "=", "!=", "<>", "<", ">", "<=", ">="];

/// Maps operations to their ordered aliases, with a case-insensitive
/// reverse index from alias to operation.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    aliases: BTreeMap<Operation, Vec<String>>,
    index: HashMap<String, Operation>,
}

impl AliasRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry seeded with the standard vocabulary.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for (op, aliases) in SEED {
            // The seed table is conflict-free; the unit tests hold it to that.
            if let Err(err) = registry.extend(*op, aliases.iter().copied()) {
                tracing::error!("invalid seed alias table: {}", err);
            }
        }
        registry
    }

    /// Bind one alias to an operation.
    ///
    /// Re-registering an existing pair is a no-op.
    pub fn register(&mut self, op: Operation, alias: impl Into<String>) -> BrainrotResult<()> {
        self.extend(op, [alias.into()])
    }

    /// Bind several aliases to an operation, all or nothing.
    ///
    /// Every alias is validated before anything changes, and the reverse
    /// index is rebuilt on the side and swapped in whole.
    pub fn extend<I, S>(&mut self, op: Operation, aliases: I) -> BrainrotResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut staged: Vec<String> = Vec::new();
        for alias in aliases {
            let alias = alias.into();
            validate_alias(&alias)?;
            let key = fold(&alias);
            if let Some(&bound) = self.index.get(&key) {
                if bound != op {
                    return Err(BrainrotError::DuplicateBinding {
                        alias,
                        bound,
                        requested: op,
                    });
                }
                continue;
            }
            if !staged.iter().any(|s| fold(s) == key) {
                staged.push(alias);
            }
        }

        if staged.is_empty() {
            return Ok(());
        }

        let mut aliases = self.aliases.clone();
        aliases.entry(op).or_default().extend(staged);
        let index = build_index(&aliases);

        self.aliases = aliases;
        self.index = index;
        Ok(())
    }

    /// The operation a token stands for, ignoring case.
    pub fn resolve(&self, token: &str) -> Option<Operation> {
        self.index.get(&fold(token)).copied()
    }

    /// Whether the token is any alias of `op`.
    pub fn is_alias_of(&self, token: &str, op: Operation) -> bool {
        self.resolve(token) == Some(op)
    }

    /// Whether the token is an alias at all.
    pub fn is_keyword(&self, token: &str) -> bool {
        self.resolve(token).is_some()
    }

    /// Aliases of `op` in registration order.
    pub fn aliases_of(&self, op: Operation) -> &[String] {
        self.aliases.get(&op).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first registered alias of `op`.
    pub fn canonical(&self, op: Operation) -> Option<&str> {
        self.aliases_of(op).first().map(String::as_str)
    }

    /// Iterate over every operation with at least one alias.
    pub fn iter(&self) -> impl Iterator<Item = (Operation, &[String])> {
        self.aliases.iter().map(|(op, aliases)| (*op, aliases.as_slice()))
    }

    /// Total number of aliases.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

fn fold(token: &str) -> String {
    token.to_lowercase()
}

fn validate_alias(alias: &str) -> BrainrotResult<()> {
    if alias.is_empty()
        || alias.chars().any(|c| c.is_whitespace() || matches!(c, ',' | '(' | ')' | '\''))
        || RESERVED.contains(&alias)
    {
        return Err(BrainrotError::InvalidAlias(alias.to_string()));
    }
    Ok(())
}

fn build_index(aliases: &BTreeMap<Operation, Vec<String>>) -> HashMap<String, Operation> {
    aliases
        .iter()
        .flat_map(|(op, list)| list.iter().map(move |alias| (fold(alias), *op)))
        .collect()
}
