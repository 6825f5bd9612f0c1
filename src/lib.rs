//! # BrainrotSQL
//!
//! > **SQL, but every keyword is a meme.**
//!
//! BrainrotSQL compiles a dialect in which each SQL keyword is spelled with
//! one of several interchangeable aliases into ordinary SQL text.
//!
//! ## Quick Example
//!
//! ```rust
//! let sql = brainrot_sql::compile("tralalero id name lirili users").unwrap();
//! assert_eq!(sql, "SELECT id, name FROM users");
//! ```
//!
//! ## Pipeline
//!
//! | Stage        | Module         | Produces              |
//! |--------------|----------------|-----------------------|
//! | Tokenizer    | [`tokenizer`]  | token slices          |
//! | Parser       | [`parser`]     | [`ast::Query`]        |
//! | Transpiler   | [`transpiler`] | SQL text              |
//! | Engine       | [`engine`]     | rows or a row count   |
//!
//! Alias lookup goes through an [`AliasRegistry`] that is built once and
//! then only read. Use [`Compiler`] to compile against a custom vocabulary.

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod keywords;
pub mod parser;
pub mod tokenizer;
pub mod transpiler;

use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::ast::Query;
use crate::error::BrainrotResult;
use crate::keywords::AliasRegistry;
use crate::parser::Parser;
use crate::transpiler::ToSql;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::engine::{BrainrotDB, Outcome, RowSet, TransactionEvent};
    pub use crate::error::*;
    pub use crate::keywords::{AliasRegistry, Operation};
    pub use crate::transpiler::ToSql;
    pub use crate::{Compiler, compile, parse};
}

/// Compiles BrainrotSQL against one frozen alias registry.
///
/// Cloning is cheap; clones share the registry.
#[derive(Debug, Clone)]
pub struct Compiler {
    registry: Arc<AliasRegistry>,
}

impl Compiler {
    pub fn new(registry: AliasRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// A compiler over the standard vocabulary.
    pub fn standard() -> Self {
        Self::new(standard_registry().clone())
    }

    pub fn registry(&self) -> &AliasRegistry {
        &self.registry
    }

    /// Parse text into a query model.
    pub fn parse(&self, text: &str) -> BrainrotResult<Query> {
        Parser::new(&self.registry).parse(text)
    }

    /// Parse text and render it as SQL.
    pub fn compile(&self, text: &str) -> BrainrotResult<String> {
        let sql = self.parse(text)?.to_sql();
        debug!(sql = %sql, "compiled");
        Ok(sql)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_registry() -> &'static AliasRegistry {
    static STANDARD: OnceLock<AliasRegistry> = OnceLock::new();
    STANDARD.get_or_init(AliasRegistry::standard)
}

/// Parse BrainrotSQL text with the standard vocabulary.
///
/// # Example
///
/// ```
/// use brainrot_sql::parse;
///
/// let query = parse("bombombini lirili users patapim email bobrito girafa").unwrap();
/// assert_eq!(query.table(), Some("users"));
/// ```
pub fn parse(text: &str) -> BrainrotResult<Query> {
    Parser::new(standard_registry()).parse(text)
}

/// Compile BrainrotSQL text to SQL with the standard vocabulary.
pub fn compile(text: &str) -> BrainrotResult<String> {
    let sql = parse(text)?.to_sql();
    debug!(sql = %sql, "compiled");
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::Operation;

    #[test]
    fn test_compile_standard() {
        assert_eq!(
            compile("tralalero * lirili users").unwrap(),
            "SELECT * FROM users"
        );
    }

    #[test]
    fn test_compiler_with_extended_registry() {
        let mut registry = AliasRegistry::standard();
        registry.extend(Operation::Delete, ["yeet"]).unwrap();
        let compiler = Compiler::new(registry);
        assert_eq!(
            compiler.compile("yeet lirili sessions").unwrap(),
            "DELETE FROM sessions"
        );
        // The shared standard registry is untouched.
        assert!(compile("yeet lirili sessions").is_err());
    }

    #[test]
    fn test_compiler_clones_share_registry() {
        let compiler = Compiler::standard();
        let clone = compiler.clone();
        assert!(std::ptr::eq(compiler.registry(), clone.registry()));
    }
}
