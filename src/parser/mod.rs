//! BrainrotSQL parser.
//!
//! A token-driven state machine: the statement keyword picks the grammar,
//! then each token is fed to the current [`State`] until the input runs
//! out. Only terminal states accept the end of input.
//!
//! # Grammar
//!
//! ```text
//! SELECT ::= SELECT_OP ('*' | column (','? column)*) FROM_OP table
//!            (JOIN_OP table)* [WHERE]
//! INSERT ::= INSERT_OP table ['('] column* [')'] VALUES_OP ['('] value+ [')']
//! UPDATE ::= UPDATE_OP table SET_OP column SET_EQUAL_OP value
//!            (',' column SET_EQUAL_OP value)* [WHERE]
//! DELETE ::= DELETE_OP FROM_OP table [WHERE]
//! WHERE  ::= WHERE_OP field operator value (AND_OP|OR_OP field operator value)*
//! ```

mod states;

use tracing::trace;

use crate::ast::{Query, QueryKind};
use crate::error::{BrainrotError, BrainrotResult};
use crate::keywords::AliasRegistry;
use crate::tokenizer::tokenize;

use states::{State, Transition};

/// Parses BrainrotSQL text against one alias registry.
pub struct Parser<'r> {
    registry: &'r AliasRegistry,
}

impl<'r> Parser<'r> {
    pub fn new(registry: &'r AliasRegistry) -> Self {
        Self { registry }
    }

    /// Parse one complete statement.
    pub fn parse(&self, input: &str) -> BrainrotResult<Query> {
        let mut tokens = tokenize(input).into_iter();

        let first = tokens
            .next()
            .ok_or_else(|| BrainrotError::end_of_input("a statement keyword"))?;
        let kind = self
            .registry
            .resolve(first)
            .and_then(QueryKind::from_operation)
            .ok_or_else(|| BrainrotError::UnsupportedQueryKind(first.to_string()))?;

        let mut query = Query::new(kind);
        let mut state = State::KeywordTail {
            op: kind.operation(),
            then: Box::new(State::entry(kind)),
        };

        for token in tokens {
            state = self.feed(state, token, &mut query)?;
        }
        state.finish(&query)?;
        Ok(query)
    }

    /// Run transitions until the token is consumed.
    ///
    /// A deferring state always hands the token to a state that consumes it
    /// or fails, so this terminates.
    fn feed(&self, mut state: State, token: &str, query: &mut Query) -> BrainrotResult<State> {
        loop {
            trace!(state = state.name(), token, "transition");
            match state.step(token, query, self.registry)? {
                Transition::Consume(next) => return Ok(next),
                Transition::Defer(next) => state = next,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CompareOp, Condition, LogicalOp, Value};
    use crate::keywords::Operation;

    fn parse(input: &str) -> BrainrotResult<Query> {
        let registry = AliasRegistry::standard();
        Parser::new(&registry).parse(input)
    }

    #[test]
    fn test_simple_select() {
        let q = parse("tralalero id name lirili users").unwrap();
        assert_eq!(q.kind(), QueryKind::Select);
        assert_eq!(q.table(), Some("users"));
        assert_eq!(q.columns(), ["id", "name"]);
        assert!(q.where_conditions().is_empty());
    }

    #[test]
    fn test_select_star_and_all_alias() {
        let star = parse("tralalero * lirili users").unwrap();
        let all = parse("tralalero tralala frulli frulla lirili larila users").unwrap();
        assert_eq!(star.columns(), ["*"]);
        assert_eq!(star, all);
    }

    #[test]
    fn test_select_comma_separated_columns() {
        let q = parse("tralalero id, name ,email lirili users").unwrap();
        assert_eq!(q.columns(), ["id", "name", "email"]);
    }

    #[test]
    fn test_select_with_joins() {
        let q = parse(
            "tralalero users.name orders.total lirili users boneca ambalabu orders bonecus items",
        )
        .unwrap();
        assert_eq!(q.joined_tables(), ["orders", "items"]);
    }

    #[test]
    fn test_join_after_where_is_rejected() {
        let err = parse("tralalero * lirili users patapim id = 1 boneca orders").unwrap_err();
        assert!(matches!(err, BrainrotError::UnexpectedToken { ref actual, .. } if actual == "boneca"));
    }

    #[test]
    fn test_where_conditions_and_connectors() {
        let q = parse(
            "tralalero * lirili users patapim status = 'active' camelo age > 20 vaca age <= 3",
        )
        .unwrap();
        assert_eq!(
            q.where_conditions(),
            [
                Condition::new("status", CompareOp::Eq, Value::Literal("'active'".into())),
                Condition::new("age", CompareOp::Gt, Value::Literal("20".into())),
                Condition::new("age", CompareOp::Lte, Value::Literal("3".into())),
            ]
        );
        assert_eq!(q.where_join_operators(), [LogicalOp::And, LogicalOp::Or]);
    }

    #[test]
    fn test_is_null() {
        let q = parse("bombombini lirili users patapim email bobrito girafa").unwrap();
        assert_eq!(q.where_conditions()[0].op, CompareOp::Is);
        assert_eq!(q.where_conditions()[0].value, Value::Null);
    }

    #[test]
    fn test_is_not_null_spellings() {
        for input in [
            "tralalero * lirili users patapim email bobrito zibra girafa",
            "tralalero * lirili users patapim email zibra bobrito girafa",
            "tralalero * lirili users patapim email zibra girafa",
            "tralalero * lirili users patapim email bobrito bandito zubra celestre",
            "tralalero * lirili users patapim email bobrito zibra zubra girafa",
            "tralalero * lirili users patapim email zibra zubra bobrito girafa",
        ] {
            let q = parse(input).unwrap();
            let cond = &q.where_conditions()[0];
            assert_eq!(cond.op, CompareOp::IsNot, "{}", input);
            assert_eq!(cond.value, Value::Null, "{}", input);
        }
    }

    #[test]
    fn test_null_alias_without_is_is_literal() {
        let q = parse("tralalero * lirili users patapim email = girafa").unwrap();
        assert_eq!(q.where_conditions()[0].value, Value::Literal("girafa".into()));
    }

    #[test]
    fn test_is_with_ordinary_value() {
        let q = parse("tralalero * lirili users patapim active bobrito 'yes'").unwrap();
        assert_eq!(q.where_conditions()[0].op, CompareOp::Is);
        assert_eq!(q.where_conditions()[0].value, Value::Literal("'yes'".into()));
    }

    #[test]
    fn test_insert_with_and_without_parens() {
        let bare = parse("bombardiro users id name trulimero 1 'Bob'").unwrap();
        let parens = parse("bombardiro users (id, name) trulimero (1, 'Bob')").unwrap();
        assert_eq!(bare, parens);
        assert_eq!(bare.columns(), ["id", "name"]);
        assert_eq!(bare.values(), ["1", "'Bob'"]);
    }

    #[test]
    fn test_insert_without_columns() {
        let q = parse("bombardiro crocodilo users trulimero 7 'x' 3").unwrap();
        assert!(q.columns().is_empty());
        assert_eq!(q.values().len(), 3);
    }

    #[test]
    fn test_insert_too_few_values() {
        let err = parse("bombardiro users id name trulimero 1").unwrap_err();
        assert!(
            matches!(err, BrainrotError::UnexpectedEndOfInput { ref expected } if expected.contains("name"))
        );
        let err = parse("bombardiro users (id, name) trulimero (1)").unwrap_err();
        assert!(matches!(err, BrainrotError::UnexpectedToken { ref actual, .. } if actual == ")"));
    }

    #[test]
    fn test_insert_too_many_values() {
        let err = parse("bombardiro users id trulimero 1 2").unwrap_err();
        assert!(matches!(err, BrainrotError::UnexpectedToken { ref actual, .. } if actual == "2"));
    }

    #[test]
    fn test_insert_dangling_column() {
        let err = parse("bombardiro users id name").unwrap_err();
        assert!(
            matches!(err, BrainrotError::UnexpectedEndOfInput { ref expected } if expected == "VALUES")
        );
    }

    #[test]
    fn test_insert_unclosed_paren() {
        let err = parse("bombardiro users (id trulimero 1").unwrap_err();
        assert!(matches!(err, BrainrotError::UnexpectedEndOfInput { .. }));
    }

    #[test]
    fn test_update_multiple_assignments() {
        let q = parse(
            "cappuccino assassino users cocofanto status burbaloni 'premium', age = 30 patapim id = 6",
        )
        .unwrap();
        assert_eq!(q.kind(), QueryKind::Update);
        assert_eq!(
            q.assignments().collect::<Vec<_>>(),
            [("status", "'premium'"), ("age", "30")]
        );
        assert_eq!(q.where_conditions().len(), 1);
    }

    #[test]
    fn test_update_missing_value() {
        let err = parse("cappuccino users cocofanto status burbaloni").unwrap_err();
        assert!(matches!(err, BrainrotError::UnexpectedEndOfInput { ref expected } if expected == "value"));
    }

    #[test]
    fn test_update_bad_assignment_operator() {
        let err = parse("cappuccino users cocofanto status := 1").unwrap_err();
        match err {
            BrainrotError::UnexpectedToken { expected, actual } => {
                assert_eq!(actual, ":=");
                assert_eq!(expected[0], "=");
                assert!(expected.contains(&"burbaloni".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_delete_requires_from() {
        let err = parse("bombombini users").unwrap_err();
        match err {
            BrainrotError::UnexpectedToken { expected, actual } => {
                assert_eq!(actual, "users");
                assert_eq!(expected, ["lirili", "larila", "lirilì", "larilà"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_delete_without_where() {
        let q = parse("bombombini gusini lirili larila sessions").unwrap();
        assert_eq!(q.kind(), QueryKind::Delete);
        assert_eq!(q.table(), Some("sessions"));
    }

    #[test]
    fn test_missing_from_names_from() {
        let err = parse("tralalero id name").unwrap_err();
        assert!(
            matches!(err, BrainrotError::UnexpectedEndOfInput { ref expected } if expected == "FROM")
        );
    }

    #[test]
    fn test_transaction_statements() {
        assert_eq!(parse("tung").unwrap().kind(), QueryKind::BeginTransaction);
        assert_eq!(parse("tung sahur").unwrap().kind(), QueryKind::BeginTransaction);
        assert_eq!(parse("ballerina").unwrap().kind(), QueryKind::Commit);
        assert_eq!(parse("chimpanzini").unwrap().kind(), QueryKind::Rollback);
        assert!(parse("tung").unwrap().table().is_none());
    }

    #[test]
    fn test_trailing_input_after_transaction() {
        let err = parse("ballerina users").unwrap_err();
        assert!(matches!(err, BrainrotError::UnexpectedToken { ref actual, .. } if actual == "users"));
    }

    #[test]
    fn test_unsupported_and_empty_input() {
        assert!(matches!(
            parse("lirili users"),
            Err(BrainrotError::UnsupportedQueryKind(ref t)) if t == "lirili"
        ));
        assert!(matches!(
            parse("SELECT * FROM users"),
            Err(BrainrotError::UnsupportedQueryKind(_))
        ));
        assert!(matches!(parse("   "), Err(BrainrotError::UnexpectedEndOfInput { .. })));
    }

    #[test]
    fn test_where_join_requires_and_or() {
        let err = parse("tralalero * lirili users patapim a = 1 b = 2").unwrap_err();
        match err {
            BrainrotError::UnexpectedToken { expected, actual } => {
                assert_eq!(actual, "b");
                assert!(expected.contains(&"camelo".to_string()));
                assert!(expected.contains(&"vaca".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_where_incomplete_condition() {
        let err = parse("tralalero * lirili users patapim a =").unwrap_err();
        assert!(matches!(err, BrainrotError::UnexpectedEndOfInput { ref expected } if expected == "value"));
        let err = parse("tralalero * lirili users patapim a = 1 camelo").unwrap_err();
        assert!(
            matches!(err, BrainrotError::UnexpectedEndOfInput { ref expected } if expected == "field name")
        );
    }

    #[test]
    fn test_punctuation_rejected_in_name_slots() {
        for (input, bad) in [
            ("tralalero * lirili users patapim , = 1", ","),
            ("tralalero * lirili ( patapim a = 1", "("),
            ("tralalero * lirili users boneca )", ")"),
            ("cappuccino users cocofanto ( = 1", "("),
            ("cappuccino users cocofanto a = ,", ","),
            ("bombombini lirili users patapim a = 1 camelo ( = 2", "("),
        ] {
            match parse(input) {
                Err(BrainrotError::UnexpectedToken { actual, .. }) => assert_eq!(actual, bad, "{}", input),
                other => panic!("{}: expected unexpected token, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let q = parse("TRALALERO id LIRILI users PATAPIM id = 1").unwrap();
        assert_eq!(q.table(), Some("users"));
        assert_eq!(q.where_conditions().len(), 1);
    }

    #[test]
    fn test_custom_registry_is_used() {
        let mut registry = AliasRegistry::standard();
        registry.extend(Operation::Select, ["skibidi", "toilet"]).unwrap();
        registry.register(Operation::From, "aeromucca").unwrap();
        let q = Parser::new(&registry)
            .parse("skibidi toilet id aeromucca users")
            .unwrap();
        assert_eq!(q.columns(), ["id"]);
        assert_eq!(q.table(), Some("users"));
    }
}
