//! Parser states.
//!
//! The first six variants are the reusable combinators; the rest are the
//! statement-specific states built from them. Each combinator carries its
//! continuation, so a whole grammar path is one nested value, e.g. DELETE:
//!
//! ```text
//! Keyword(FROM) -> Consume(table) -> OptionalWhere
//! ```

use crate::ast::{CompareOp, Condition, LogicalOp, Query, QueryKind, Value};
use crate::error::{BrainrotError, BrainrotResult};
use crate::keywords::{AliasRegistry, Operation};

const END: &str = "end of query";

/// What a state did with the token it was fed.
pub(crate) enum Transition {
    /// Token used up; feed the next one to this state.
    Consume(State),
    /// Token left alone; feed it again to this state.
    Defer(State),
}

/// Where an arbitrary token is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Table,
    Column,
    Value,
    JoinedTable,
}

impl Slot {
    fn fill(self, query: &mut Query, token: &str) {
        match self {
            Slot::Table => query.set_table(token),
            Slot::Column => query.push_column(token),
            Slot::Value => query.push_value(token),
            Slot::JoinedTable => query.push_joined_table(token),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Slot::Table => "table name",
            Slot::Column => "column name",
            Slot::Value => "value",
            Slot::JoinedTable => "table name to join",
        }
    }
}

/// What ends a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Until {
    Keyword(Operation),
    Literal(&'static str),
    End,
}

impl Until {
    fn matches(self, token: &str, registry: &AliasRegistry) -> bool {
        match self {
            Until::Keyword(op) => registry.is_alias_of(token, op),
            Until::Literal(literal) => token == literal,
            Until::End => false,
        }
    }

    fn describe(self) -> String {
        match self {
            Until::Keyword(op) => op.name().to_string(),
            Until::Literal(literal) => format!("'{}'", literal),
            Until::End => END.to_string(),
        }
    }
}

#[derive(Debug)]
pub(crate) enum State {
    /// Exactly one literal, ignoring ASCII case.
    Expect { literal: &'static str, then: Box<State> },
    /// Any alias of `op`.
    Keyword { op: Operation, then: Box<State> },
    /// After a `Keyword`: a second alias of `op` is swallowed too.
    KeywordTail { op: Operation, then: Box<State> },
    /// Any token, stored in `slot`.
    Consume { slot: Slot, then: Box<State> },
    /// An item is required: start of a list, or after a comma.
    ListItem { slot: Slot, until: Until, then: Box<State> },
    /// After an item: a comma, another item, or the terminator.
    List { slot: Slot, until: Until, then: Box<State> },

    SelectColumns,
    /// Terminal. WHERE, or for SELECT another JOIN.
    OptionalWhere,
    InsertColumns,
    InsertValues,
    UpdateAssign,
    /// Terminal. Another assignment or WHERE.
    UpdateSet,
    WhereField,
    WhereOperator { field: String },
    /// After IS: an optional NOT.
    WhereNegation { field: String },
    WhereValue { field: String, op: CompareOp },
    /// Terminal. AND/OR before another condition.
    WhereJoin,
    Final,
}

fn boxed(state: State) -> Box<State> {
    Box::new(state)
}

fn is_punctuation(token: &str) -> bool {
    matches!(token, "," | "(" | ")")
}

impl State {
    /// The state following the statement keyword.
    pub(crate) fn entry(kind: QueryKind) -> State {
        match kind {
            QueryKind::Select => State::SelectColumns,
            QueryKind::Insert => State::Consume {
                slot: Slot::Table,
                then: boxed(State::InsertColumns),
            },
            QueryKind::Update => State::Consume {
                slot: Slot::Table,
                then: boxed(State::Keyword {
                    op: Operation::Set,
                    then: boxed(State::Consume {
                        slot: Slot::Column,
                        then: boxed(State::UpdateAssign),
                    }),
                }),
            },
            QueryKind::Delete => from_table(),
            QueryKind::BeginTransaction | QueryKind::Commit | QueryKind::Rollback => State::Final,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            State::Expect { .. } => "Expect",
            State::Keyword { .. } => "Keyword",
            State::KeywordTail { .. } => "KeywordTail",
            State::Consume { .. } => "Consume",
            State::ListItem { .. } => "ListItem",
            State::List { .. } => "List",
            State::SelectColumns => "SelectColumns",
            State::OptionalWhere => "OptionalWhere",
            State::InsertColumns => "InsertColumns",
            State::InsertValues => "InsertValues",
            State::UpdateAssign => "UpdateAssign",
            State::UpdateSet => "UpdateSet",
            State::WhereField => "WhereField",
            State::WhereOperator { .. } => "WhereOperator",
            State::WhereNegation { .. } => "WhereNegation",
            State::WhereValue { .. } => "WhereValue",
            State::WhereJoin => "WhereJoin",
            State::Final => "Final",
        }
    }

    /// Feed one token.
    pub(crate) fn step(
        self,
        token: &str,
        query: &mut Query,
        registry: &AliasRegistry,
    ) -> BrainrotResult<Transition> {
        use Transition::{Consume as Take, Defer};

        match self {
            State::Expect { literal, then } => {
                if token.eq_ignore_ascii_case(literal) {
                    Ok(Take(*then))
                } else {
                    Err(BrainrotError::unexpected([literal], token))
                }
            }

            State::Keyword { op, then } => {
                if registry.is_alias_of(token, op) {
                    Ok(Take(State::KeywordTail { op, then }))
                } else {
                    Err(BrainrotError::unexpected(registry.aliases_of(op), token))
                }
            }

            State::KeywordTail { op, then } => {
                if registry.is_alias_of(token, op) {
                    Ok(Take(*then))
                } else {
                    Ok(Defer(*then))
                }
            }

            State::Consume { slot, then } => {
                if is_punctuation(token) {
                    return Err(BrainrotError::unexpected([slot.describe()], token));
                }
                slot.fill(query, token);
                Ok(Take(*then))
            }

            State::ListItem { slot, until, then } => {
                if is_punctuation(token) || until.matches(token, registry) {
                    return Err(BrainrotError::unexpected([slot.describe()], token));
                }
                if slot == Slot::Value && query.values_full() {
                    return Err(BrainrotError::unexpected([until.describe()], token));
                }
                slot.fill(query, token);
                Ok(Take(State::List { slot, until, then }))
            }

            State::List { slot, until, then } => {
                if token == "," {
                    return Ok(Take(State::ListItem { slot, until, then }));
                }
                if until.matches(token, registry) {
                    close_list(slot, query, Some(token))?;
                    return Ok(Defer(*then));
                }
                if is_punctuation(token) {
                    return Err(BrainrotError::unexpected(
                        [",".to_string(), slot.describe().to_string(), until.describe()],
                        token,
                    ));
                }
                // Commas between items are optional.
                Ok(Defer(State::ListItem { slot, until, then }))
            }

            State::SelectColumns => {
                let from = boxed(from_table());
                if token == "*" {
                    query.push_column("*");
                    Ok(Take(*from))
                } else if registry.is_alias_of(token, Operation::All) {
                    query.push_column("*");
                    Ok(Take(State::KeywordTail {
                        op: Operation::All,
                        then: from,
                    }))
                } else {
                    Ok(Defer(State::ListItem {
                        slot: Slot::Column,
                        until: Until::Keyword(Operation::From),
                        then: from,
                    }))
                }
            }

            State::OptionalWhere => match registry.resolve(token) {
                Some(Operation::Where) => Ok(Take(where_clause())),
                Some(Operation::Join) if query.kind() == QueryKind::Select => {
                    Ok(Take(State::KeywordTail {
                        op: Operation::Join,
                        then: boxed(State::Consume {
                            slot: Slot::JoinedTable,
                            then: boxed(State::OptionalWhere),
                        }),
                    }))
                }
                _ => {
                    let mut expected = registry.aliases_of(Operation::Where).to_vec();
                    if query.kind() == QueryKind::Select {
                        expected.extend_from_slice(registry.aliases_of(Operation::Join));
                    }
                    expected.push(END.to_string());
                    Err(BrainrotError::unexpected(expected, token))
                }
            },

            State::InsertColumns => {
                let values = boxed(State::Keyword {
                    op: Operation::Values,
                    then: boxed(State::InsertValues),
                });
                if token == "(" {
                    Ok(Take(State::ListItem {
                        slot: Slot::Column,
                        until: Until::Literal(")"),
                        then: boxed(State::Expect {
                            literal: ")",
                            then: values,
                        }),
                    }))
                } else if registry.is_alias_of(token, Operation::Values) {
                    Ok(Defer(*values))
                } else {
                    Ok(Defer(State::ListItem {
                        slot: Slot::Column,
                        until: Until::Keyword(Operation::Values),
                        then: values,
                    }))
                }
            }

            State::InsertValues => {
                if token == "(" {
                    Ok(Take(State::ListItem {
                        slot: Slot::Value,
                        until: Until::Literal(")"),
                        then: boxed(State::Expect {
                            literal: ")",
                            then: boxed(State::Final),
                        }),
                    }))
                } else {
                    Ok(Defer(State::ListItem {
                        slot: Slot::Value,
                        until: Until::End,
                        then: boxed(State::Final),
                    }))
                }
            }

            State::UpdateAssign => {
                let value = boxed(State::Consume {
                    slot: Slot::Value,
                    then: boxed(State::UpdateSet),
                });
                if token == "=" {
                    Ok(Take(*value))
                } else if registry.is_alias_of(token, Operation::SetEqual) {
                    Ok(Take(State::KeywordTail {
                        op: Operation::SetEqual,
                        then: value,
                    }))
                } else {
                    let mut expected = vec!["=".to_string()];
                    expected.extend_from_slice(registry.aliases_of(Operation::SetEqual));
                    Err(BrainrotError::unexpected(expected, token))
                }
            }

            State::UpdateSet => {
                if token == "," {
                    Ok(Take(State::Consume {
                        slot: Slot::Column,
                        then: boxed(State::UpdateAssign),
                    }))
                } else if registry.is_alias_of(token, Operation::Where) {
                    Ok(Take(where_clause()))
                } else {
                    let mut expected = vec![",".to_string()];
                    expected.extend_from_slice(registry.aliases_of(Operation::Where));
                    expected.push(END.to_string());
                    Err(BrainrotError::unexpected(expected, token))
                }
            }

            State::WhereField => {
                if is_punctuation(token) {
                    return Err(BrainrotError::unexpected(["field name"], token));
                }
                Ok(Take(State::WhereOperator {
                    field: token.to_string(),
                }))
            }

            State::WhereOperator { field } => {
                if let Some(op) = CompareOp::from_symbol(token) {
                    return Ok(Take(State::WhereValue { field, op }));
                }
                match registry.resolve(token) {
                    Some(Operation::Is) => Ok(Take(State::KeywordTail {
                        op: Operation::Is,
                        then: boxed(State::WhereNegation { field }),
                    })),
                    // NOT before IS: `zibra` or `zibra bobrito` is IS NOT.
                    Some(Operation::Not) => Ok(Take(State::KeywordTail {
                        op: Operation::Not,
                        then: boxed(State::KeywordTail {
                            op: Operation::Is,
                            then: boxed(State::WhereValue {
                                field,
                                op: CompareOp::IsNot,
                            }),
                        }),
                    })),
                    _ => {
                        let mut expected: Vec<String> =
                            CompareOp::SYMBOLS.iter().map(|s| s.to_string()).collect();
                        expected.extend_from_slice(registry.aliases_of(Operation::Is));
                        expected.extend_from_slice(registry.aliases_of(Operation::Not));
                        Err(BrainrotError::unexpected(expected, token))
                    }
                }
            }

            State::WhereNegation { field } => {
                if registry.is_alias_of(token, Operation::Not) {
                    Ok(Take(State::KeywordTail {
                        op: Operation::Not,
                        then: boxed(State::WhereValue {
                            field,
                            op: CompareOp::IsNot,
                        }),
                    }))
                } else {
                    Ok(Defer(State::WhereValue {
                        field,
                        op: CompareOp::Is,
                    }))
                }
            }

            State::WhereValue { field, op } => {
                let value = if op.is_null_test() && registry.is_alias_of(token, Operation::Null) {
                    Value::Null
                } else {
                    Value::Literal(token.to_string())
                };
                query.push_condition(Condition::new(field, op, value));
                Ok(Take(State::WhereJoin))
            }

            State::WhereJoin => {
                let (op, logical) = match registry.resolve(token) {
                    Some(Operation::And) => (Operation::And, LogicalOp::And),
                    Some(Operation::Or) => (Operation::Or, LogicalOp::Or),
                    _ => {
                        let mut expected = registry.aliases_of(Operation::And).to_vec();
                        expected.extend_from_slice(registry.aliases_of(Operation::Or));
                        expected.push(END.to_string());
                        return Err(BrainrotError::unexpected(expected, token));
                    }
                };
                query.push_join_operator(logical);
                Ok(Take(State::KeywordTail {
                    op,
                    then: boxed(State::WhereField),
                }))
            }

            State::Final => Err(BrainrotError::unexpected([END], token)),
        }
    }

    /// Called when the input runs out while in this state.
    pub(crate) fn finish(self, query: &Query) -> BrainrotResult<()> {
        match self {
            State::Final | State::OptionalWhere | State::UpdateSet | State::WhereJoin => Ok(()),
            State::KeywordTail { then, .. } => (*then).finish(query),
            State::Expect { literal, .. } => Err(BrainrotError::end_of_input(format!("'{}'", literal))),
            State::Keyword { op, .. } => Err(BrainrotError::end_of_input(op.name())),
            State::Consume { slot, .. } | State::ListItem { slot, .. } => {
                Err(BrainrotError::end_of_input(slot.describe()))
            }
            State::List { slot, until, .. } => match until {
                Until::End => close_list(slot, query, None),
                _ => Err(BrainrotError::end_of_input(until.describe())),
            },
            State::SelectColumns => Err(BrainrotError::end_of_input("column name or *")),
            State::InsertColumns => Err(BrainrotError::end_of_input(Operation::Values.name())),
            State::InsertValues => Err(BrainrotError::end_of_input("value")),
            State::UpdateAssign => Err(BrainrotError::end_of_input(format!(
                "= or {}",
                Operation::SetEqual
            ))),
            State::WhereField => Err(BrainrotError::end_of_input("field name")),
            State::WhereOperator { .. } => Err(BrainrotError::end_of_input("comparison operator")),
            State::WhereNegation { .. } | State::WhereValue { .. } => {
                Err(BrainrotError::end_of_input("value"))
            }
        }
    }
}

/// `FROM table`, then the optional tail.
fn from_table() -> State {
    State::Keyword {
        op: Operation::From,
        then: boxed(State::Consume {
            slot: Slot::Table,
            then: boxed(State::OptionalWhere),
        }),
    }
}

/// Entered on a WHERE alias that has already been matched.
fn where_clause() -> State {
    State::KeywordTail {
        op: Operation::Where,
        then: boxed(State::WhereField),
    }
}

/// A value list may only end once every listed column has its value.
fn close_list(slot: Slot, query: &Query, actual: Option<&str>) -> BrainrotResult<()> {
    if slot != Slot::Value {
        return Ok(());
    }
    match (query.pending_column(), actual) {
        (None, _) => Ok(()),
        (Some(column), Some(token)) => Err(BrainrotError::unexpected(
            [format!("value for column {}", column)],
            token,
        )),
        (Some(column), None) => Err(BrainrotError::end_of_input(format!(
            "value for column {}",
            column
        ))),
    }
}
