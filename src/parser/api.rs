use std::rc::Rc;

use pest::error::{Error, ErrorVariant};
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

use super::ast::*;
use super::static_semantics::{validate_program, SemanticError};
use super::util::unescape_string;

#[derive(Parser)]
#[grammar = "parser/form_grammar.pest"] // relative to src
pub struct FormParser;

const TAB_WIDTH: usize = 2;

impl FormParser {
    /// Parse a form script into its program AST.
    pub fn parse_program(script: &str) -> Result<Program, Error<Rule>> {
        parse_to_ast(script)
    }
}

pub fn parse_to_token_tree(script: &str) -> Result<String, String> {
    let mut tree = vec![];
    match FormParser::parse(Rule::script, script) {
        Ok(pairs) => {
            for pair in pairs {
                tree.push(pair_to_string(pair, 0).join("\n"));
            }
        }
        Err(rule) => {
            return Err(format!("Parse error due to {}", rule));
        }
    }
    Ok(tree.join("\n"))
}

fn pair_to_string(pair: Pair<Rule>, level: usize) -> Vec<String> {
    let mut tree = vec![];
    let span = pair.as_span();
    let rule_name = format!(
        "{:?} => ({},{}) #{:?}",
        pair.as_rule(),
        span.start(),
        span.end(),
        span.as_str()
    );
    let string_pads = " ".repeat(level * TAB_WIDTH);
    tree.push(format!("{}{}", string_pads, rule_name));
    for child_pair in pair.into_inner() {
        tree.append(pair_to_string(child_pair, level + 1).as_mut());
    }
    tree
}

pub fn parse_to_ast(script: &str) -> Result<Program, Error<Rule>> {
    let mut pairs = FormParser::parse(Rule::script, script)?;
    let script_pair = match pairs.next() {
        Some(p) => p,
        None => {
            return Err(Error::new_from_pos(
                ErrorVariant::CustomError {
                    message: "Empty parse result".to_string(),
                },
                pest::Position::from_start(script),
            ))
        }
    };
    let meta = get_meta(&script_pair);
    let body = build_ast_from_statement_list(script_pair.into_inner())?;
    let program = Program { meta, body };
    validate_program(&program).map_err(|e| get_semantic_error(script, e))?;
    Ok(program)
}

fn get_semantic_error(script: &str, error: SemanticError) -> Error<Rule> {
    let variant = ErrorVariant::CustomError {
        message: error.message,
    };
    match pest::Span::new(script, error.meta.start_index, error.meta.end_index) {
        Some(span) => Error::new_from_span(variant, span),
        None => Error::new_from_pos(variant, pest::Position::from_start(script)),
    }
}

fn get_meta(pair: &Pair<Rule>) -> Meta {
    let span = pair.as_span();
    Meta {
        start_index: span.start(),
        end_index: span.end(),
    }
}

fn get_unexpected_error(id: i32, pair: &Pair<Rule>) -> Error<Rule> {
    let message = format!("Unexpected state reached [{:?}] - {}", pair.as_rule(), id);
    Error::new_from_span(ErrorVariant::CustomError { message }, pair.as_span())
}

fn get_validation_error(message: String, pair: &Pair<Rule>) -> Error<Rule> {
    Error::new_from_span(ErrorVariant::CustomError { message }, pair.as_span())
}

/// Next child of `parent`, or an error pointing at the parent when the grammar
/// produced fewer children than the builder expects.
fn next_inner<'i>(
    iter: &mut Pairs<'i, Rule>,
    parent: &Pair<'i, Rule>,
    id: i32,
) -> Result<Pair<'i, Rule>, Error<Rule>> {
    iter.next().ok_or_else(|| get_unexpected_error(id, parent))
}

fn build_ast_from_statement_list(pairs: Pairs<Rule>) -> Result<Vec<StatementType>, Error<Rule>> {
    let mut statements = vec![];
    for pair in pairs {
        match pair.as_rule() {
            Rule::class_declaration => {
                statements.push(StatementType::ClassDeclaration(Rc::new(
                    build_ast_from_class_declaration(pair)?,
                )));
            }
            Rule::statement => statements.push(build_ast_from_statement(pair)?),
            Rule::EOI => { /* Do nothing */ }
            _ => return Err(get_unexpected_error(1, &pair)),
        }
    }
    Ok(statements)
}

fn build_ast_from_class_declaration(pair: Pair<Rule>) -> Result<ClassData, Error<Rule>> {
    let meta = get_meta(&pair);
    let mut name = None;
    let mut super_class = None;
    let mut methods = vec![];
    let mut fields = vec![];
    for inner_pair in pair.clone().into_inner() {
        match inner_pair.as_rule() {
            Rule::identifier => name = Some(inner_pair.as_str().to_string()),
            Rule::class_heritage => {
                let mut iter = inner_pair.clone().into_inner();
                let id_pair = next_inner(&mut iter, &inner_pair, 2)?;
                super_class = Some(build_identifier(&id_pair));
            }
            Rule::method_definition => {
                methods.push(Rc::new(build_ast_from_function(inner_pair)?));
            }
            Rule::field_definition => {
                let field_meta = get_meta(&inner_pair);
                let mut iter = inner_pair.clone().into_inner();
                let field_name = next_inner(&mut iter, &inner_pair, 3)?.as_str().to_string();
                let value = match iter.next() {
                    Some(expr) => Some(build_ast_from_expression(expr)?),
                    None => None,
                };
                fields.push(FieldData {
                    meta: field_meta,
                    name: field_name,
                    value,
                });
            }
            _ => return Err(get_unexpected_error(4, &inner_pair)),
        }
    }
    let name = name.ok_or_else(|| get_unexpected_error(5, &pair))?;
    Ok(ClassData {
        meta,
        name,
        super_class,
        methods,
        fields,
    })
}

/// Builds both method definitions and function declarations; both are
/// `name ( formal_parameters ) function_body`.
fn build_ast_from_function(pair: Pair<Rule>) -> Result<FunctionData, Error<Rule>> {
    let meta = get_meta(&pair);
    let mut iter = pair.clone().into_inner();
    let name = next_inner(&mut iter, &pair, 6)?.as_str().to_string();
    let params_pair = next_inner(&mut iter, &pair, 7)?;
    let mut params = vec![];
    for param in params_pair.into_inner() {
        let param_name = param.as_str().to_string();
        if params.contains(&param_name) {
            return Err(get_validation_error(
                format!("Duplicate parameter name '{}'", param_name),
                &param,
            ));
        }
        params.push(param_name);
    }
    let body_pair = next_inner(&mut iter, &pair, 8)?;
    let body = build_ast_from_statement_list(body_pair.into_inner())?;
    Ok(FunctionData {
        meta,
        name,
        params,
        body,
    })
}

fn build_identifier(pair: &Pair<Rule>) -> IdentifierData {
    IdentifierData {
        name: pair.as_str().to_string(),
        meta: get_meta(pair),
    }
}

fn build_block(pair: Pair<Rule>) -> Result<BlockStatementData, Error<Rule>> {
    let meta = get_meta(&pair);
    let body = build_ast_from_statement_list(pair.into_inner())?;
    Ok(BlockStatementData { meta, body })
}

fn build_variable_kind(pair: &Pair<Rule>) -> Result<VariableDeclarationKind, Error<Rule>> {
    Ok(match pair.as_str() {
        "let" => VariableDeclarationKind::Let,
        "const" => VariableDeclarationKind::Const,
        "var" => VariableDeclarationKind::Var,
        _ => return Err(get_unexpected_error(9, pair)),
    })
}

fn build_ast_from_statement(pair: Pair<Rule>) -> Result<StatementType, Error<Rule>> {
    let mut outer_iter = pair.clone().into_inner();
    let inner_pair = next_inner(&mut outer_iter, &pair, 10)?;
    let meta = get_meta(&inner_pair);
    Ok(match inner_pair.as_rule() {
        Rule::block_statement => StatementType::BlockStatement(build_block(inner_pair)?),
        Rule::function_declaration => {
            StatementType::FunctionDeclaration(Rc::new(build_ast_from_function(inner_pair)?))
        }
        Rule::variable_statement => {
            let mut iter = inner_pair.clone().into_inner();
            let kind = build_variable_kind(&next_inner(&mut iter, &inner_pair, 11)?)?;
            let mut declarations = vec![];
            for declarator in iter {
                let declarator_meta = get_meta(&declarator);
                let mut d_iter = declarator.clone().into_inner();
                let id = build_identifier(&next_inner(&mut d_iter, &declarator, 12)?);
                let init = match d_iter.next() {
                    Some(expr) => Some(build_ast_from_expression(expr)?),
                    None => None,
                };
                if init.is_none() && kind == VariableDeclarationKind::Const {
                    return Err(get_validation_error(
                        format!("Missing initializer in const declaration '{}'", id.name),
                        &declarator,
                    ));
                }
                declarations.push(VariableDeclaratorData {
                    meta: declarator_meta,
                    id,
                    init,
                });
            }
            StatementType::VariableDeclaration(VariableDeclarationData {
                meta,
                kind,
                declarations,
            })
        }
        Rule::if_statement => {
            let mut iter = inner_pair.clone().into_inner();
            let test = build_ast_from_expression(next_inner(&mut iter, &inner_pair, 13)?)?;
            let consequent = Box::new(build_ast_from_statement(next_inner(
                &mut iter,
                &inner_pair,
                14,
            )?)?);
            let alternate = match iter.next() {
                Some(else_clause) => {
                    let mut else_iter = else_clause.clone().into_inner();
                    Some(Box::new(build_ast_from_statement(next_inner(
                        &mut else_iter,
                        &else_clause,
                        15,
                    )?)?))
                }
                None => None,
            };
            StatementType::IfStatement {
                meta,
                test,
                consequent,
                alternate,
            }
        }
        Rule::for_of_statement => {
            let mut iter = inner_pair.clone().into_inner();
            let kind = build_variable_kind(&next_inner(&mut iter, &inner_pair, 16)?)?;
            let binding = build_identifier(&next_inner(&mut iter, &inner_pair, 17)?);
            let iterable = build_ast_from_expression(next_inner(&mut iter, &inner_pair, 18)?)?;
            let body = Box::new(build_ast_from_statement(next_inner(
                &mut iter,
                &inner_pair,
                19,
            )?)?);
            StatementType::ForOfStatement {
                meta,
                kind,
                binding,
                iterable,
                body,
            }
        }
        Rule::while_statement => {
            let mut iter = inner_pair.clone().into_inner();
            let test = build_ast_from_expression(next_inner(&mut iter, &inner_pair, 20)?)?;
            let body = Box::new(build_ast_from_statement(next_inner(
                &mut iter,
                &inner_pair,
                21,
            )?)?);
            StatementType::WhileStatement { meta, test, body }
        }
        Rule::return_statement => {
            let argument = match inner_pair.into_inner().next() {
                Some(expr) => Some(build_ast_from_expression(expr)?),
                None => None,
            };
            StatementType::ReturnStatement { meta, argument }
        }
        Rule::throw_statement => {
            let mut iter = inner_pair.clone().into_inner();
            let argument = build_ast_from_expression(next_inner(&mut iter, &inner_pair, 22)?)?;
            StatementType::ThrowStatement { meta, argument }
        }
        Rule::break_statement => StatementType::BreakStatement { meta },
        Rule::continue_statement => StatementType::ContinueStatement { meta },
        Rule::try_statement => {
            let mut iter = inner_pair.clone().into_inner();
            let block = build_block(next_inner(&mut iter, &inner_pair, 23)?)?;
            let mut handler = None;
            let mut finalizer = None;
            for clause in iter {
                match clause.as_rule() {
                    Rule::catch_clause => {
                        let catch_meta = get_meta(&clause);
                        let mut param = None;
                        let mut body = None;
                        for part in clause.clone().into_inner() {
                            match part.as_rule() {
                                Rule::identifier => param = Some(build_identifier(&part)),
                                Rule::block_statement => body = Some(build_block(part)?),
                                _ => return Err(get_unexpected_error(24, &part)),
                            }
                        }
                        let body = body.ok_or_else(|| get_unexpected_error(25, &clause))?;
                        handler = Some(CatchClauseData {
                            meta: catch_meta,
                            param,
                            body,
                        });
                    }
                    Rule::finally_clause => {
                        let mut f_iter = clause.clone().into_inner();
                        finalizer = Some(build_block(next_inner(&mut f_iter, &clause, 26)?)?);
                    }
                    _ => return Err(get_unexpected_error(27, &clause)),
                }
            }
            if handler.is_none() && finalizer.is_none() {
                return Err(get_validation_error(
                    "Missing catch or finally after try".to_string(),
                    &inner_pair,
                ));
            }
            StatementType::TryStatement {
                meta,
                block,
                handler,
                finalizer,
            }
        }
        Rule::empty_statement => StatementType::EmptyStatement { meta },
        Rule::expression_statement => {
            let mut iter = inner_pair.clone().into_inner();
            let expression = build_ast_from_expression(next_inner(&mut iter, &inner_pair, 28)?)?;
            StatementType::ExpressionStatement { meta, expression }
        }
        _ => return Err(get_unexpected_error(29, &inner_pair)),
    })
}

/// Builds any expression-level pair. Precedence rules that matched a single
/// operand collapse onto that operand.
fn build_ast_from_expression(pair: Pair<Rule>) -> Result<ExpressionType, Error<Rule>> {
    match pair.as_rule() {
        Rule::expression | Rule::parenthesized_expression => {
            let mut iter = pair.clone().into_inner();
            build_ast_from_expression(next_inner(&mut iter, &pair, 30)?)
        }
        Rule::assignment_expression => build_ast_from_assignment_expression(pair),
        Rule::conditional_expression => build_ast_from_conditional_expression(pair),
        Rule::nullish_expression
        | Rule::logical_or_expression
        | Rule::logical_and_expression
        | Rule::equality_expression
        | Rule::relational_expression
        | Rule::additive_expression
        | Rule::multiplicative_expression => build_ast_from_binary_chain(pair),
        Rule::unary_expression => build_ast_from_unary_expression(pair),
        Rule::left_hand_side_expression => build_ast_from_left_hand_side_expression(pair),
        _ => build_ast_from_primary_expression(pair),
    }
}

fn build_ast_from_assignment_expression(pair: Pair<Rule>) -> Result<ExpressionType, Error<Rule>> {
    let meta = get_meta(&pair);
    let mut iter = pair.clone().into_inner();
    let first = next_inner(&mut iter, &pair, 31)?;
    if first.as_rule() != Rule::left_hand_side_expression {
        return build_ast_from_expression(first);
    }
    let target_pair = first.clone();
    let target = build_ast_from_expression(first)?;
    match &target {
        ExpressionType::Identifier(_) | ExpressionType::MemberExpression { .. } => {}
        _ => {
            return Err(get_validation_error(
                "Invalid left-hand side in assignment".to_string(),
                &target_pair,
            ))
        }
    }
    let operator_pair = next_inner(&mut iter, &pair, 32)?;
    let operator = match operator_pair.as_str() {
        "=" => AssignmentOperator::Equals,
        "+=" => AssignmentOperator::AddEquals,
        "-=" => AssignmentOperator::SubtractEquals,
        "*=" => AssignmentOperator::MultiplyEquals,
        "/=" => AssignmentOperator::DivideEquals,
        _ => return Err(get_unexpected_error(33, &operator_pair)),
    };
    let value = build_ast_from_expression(next_inner(&mut iter, &pair, 34)?)?;
    Ok(ExpressionType::AssignmentExpression {
        meta,
        operator,
        target: Box::new(target),
        value: Box::new(value),
    })
}

fn build_ast_from_conditional_expression(
    pair: Pair<Rule>,
) -> Result<ExpressionType, Error<Rule>> {
    let meta = get_meta(&pair);
    let mut iter = pair.clone().into_inner();
    let test = build_ast_from_expression(next_inner(&mut iter, &pair, 35)?)?;
    match iter.next() {
        None => Ok(test),
        Some(consequent_pair) => {
            let consequent = build_ast_from_expression(consequent_pair)?;
            let alternate = build_ast_from_expression(next_inner(&mut iter, &pair, 36)?)?;
            Ok(ExpressionType::ConditionalExpression {
                meta,
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            })
        }
    }
}

enum ChainOperator {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
}

fn get_chain_operator(pair: &Pair<Rule>) -> Result<ChainOperator, Error<Rule>> {
    Ok(match pair.as_str() {
        "??" => ChainOperator::Logical(LogicalOperator::NullishCoalescing),
        "||" => ChainOperator::Logical(LogicalOperator::Or),
        "&&" => ChainOperator::Logical(LogicalOperator::And),
        "===" => ChainOperator::Binary(BinaryOperator::StrictlyEqual),
        "!==" => ChainOperator::Binary(BinaryOperator::StrictlyUnequal),
        "==" => ChainOperator::Binary(BinaryOperator::LooselyEqual),
        "!=" => ChainOperator::Binary(BinaryOperator::LooselyUnequal),
        "<" => ChainOperator::Binary(BinaryOperator::LessThan),
        "<=" => ChainOperator::Binary(BinaryOperator::LessThanEqual),
        ">" => ChainOperator::Binary(BinaryOperator::GreaterThan),
        ">=" => ChainOperator::Binary(BinaryOperator::GreaterThanEqual),
        "+" => ChainOperator::Binary(BinaryOperator::Add),
        "-" => ChainOperator::Binary(BinaryOperator::Subtract),
        "*" => ChainOperator::Binary(BinaryOperator::Multiply),
        "/" => ChainOperator::Binary(BinaryOperator::Divide),
        "%" => ChainOperator::Binary(BinaryOperator::Modulo),
        _ => return Err(get_unexpected_error(37, pair)),
    })
}

/// Left-associative fold of `operand (operator operand)*`.
fn build_ast_from_binary_chain(pair: Pair<Rule>) -> Result<ExpressionType, Error<Rule>> {
    let start = pair.as_span().start();
    let mut iter = pair.clone().into_inner();
    let mut left = build_ast_from_expression(next_inner(&mut iter, &pair, 38)?)?;
    while let Some(operator_pair) = iter.next() {
        let operator = get_chain_operator(&operator_pair)?;
        let right_pair = next_inner(&mut iter, &pair, 39)?;
        let meta = Meta {
            start_index: start,
            end_index: right_pair.as_span().end(),
        };
        let right = Box::new(build_ast_from_expression(right_pair)?);
        left = match operator {
            ChainOperator::Binary(operator) => ExpressionType::BinaryExpression {
                meta,
                operator,
                left: Box::new(left),
                right,
            },
            ChainOperator::Logical(operator) => ExpressionType::LogicalExpression {
                meta,
                operator,
                left: Box::new(left),
                right,
            },
        };
    }
    Ok(left)
}

fn build_ast_from_unary_expression(pair: Pair<Rule>) -> Result<ExpressionType, Error<Rule>> {
    let meta = get_meta(&pair);
    let mut iter = pair.clone().into_inner();
    let first = next_inner(&mut iter, &pair, 40)?;
    if first.as_rule() != Rule::unary_operator {
        return build_ast_from_expression(first);
    }
    let operator = match first.as_str() {
        "!" => UnaryOperator::LogicalNot,
        "-" => UnaryOperator::Minus,
        "+" => UnaryOperator::Plus,
        "typeof" => UnaryOperator::TypeOf,
        "await" => UnaryOperator::Await,
        _ => return Err(get_unexpected_error(41, &first)),
    };
    let argument = build_ast_from_expression(next_inner(&mut iter, &pair, 42)?)?;
    Ok(ExpressionType::UnaryExpression {
        meta,
        operator,
        argument: Box::new(argument),
    })
}

fn build_ast_from_arguments(pair: Pair<Rule>) -> Result<Vec<ExpressionType>, Error<Rule>> {
    // call_suffix wraps argument_list
    let mut iter = pair.clone().into_inner();
    let list = next_inner(&mut iter, &pair, 43)?;
    let mut arguments = vec![];
    for arg in list.into_inner() {
        arguments.push(build_ast_from_expression(arg)?);
    }
    Ok(arguments)
}

fn build_ast_from_left_hand_side_expression(
    pair: Pair<Rule>,
) -> Result<ExpressionType, Error<Rule>> {
    let start = pair.as_span().start();
    let mut iter = pair.clone().into_inner();
    let mut expr = build_ast_from_expression(next_inner(&mut iter, &pair, 44)?)?;
    for suffix in iter {
        let meta = Meta {
            start_index: start,
            end_index: suffix.as_span().end(),
        };
        expr = match suffix.as_rule() {
            Rule::member_suffix => {
                let mut s_iter = suffix.clone().into_inner();
                let name = next_inner(&mut s_iter, &suffix, 45)?.as_str().to_string();
                ExpressionType::MemberExpression {
                    meta,
                    object: Box::new(expr),
                    property: MemberProperty::Static(name),
                }
            }
            Rule::index_suffix => {
                let mut s_iter = suffix.clone().into_inner();
                let index = build_ast_from_expression(next_inner(&mut s_iter, &suffix, 46)?)?;
                ExpressionType::MemberExpression {
                    meta,
                    object: Box::new(expr),
                    property: MemberProperty::Computed(Box::new(index)),
                }
            }
            Rule::call_suffix => ExpressionType::CallExpression {
                meta,
                callee: Box::new(expr),
                arguments: build_ast_from_arguments(suffix)?,
            },
            _ => return Err(get_unexpected_error(47, &suffix)),
        };
    }
    Ok(expr)
}

fn build_ast_from_string_literal(pair: Pair<Rule>) -> Result<String, Error<Rule>> {
    let mut iter = pair.clone().into_inner();
    let content = next_inner(&mut iter, &pair, 48)?;
    Ok(unescape_string(content.as_str()))
}

/// Literals past 2^53 are kept as floats so they round like any other.
fn is_safe_integer(i: i64) -> bool {
    (-9_007_199_254_740_991..=9_007_199_254_740_991).contains(&i)
}

fn build_ast_from_primary_expression(pair: Pair<Rule>) -> Result<ExpressionType, Error<Rule>> {
    let meta = get_meta(&pair);
    let literal = |value: LiteralType, meta: Meta| ExpressionType::Literal(LiteralData { meta, value });
    Ok(match pair.as_rule() {
        Rule::number_literal => {
            let text = pair.as_str();
            let value = if let Some(i) = text.parse::<i64>().ok().filter(|i| is_safe_integer(*i)) {
                NumberLiteralType::IntegerLiteral(i)
            } else {
                match text.parse::<f64>() {
                    Ok(f) => NumberLiteralType::FloatLiteral(f),
                    Err(_) => {
                        return Err(get_validation_error(
                            format!("Invalid number literal '{}'", text),
                            &pair,
                        ))
                    }
                }
            };
            literal(LiteralType::NumberLiteral(value), meta)
        }
        Rule::string_literal => {
            literal(LiteralType::StringLiteral(build_ast_from_string_literal(pair)?), meta)
        }
        Rule::boolean_literal => literal(LiteralType::BooleanLiteral(pair.as_str() == "true"), meta),
        Rule::null_literal => literal(LiteralType::NullLiteral, meta),
        Rule::undefined_literal => literal(LiteralType::UndefinedLiteral, meta),
        Rule::this_expression => ExpressionType::ThisExpression { meta },
        Rule::identifier => ExpressionType::Identifier(build_identifier(&pair)),
        Rule::parenthesized_expression => return build_ast_from_expression(pair),
        Rule::new_expression => {
            let mut iter = pair.clone().into_inner();
            let callee = build_identifier(&next_inner(&mut iter, &pair, 49)?);
            let arguments = match iter.next() {
                Some(call_suffix) => build_ast_from_arguments(call_suffix)?,
                None => vec![],
            };
            ExpressionType::NewExpression {
                meta,
                callee,
                arguments,
            }
        }
        Rule::array_literal => {
            let mut elements = vec![];
            for element in pair.into_inner() {
                elements.push(build_ast_from_expression(element)?);
            }
            ExpressionType::ArrayExpression { meta, elements }
        }
        Rule::object_literal => {
            let mut properties = vec![];
            for property in pair.into_inner() {
                let property_meta = get_meta(&property);
                let mut p_iter = property.clone().into_inner();
                let first = next_inner(&mut p_iter, &property, 50)?;
                let data = if first.as_rule() == Rule::identifier {
                    // shorthand `{ name }`
                    PropertyData {
                        meta: property_meta,
                        key: first.as_str().to_string(),
                        value: ExpressionType::Identifier(build_identifier(&first)),
                    }
                } else {
                    let mut k_iter = first.clone().into_inner();
                    let key_pair = next_inner(&mut k_iter, &first, 51)?;
                    let key = if key_pair.as_rule() == Rule::string_literal {
                        build_ast_from_string_literal(key_pair)?
                    } else {
                        key_pair.as_str().to_string()
                    };
                    let value = build_ast_from_expression(next_inner(&mut p_iter, &property, 52)?)?;
                    PropertyData {
                        meta: property_meta,
                        key,
                        value,
                    }
                };
                properties.push(data);
            }
            ExpressionType::ObjectExpression { meta, properties }
        }
        _ => return Err(get_unexpected_error(53, &pair)),
    })
}
