use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct Meta {
    pub start_index: usize,
    pub end_index: usize,
}

pub trait HasMeta {
    fn get_meta(&self) -> &Meta;
}

/// A parsed form script: class declarations, helper functions and top-level statements
/// in source order.
#[derive(Debug)]
pub struct Program {
    pub meta: Meta,
    pub body: Vec<StatementType>,
}

impl Program {
    /// Names of the classes declared directly at the top level, in source order.
    pub fn class_names(&self) -> Vec<&str> {
        self.body
            .iter()
            .filter_map(|s| match s {
                StatementType::ClassDeclaration(data) => Some(data.name.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct IdentifierData {
    pub name: String,
    pub meta: Meta,
}

#[derive(Debug)]
pub struct ClassData {
    pub meta: Meta,
    pub name: String,
    pub super_class: Option<IdentifierData>,
    pub methods: Vec<Rc<FunctionData>>,
    pub fields: Vec<FieldData>,
}

impl HasMeta for ClassData {
    fn get_meta(&self) -> &Meta {
        &self.meta
    }
}

#[derive(Debug)]
pub struct FieldData {
    pub meta: Meta,
    pub name: String,
    pub value: Option<ExpressionType>,
}

#[derive(Debug)]
pub struct FunctionData {
    pub meta: Meta,
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<StatementType>,
}

impl HasMeta for FunctionData {
    fn get_meta(&self) -> &Meta {
        &self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariableDeclarationKind {
    Var,
    Let,
    Const,
}

#[derive(Debug)]
pub struct VariableDeclaratorData {
    pub meta: Meta,
    pub id: IdentifierData,
    pub init: Option<ExpressionType>,
}

#[derive(Debug)]
pub struct VariableDeclarationData {
    pub meta: Meta,
    pub kind: VariableDeclarationKind,
    pub declarations: Vec<VariableDeclaratorData>,
}

#[derive(Debug)]
pub struct BlockStatementData {
    pub meta: Meta,
    pub body: Vec<StatementType>,
}

#[derive(Debug)]
pub struct CatchClauseData {
    pub meta: Meta,
    pub param: Option<IdentifierData>,
    pub body: BlockStatementData,
}

#[derive(Debug)]
pub enum StatementType {
    ClassDeclaration(Rc<ClassData>),
    FunctionDeclaration(Rc<FunctionData>),
    VariableDeclaration(VariableDeclarationData),
    ExpressionStatement {
        meta: Meta,
        expression: ExpressionType,
    },
    BlockStatement(BlockStatementData),
    IfStatement {
        meta: Meta,
        test: ExpressionType,
        consequent: Box<StatementType>,
        alternate: Option<Box<StatementType>>,
    },
    WhileStatement {
        meta: Meta,
        test: ExpressionType,
        body: Box<StatementType>,
    },
    ForOfStatement {
        meta: Meta,
        kind: VariableDeclarationKind,
        binding: IdentifierData,
        iterable: ExpressionType,
        body: Box<StatementType>,
    },
    ReturnStatement {
        meta: Meta,
        argument: Option<ExpressionType>,
    },
    ThrowStatement {
        meta: Meta,
        argument: ExpressionType,
    },
    BreakStatement {
        meta: Meta,
    },
    ContinueStatement {
        meta: Meta,
    },
    TryStatement {
        meta: Meta,
        block: BlockStatementData,
        handler: Option<CatchClauseData>,
        finalizer: Option<BlockStatementData>,
    },
    EmptyStatement {
        meta: Meta,
    },
}

impl HasMeta for StatementType {
    fn get_meta(&self) -> &Meta {
        match self {
            StatementType::ClassDeclaration(data) => &data.meta,
            StatementType::FunctionDeclaration(data) => &data.meta,
            StatementType::VariableDeclaration(data) => &data.meta,
            StatementType::BlockStatement(data) => &data.meta,
            StatementType::ExpressionStatement { meta, .. }
            | StatementType::IfStatement { meta, .. }
            | StatementType::WhileStatement { meta, .. }
            | StatementType::ForOfStatement { meta, .. }
            | StatementType::ReturnStatement { meta, .. }
            | StatementType::ThrowStatement { meta, .. }
            | StatementType::BreakStatement { meta }
            | StatementType::ContinueStatement { meta }
            | StatementType::TryStatement { meta, .. }
            | StatementType::EmptyStatement { meta } => meta,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NumberLiteralType {
    IntegerLiteral(i64),
    FloatLiteral(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralType {
    NullLiteral,
    UndefinedLiteral,
    BooleanLiteral(bool),
    StringLiteral(String),
    NumberLiteral(NumberLiteralType),
}

#[derive(Debug)]
pub struct LiteralData {
    pub meta: Meta,
    pub value: LiteralType,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOperator {
    Minus,
    Plus,
    LogicalNot,
    TypeOf,
    Await,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOperator {
    LooselyEqual,
    LooselyUnequal,
    StrictlyEqual,
    StrictlyUnequal,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogicalOperator {
    Or,
    And,
    NullishCoalescing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssignmentOperator {
    Equals,
    AddEquals,
    SubtractEquals,
    MultiplyEquals,
    DivideEquals,
}

impl AssignmentOperator {
    /// The binary operator a compound assignment applies before storing.
    pub fn binary_operator(&self) -> Option<BinaryOperator> {
        match self {
            AssignmentOperator::Equals => None,
            AssignmentOperator::AddEquals => Some(BinaryOperator::Add),
            AssignmentOperator::SubtractEquals => Some(BinaryOperator::Subtract),
            AssignmentOperator::MultiplyEquals => Some(BinaryOperator::Multiply),
            AssignmentOperator::DivideEquals => Some(BinaryOperator::Divide),
        }
    }
}

#[derive(Debug)]
pub enum MemberProperty {
    Static(String),
    Computed(Box<ExpressionType>),
}

#[derive(Debug)]
pub struct PropertyData {
    pub meta: Meta,
    pub key: String,
    pub value: ExpressionType,
}

#[derive(Debug)]
pub enum ExpressionType {
    Literal(LiteralData),
    Identifier(IdentifierData),
    ThisExpression {
        meta: Meta,
    },
    ArrayExpression {
        meta: Meta,
        elements: Vec<ExpressionType>,
    },
    ObjectExpression {
        meta: Meta,
        properties: Vec<PropertyData>,
    },
    UnaryExpression {
        meta: Meta,
        operator: UnaryOperator,
        argument: Box<ExpressionType>,
    },
    BinaryExpression {
        meta: Meta,
        operator: BinaryOperator,
        left: Box<ExpressionType>,
        right: Box<ExpressionType>,
    },
    LogicalExpression {
        meta: Meta,
        operator: LogicalOperator,
        left: Box<ExpressionType>,
        right: Box<ExpressionType>,
    },
    AssignmentExpression {
        meta: Meta,
        operator: AssignmentOperator,
        target: Box<ExpressionType>,
        value: Box<ExpressionType>,
    },
    ConditionalExpression {
        meta: Meta,
        test: Box<ExpressionType>,
        consequent: Box<ExpressionType>,
        alternate: Box<ExpressionType>,
    },
    MemberExpression {
        meta: Meta,
        object: Box<ExpressionType>,
        property: MemberProperty,
    },
    CallExpression {
        //A function or method call expression.
        meta: Meta,
        callee: Box<ExpressionType>,
        arguments: Vec<ExpressionType>,
    },
    NewExpression {
        meta: Meta,
        callee: IdentifierData,
        arguments: Vec<ExpressionType>,
    },
}

impl HasMeta for ExpressionType {
    fn get_meta(&self) -> &Meta {
        match self {
            ExpressionType::Literal(data) => &data.meta,
            ExpressionType::Identifier(data) => &data.meta,
            ExpressionType::ThisExpression { meta }
            | ExpressionType::ArrayExpression { meta, .. }
            | ExpressionType::ObjectExpression { meta, .. }
            | ExpressionType::UnaryExpression { meta, .. }
            | ExpressionType::BinaryExpression { meta, .. }
            | ExpressionType::LogicalExpression { meta, .. }
            | ExpressionType::AssignmentExpression { meta, .. }
            | ExpressionType::ConditionalExpression { meta, .. }
            | ExpressionType::MemberExpression { meta, .. }
            | ExpressionType::CallExpression { meta, .. }
            | ExpressionType::NewExpression { meta, .. } => meta,
        }
    }
}

impl ExpressionType {
    /// Short source-like rendering used in error messages (`this.doc.getRow`).
    pub fn describe(&self) -> String {
        match self {
            ExpressionType::Identifier(id) => id.name.clone(),
            ExpressionType::ThisExpression { .. } => "this".to_string(),
            ExpressionType::MemberExpression {
                object, property, ..
            } => match property {
                MemberProperty::Static(name) => format!("{}.{}", object.describe(), name),
                MemberProperty::Computed(_) => format!("{}[...]", object.describe()),
            },
            ExpressionType::CallExpression { callee, .. } => format!("{}(...)", callee.describe()),
            ExpressionType::Literal(lit) => match &lit.value {
                LiteralType::StringLiteral(s) => format!("\"{}\"", s),
                LiteralType::NullLiteral => "null".to_string(),
                LiteralType::UndefinedLiteral => "undefined".to_string(),
                LiteralType::BooleanLiteral(b) => b.to_string(),
                LiteralType::NumberLiteral(NumberLiteralType::IntegerLiteral(i)) => i.to_string(),
                LiteralType::NumberLiteral(NumberLiteralType::FloatLiteral(f)) => f.to_string(),
            },
            _ => "expression".to_string(),
        }
    }
}
