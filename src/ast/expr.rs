use smallvec::SmallVec;

/// Expression AST node.
///
/// Large variants box their fields to keep `size_of::<Expression>()` small,
/// matching how `ouros::expressions::Expr` boxes its call-argument payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier { name: String, file_reference: Option<String> },

    IntegerLiteral(i32),
    NumberLiteral(f32),
    StringLiteral(String),
    UndefinedLiteral,
    AnimationLiteral(String),
    LocalizedString { reference: String },
    FunctionPointer { file_reference: Option<String>, name: String },

    Unary(Box<UnaryExpression>),
    Binary(Box<BinaryExpression>),
    Conditional(Box<ConditionalExpression>),
    Member(Box<MemberExpression>),
    Call(Box<CallExpression>),
    Assignment(Box<AssignmentExpression>),
    Vector(Box<[Expression; 3]>),
    Array(Vec<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub op: UnaryOp,
    pub prefix: bool,
    pub argument: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    LogicalNot,
    BitwiseNot,
    Increment,
    Decrement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub op: BinOp,
    pub left: Expression,
    pub right: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpression {
    pub test: Expression,
    pub consequent: Expression,
    pub alternative: Expression,
}

/// `.` member access (property is always an identifier name) or `[...]`
/// index access (property is any expression).
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub object: Expression,
    pub property: MemberProperty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    Name(String),
    Computed(Expression),
}

/// A call site. `object` is the method receiver when the call was written as
/// `<expr> <callee>(args)`; `threaded` marks a leading `thread` keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: Callee,
    pub object: Option<Expression>,
    pub threaded: bool,
    pub arguments: SmallVec<[Expression; 4]>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    Name { file_reference: Option<String>, name: String },
    FunctionPointer(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    pub op: AssignOp,
    pub lhs: Expression,
    pub rhs: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ModAssign,
}
