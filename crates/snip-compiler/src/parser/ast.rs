//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens elsewhere.

use rowan::TextRange;

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }

            pub fn text_range(&self) -> TextRange {
                self.0.text_range()
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(UsingDecl, UsingDecl);
ast_node!(QualifiedName, QualifiedName);
ast_node!(ClassDecl, ClassDecl);
ast_node!(MethodDecl, MethodDecl);
ast_node!(TypeRef, TypeRef);
ast_node!(TypeArgs, TypeArgs);

ast_node!(Block, Block);
ast_node!(LocalDecl, LocalDecl);
ast_node!(IfStmt, IfStmt);
ast_node!(ElseClause, ElseClause);
ast_node!(WhileStmt, WhileStmt);
ast_node!(ForStmt, ForStmt);
ast_node!(ForInit, ForInit);
ast_node!(ForCond, ForCond);
ast_node!(ForUpdate, ForUpdate);
ast_node!(ForeachStmt, ForeachStmt);
ast_node!(ReturnStmt, ReturnStmt);
ast_node!(ThrowStmt, ThrowStmt);
ast_node!(BreakStmt, BreakStmt);
ast_node!(ContinueStmt, ContinueStmt);
ast_node!(ExprStmt, ExprStmt);
ast_node!(EmptyStmt, EmptyStmt);

ast_node!(Literal, Literal);
ast_node!(NameRef, NameRef);
ast_node!(ParenExpr, ParenExpr);
ast_node!(AssignExpr, AssignExpr);
ast_node!(ConditionalExpr, ConditionalExpr);
ast_node!(BinaryExpr, BinaryExpr);
ast_node!(PrefixExpr, PrefixExpr);
ast_node!(PostfixExpr, PostfixExpr);
ast_node!(CastExpr, CastExpr);
ast_node!(CallExpr, CallExpr);
ast_node!(ArgList, ArgList);
ast_node!(MemberExpr, MemberExpr);
ast_node!(IndexExpr, IndexExpr);
ast_node!(LambdaExpr, LambdaExpr);
ast_node!(ParamList, ParamList);
ast_node!(NewExpr, NewExpr);
ast_node!(ArraySize, ArraySize);
ast_node!(ArrayNewExpr, ArrayNewExpr);
ast_node!(Initializer, Initializer);
ast_node!(InitElement, InitElement);

/// Direct child tokens, trivia excluded.
fn tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .filter(|t| !t.kind().is_trivia())
}

fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    tokens(node).find(|t| t.kind() == kind)
}

fn exprs(node: &SyntaxNode) -> impl Iterator<Item = Expr> + '_ {
    node.children().filter_map(Expr::cast)
}

/// Statement: anything that can appear in a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    Block(Block),
    Local(LocalDecl),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Foreach(ForeachStmt),
    Return(ReturnStmt),
    Throw(ThrowStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Expr(ExprStmt),
    Empty(EmptyStmt),
}

impl Stmt {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Block => Block::cast(node).map(Stmt::Block),
            SyntaxKind::LocalDecl => LocalDecl::cast(node).map(Stmt::Local),
            SyntaxKind::IfStmt => IfStmt::cast(node).map(Stmt::If),
            SyntaxKind::WhileStmt => WhileStmt::cast(node).map(Stmt::While),
            SyntaxKind::ForStmt => ForStmt::cast(node).map(Stmt::For),
            SyntaxKind::ForeachStmt => ForeachStmt::cast(node).map(Stmt::Foreach),
            SyntaxKind::ReturnStmt => ReturnStmt::cast(node).map(Stmt::Return),
            SyntaxKind::ThrowStmt => ThrowStmt::cast(node).map(Stmt::Throw),
            SyntaxKind::BreakStmt => BreakStmt::cast(node).map(Stmt::Break),
            SyntaxKind::ContinueStmt => ContinueStmt::cast(node).map(Stmt::Continue),
            SyntaxKind::ExprStmt => ExprStmt::cast(node).map(Stmt::Expr),
            SyntaxKind::EmptyStmt => EmptyStmt::cast(node).map(Stmt::Empty),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Stmt::Block(n) => n.as_cst(),
            Stmt::Local(n) => n.as_cst(),
            Stmt::If(n) => n.as_cst(),
            Stmt::While(n) => n.as_cst(),
            Stmt::For(n) => n.as_cst(),
            Stmt::Foreach(n) => n.as_cst(),
            Stmt::Return(n) => n.as_cst(),
            Stmt::Throw(n) => n.as_cst(),
            Stmt::Break(n) => n.as_cst(),
            Stmt::Continue(n) => n.as_cst(),
            Stmt::Expr(n) => n.as_cst(),
            Stmt::Empty(n) => n.as_cst(),
        }
    }

    pub fn text_range(&self) -> TextRange {
        self.as_cst().text_range()
    }
}

/// Expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(Literal),
    Name(NameRef),
    Paren(ParenExpr),
    Assign(AssignExpr),
    Conditional(ConditionalExpr),
    Binary(BinaryExpr),
    Prefix(PrefixExpr),
    Postfix(PostfixExpr),
    Cast(CastExpr),
    Call(CallExpr),
    Member(MemberExpr),
    Index(IndexExpr),
    Lambda(LambdaExpr),
    New(NewExpr),
    ArrayNew(ArrayNewExpr),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Literal => Literal::cast(node).map(Expr::Literal),
            SyntaxKind::NameRef => NameRef::cast(node).map(Expr::Name),
            SyntaxKind::ParenExpr => ParenExpr::cast(node).map(Expr::Paren),
            SyntaxKind::AssignExpr => AssignExpr::cast(node).map(Expr::Assign),
            SyntaxKind::ConditionalExpr => ConditionalExpr::cast(node).map(Expr::Conditional),
            SyntaxKind::BinaryExpr => BinaryExpr::cast(node).map(Expr::Binary),
            SyntaxKind::PrefixExpr => PrefixExpr::cast(node).map(Expr::Prefix),
            SyntaxKind::PostfixExpr => PostfixExpr::cast(node).map(Expr::Postfix),
            SyntaxKind::CastExpr => CastExpr::cast(node).map(Expr::Cast),
            SyntaxKind::CallExpr => CallExpr::cast(node).map(Expr::Call),
            SyntaxKind::MemberExpr => MemberExpr::cast(node).map(Expr::Member),
            SyntaxKind::IndexExpr => IndexExpr::cast(node).map(Expr::Index),
            SyntaxKind::LambdaExpr => LambdaExpr::cast(node).map(Expr::Lambda),
            SyntaxKind::NewExpr => NewExpr::cast(node).map(Expr::New),
            SyntaxKind::ArrayNewExpr => ArrayNewExpr::cast(node).map(Expr::ArrayNew),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Expr::Literal(n) => n.as_cst(),
            Expr::Name(n) => n.as_cst(),
            Expr::Paren(n) => n.as_cst(),
            Expr::Assign(n) => n.as_cst(),
            Expr::Conditional(n) => n.as_cst(),
            Expr::Binary(n) => n.as_cst(),
            Expr::Prefix(n) => n.as_cst(),
            Expr::Postfix(n) => n.as_cst(),
            Expr::Cast(n) => n.as_cst(),
            Expr::Call(n) => n.as_cst(),
            Expr::Member(n) => n.as_cst(),
            Expr::Index(n) => n.as_cst(),
            Expr::Lambda(n) => n.as_cst(),
            Expr::New(n) => n.as_cst(),
            Expr::ArrayNew(n) => n.as_cst(),
        }
    }

    pub fn text_range(&self) -> TextRange {
        self.as_cst().text_range()
    }

    /// Strips redundant parentheses.
    pub fn unparenthesized(self) -> Expr {
        let mut expr = self;
        while let Expr::Paren(paren) = &expr {
            match paren.inner() {
                Some(inner) => expr = inner,
                None => break,
            }
        }
        expr
    }
}

impl Root {
    pub fn usings(&self) -> impl Iterator<Item = UsingDecl> + '_ {
        self.0.children().filter_map(UsingDecl::cast)
    }

    pub fn class(&self) -> Option<ClassDecl> {
        self.0.children().find_map(ClassDecl::cast)
    }
}

impl UsingDecl {
    pub fn name(&self) -> Option<QualifiedName> {
        self.0.children().find_map(QualifiedName::cast)
    }
}

impl QualifiedName {
    /// Dotted path without trivia, e.g. `System.Linq`.
    pub fn text(&self) -> String {
        let segments: Vec<String> = tokens(&self.0)
            .filter(|t| t.kind() == SyntaxKind::Ident)
            .map(|t| t.text().to_string())
            .collect();
        segments.join(".")
    }
}

impl ClassDecl {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }

    pub fn method(&self) -> Option<MethodDecl> {
        self.0.children().find_map(MethodDecl::cast)
    }
}

impl MethodDecl {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }

    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

impl TypeRef {
    /// Type keyword (`int`, `string`, ...), if this is a keyword type.
    pub fn keyword(&self) -> Option<SyntaxToken> {
        tokens(&self.0).find(|t| t.kind().is_type_keyword() || t.kind() == SyntaxKind::KwVoid)
    }

    /// Dotted name without type arguments, e.g. `System.Exception` or `int`.
    pub fn name(&self) -> String {
        let segments: Vec<String> = tokens(&self.0)
            .filter(|t| {
                t.kind() == SyntaxKind::Ident
                    || t.kind().is_type_keyword()
                    || t.kind() == SyntaxKind::KwVoid
            })
            .map(|t| t.text().to_string())
            .collect();
        segments.join(".")
    }

    /// Last segment of the name.
    pub fn simple_name(&self) -> String {
        let name = self.name();
        name.rsplit('.').next().unwrap_or_default().to_string()
    }

    pub fn type_args(&self) -> Vec<TypeRef> {
        self.0
            .children()
            .find_map(TypeArgs::cast)
            .map(|args| args.0.children().filter_map(TypeRef::cast).collect())
            .unwrap_or_default()
    }

    pub fn is_array(&self) -> bool {
        token(&self.0, SyntaxKind::BracketOpen).is_some()
    }
}

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.0.children().filter_map(Stmt::cast)
    }

    pub fn close_brace(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::BraceClose)
    }
}

impl LocalDecl {
    pub fn is_var(&self) -> bool {
        token(&self.0, SyntaxKind::KwVar).is_some()
    }

    pub fn ty(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }

    pub fn init(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }
}

impl IfStmt {
    pub fn condition(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn then_branch(&self) -> Option<Stmt> {
        self.0.children().find_map(Stmt::cast)
    }

    pub fn else_branch(&self) -> Option<Stmt> {
        self.0
            .children()
            .find_map(ElseClause::cast)
            .and_then(|clause| clause.0.children().find_map(Stmt::cast))
    }
}

impl WhileStmt {
    pub fn condition(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn body(&self) -> Option<Stmt> {
        self.0.children().find_map(Stmt::cast)
    }
}

impl ForStmt {
    pub fn init(&self) -> Option<ForInit> {
        self.0.children().find_map(ForInit::cast)
    }

    pub fn condition(&self) -> Option<Expr> {
        self.0
            .children()
            .find_map(ForCond::cast)
            .and_then(|cond| exprs(&cond.0).next())
    }

    pub fn updates(&self) -> Vec<Expr> {
        self.0
            .children()
            .find_map(ForUpdate::cast)
            .map(|update| exprs(&update.0).collect())
            .unwrap_or_default()
    }

    pub fn body(&self) -> Option<Stmt> {
        self.0.children().find_map(Stmt::cast)
    }
}

impl ForInit {
    pub fn local(&self) -> Option<LocalDecl> {
        self.0.children().find_map(LocalDecl::cast)
    }

    pub fn exprs(&self) -> impl Iterator<Item = Expr> + '_ {
        exprs(&self.0)
    }
}

impl ForeachStmt {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }

    pub fn iterable(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn body(&self) -> Option<Stmt> {
        self.0.children().find_map(Stmt::cast)
    }
}

impl ReturnStmt {
    pub fn value(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }
}

impl ThrowStmt {
    pub fn value(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }
}

impl ExprStmt {
    pub fn expr(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }
}

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        tokens(&self.0).next()
    }
}

impl NameRef {
    pub fn token(&self) -> Option<SyntaxToken> {
        tokens(&self.0).next()
    }

    pub fn text(&self) -> String {
        self.token().map(|t| t.text().to_string()).unwrap_or_default()
    }

    pub fn is_type_keyword(&self) -> bool {
        self.token().is_some_and(|t| t.kind().is_type_keyword())
    }
}

impl ParenExpr {
    pub fn inner(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }
}

impl AssignExpr {
    pub fn target(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn value(&self) -> Option<Expr> {
        exprs(&self.0).nth(1)
    }

    pub fn op(&self) -> Option<SyntaxToken> {
        tokens(&self.0).find(|t| t.kind().is_assign_op())
    }
}

impl ConditionalExpr {
    pub fn condition(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn then_value(&self) -> Option<Expr> {
        exprs(&self.0).nth(1)
    }

    pub fn else_value(&self) -> Option<Expr> {
        exprs(&self.0).nth(2)
    }
}

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn rhs(&self) -> Option<Expr> {
        exprs(&self.0).nth(1)
    }

    pub fn op(&self) -> Option<SyntaxToken> {
        tokens(&self.0).next()
    }
}

impl PrefixExpr {
    pub fn op(&self) -> Option<SyntaxToken> {
        tokens(&self.0).next()
    }

    pub fn operand(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }
}

impl PostfixExpr {
    pub fn op(&self) -> Option<SyntaxToken> {
        tokens(&self.0).next()
    }

    pub fn operand(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }
}

impl CastExpr {
    pub fn ty(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    pub fn operand(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }
}

impl CallExpr {
    pub fn callee(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn args(&self) -> Vec<Expr> {
        self.0
            .children()
            .find_map(ArgList::cast)
            .map(|list| list.args().collect())
            .unwrap_or_default()
    }
}

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Expr> + '_ {
        exprs(&self.0)
    }
}

impl MemberExpr {
    pub fn target(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn member(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Ident)
    }
}

impl IndexExpr {
    pub fn target(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }

    pub fn index(&self) -> Option<Expr> {
        exprs(&self.0).nth(1)
    }
}

impl LambdaExpr {
    pub fn params(&self) -> Vec<SyntaxToken> {
        self.0
            .children()
            .find_map(ParamList::cast)
            .map(|list| {
                tokens(&list.0)
                    .filter(|t| t.kind() == SyntaxKind::Ident)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn body(&self) -> Option<Expr> {
        exprs(&self.0).next()
    }
}

impl NewExpr {
    pub fn ty(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    pub fn array_size(&self) -> Option<Expr> {
        self.0
            .children()
            .find_map(ArraySize::cast)
            .and_then(|size| exprs(&size.0).next())
    }

    pub fn args(&self) -> Option<ArgList> {
        self.0.children().find_map(ArgList::cast)
    }

    pub fn initializer(&self) -> Option<Initializer> {
        self.0.children().find_map(Initializer::cast)
    }
}

impl ArrayNewExpr {
    pub fn initializer(&self) -> Option<Initializer> {
        self.0.children().find_map(Initializer::cast)
    }
}

/// One element of a collection initializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InitItem {
    Single(Expr),
    /// `{ k, v }`: arguments to a multi-argument `Add`.
    Group(InitElement),
}

impl Initializer {
    pub fn items(&self) -> impl Iterator<Item = InitItem> + '_ {
        self.0.children().filter_map(|node| match node.kind() {
            SyntaxKind::InitElement => InitElement::cast(node).map(InitItem::Group),
            _ => Expr::cast(node).map(InitItem::Single),
        })
    }
}

impl InitElement {
    pub fn values(&self) -> impl Iterator<Item = Expr> + '_ {
        exprs(&self.0)
    }
}
