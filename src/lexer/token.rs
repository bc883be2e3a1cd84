// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Token definition for the [`logos`] scanner.
//!
//! Only the raw token classes carry [`logos`] rules. Keyword kinds are plain
//! variants: the lexer wrapper matches an [`Ident`](TokenKind::Ident) and
//! patches the kind through the keyword table (see [`super::keywords`]).

use std::fmt;

fn lex_block_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(idx) => {
            lex.bump(idx + 2);
            true
        }
        None => {
            lex.bump(rest.len());
            false
        }
    }
}

/// Scans the remainder of a quoted region started by `delim`.
///
/// A backslash escapes the next byte; a doubled delimiter stands for a
/// literal delimiter. Returns `false` on an unterminated region, with the
/// whole tail consumed so the error span covers it.
fn lex_quoted(lex: &mut logos::Lexer<TokenKind>, delim: u8) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' {
            i += 2;
        } else if b == delim {
            if bytes.get(i + 1) == Some(&delim) {
                i += 2;
            } else {
                lex.bump(i + 1);
                return true;
            }
        } else {
            i += 1;
        }
    }
    lex.bump(bytes.len());
    false
}

fn lex_string(lex: &mut logos::Lexer<TokenKind>) -> bool {
    lex_quoted(lex, b'\'')
}

fn lex_double_quoted(lex: &mut logos::Lexer<TokenKind>) -> bool {
    lex_quoted(lex, b'"')
}

fn lex_backtick_quoted(lex: &mut logos::Lexer<TokenKind>) -> bool {
    lex_quoted(lex, b'`')
}

/// Use to tokenize the input text.
#[derive(logos::Logos, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"--[^\n]*")]
    LineComment,

    #[token("/*", lex_block_comment)]
    BlockComment,

    /// Bare identifier, including the `@var` and `@@system_var` forms.
    #[regex(r"@?@?[a-zA-Z_][a-zA-Z0-9_]*", priority = 1)]
    Ident,

    /// Back-tick or double-quote delimited identifier.
    #[token("\"", lex_double_quoted)]
    #[token("`", lex_backtick_quoted)]
    QuotedIdent,

    /// All numeric forms share one kind; classification into integer, float,
    /// hex, binary, octal and hex-float happens when the literal is built.
    /// The leading-dot form (`.5`) is reinterpreted as tuple access when it
    /// shows up in infix position.
    #[regex(r"0[xX][0-9a-fA-F]+(\.[0-9a-fA-F]*)?([pP][+-]?[0-9]+)?", priority = 3)]
    #[regex(r"0[bB][01]+", priority = 3)]
    #[regex(r"0[oO][0-7]+", priority = 3)]
    #[regex(r"([0-9]+\.[0-9]*|\.[0-9]+|[0-9]+)([eE][+-]?[0-9]+)?", priority = 2)]
    Number,

    /// Single-quoted string literal; decoded when the literal node is built.
    #[token("'", lex_string)]
    String,

    /// `{name:Type}` query parameter, one token including the braces.
    #[regex(r"\{[^{}]*\}")]
    QueryParameter,

    #[token("->")]
    Arrow,

    #[token("::")]
    DoubleColon,

    #[token("<=>")]
    Spaceship,

    #[token("=")]
    #[token("==")]
    Eq,

    #[token("!=")]
    #[token("<>")]
    NotEq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("||")]
    Concat,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Asterisk,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token(";")]
    SemiColon,

    #[token(":")]
    Colon,

    #[token("?")]
    QuestionMark,

    // Keyword kinds, resolved from `Ident` through the keyword table.
    // `is_keyword()` relies on `AddKw..=YearKw` staying contiguous.
    AddKw,
    AfterKw,
    AliasKw,
    AllKw,
    AlterKw,
    AndKw,
    AntiKw,
    AnyKw,
    ApplyKw,
    ArrayKw,
    AsKw,
    AscKw,
    AscendingKw,
    AsofKw,
    AttachKw,
    BeginKw,
    BetweenKw,
    BothKw,
    ByKw,
    CaseKw,
    CastKw,
    CheckKw,
    ClearKw,
    ClusterKw,
    CodecKw,
    CollateKw,
    CollectionKw,
    ColumnKw,
    ColumnsKw,
    CommentKw,
    CommitKw,
    CompressionKw,
    ConstraintKw,
    CreateKw,
    CrossKw,
    CubeKw,
    CurrentKw,
    DatabaseKw,
    DatabasesKw,
    DateKw,
    DayKw,
    DeduplicateKw,
    DefaultKw,
    DeleteKw,
    DescKw,
    DescendingKw,
    DescribeKw,
    DetachKw,
    DictionariesKw,
    DictionaryKw,
    DistinctKw,
    DivKw,
    DropKw,
    ElseKw,
    EndKw,
    EngineKw,
    EphemeralKw,
    ExceptKw,
    ExchangeKw,
    ExistsKw,
    ExplainKw,
    ExtractKw,
    FalseKw,
    FetchKw,
    FillKw,
    FilterKw,
    FinalKw,
    FirstKw,
    FollowingKw,
    ForKw,
    FormatKw,
    FreezeKw,
    FromKw,
    FullKw,
    FunctionKw,
    GlobalKw,
    GrantKw,
    GrantsKw,
    GroupKw,
    GroupingKw,
    GroupsKw,
    HavingKw,
    HourKw,
    IdentifiedKw,
    IfKw,
    IgnoreKw,
    IlikeKw,
    InKw,
    IndexKw,
    InfKw,
    InfileKw,
    InnerKw,
    InsertKw,
    IntersectKw,
    IntervalKw,
    IntoKw,
    IsKw,
    JoinKw,
    KeyKw,
    LastKw,
    LeadingKw,
    LeftKw,
    LikeKw,
    LimitKw,
    MaterializeKw,
    MaterializedKw,
    MinuteKw,
    ModKw,
    ModifyKw,
    MonthKw,
    NamedKw,
    NanKw,
    NextKw,
    NotKw,
    NullKw,
    NullsKw,
    OffsetKw,
    OnKw,
    OnlyKw,
    OptimizeKw,
    OrKw,
    OrderKw,
    OuterKw,
    OutfileKw,
    OverKw,
    PartitionKw,
    PasteKw,
    PermanentlyKw,
    PolicyKw,
    PopulateKw,
    PrecedingKw,
    PrewhereKw,
    PrimaryKw,
    PrivilegesKw,
    ProfileKw,
    ProjectionKw,
    QualifyKw,
    QuarterKw,
    QuotaKw,
    RangeKw,
    RegexpKw,
    RemoveKw,
    RenameKw,
    ReplaceKw,
    ResourceKw,
    RespectKw,
    RightKw,
    RoleKw,
    RollbackKw,
    RollupKw,
    RowKw,
    RowsKw,
    SampleKw,
    SecondKw,
    SelectKw,
    SemiKw,
    SetKw,
    SettingKw,
    SettingsKw,
    ShowKw,
    StatisticsKw,
    StepKw,
    SubstringKw,
    SyncKw,
    SystemKw,
    TableKw,
    TablesKw,
    TemporaryKw,
    ThenKw,
    TiesKw,
    TimestampKw,
    ToKw,
    TopKw,
    TotalsKw,
    TrailingKw,
    TransactionKw,
    TrimKw,
    TrueKw,
    TruncateKw,
    TtlKw,
    UnboundedKw,
    UnionKw,
    UpdateKw,
    UseKw,
    UserKw,
    UsingKw,
    UuidKw,
    ValuesKw,
    ViewKw,
    WeekKw,
    WhenKw,
    WhereKw,
    WindowKw,
    WithKw,
    WorkloadKw,
    YearKw,

    /// Carries a diagnostic message in the token text; surfaced by the
    /// parser as a lexical error.
    Error,

    /// Marker token to indicate end of input, not used by lexer directly.
    Eof,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::LineComment | Self::BlockComment
        )
    }

    /// Whether this kind came out of the keyword table.
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::AddKw as u16) && (self as u16) <= (Self::YearKw as u16)
    }

    /// Keywords and identifiers can both start an identifier run; the parser
    /// accepts either wherever a name is expected.
    pub fn is_name(self) -> bool {
        self == Self::Ident || self == Self::QuotedIdent || self.is_keyword()
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn check(input: &str, kind: TokenKind) {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token();
        assert_eq!(token.kind, kind);
        assert_eq!(token.text, input);
    }

    #[test]
    fn lex_spaces_and_newlines() {
        check("  \t\n", TokenKind::Whitespace);
    }

    #[test]
    fn lex_ident() {
        check("hello", TokenKind::Ident);
        check("_x1", TokenKind::Ident);
        check("@@session_timezone", TokenKind::Ident);
    }

    #[test]
    fn lex_quoted_ident() {
        check(r#""order table""#, TokenKind::QuotedIdent);
        check("`select`", TokenKind::QuotedIdent);
    }

    #[test]
    fn lex_numbers() {
        check("42", TokenKind::Number);
        check("1.5e-3", TokenKind::Number);
        check(".5", TokenKind::Number);
        check("0xdeadbeef", TokenKind::Number);
        check("0x1.8p3", TokenKind::Number);
        check("0b1010", TokenKind::Number);
        check("0o777", TokenKind::Number);
    }

    #[test]
    fn lex_string_with_escapes() {
        check(r"'it\'s'", TokenKind::String);
        check("'it''s'", TokenKind::String);
    }

    #[test]
    fn lex_unterminated_string() {
        let mut lexer = Lexer::new("'never closed");
        assert_eq!(lexer.next_token().kind, TokenKind::Error);
    }

    #[test]
    fn lex_unterminated_block_comment() {
        let mut lexer = Lexer::new("/* never closed");
        assert_eq!(lexer.next_token().kind, TokenKind::Error);
    }

    #[test]
    fn lex_query_parameter() {
        check("{limit:UInt8}", TokenKind::QueryParameter);
    }

    #[test]
    fn lex_multi_char_operators() {
        check("::", TokenKind::DoubleColon);
        check("<=>", TokenKind::Spaceship);
        check("->", TokenKind::Arrow);
        check("||", TokenKind::Concat);
        check("<>", TokenKind::NotEq);
    }

    #[test]
    fn keyword_range_is_contiguous() {
        assert!(TokenKind::SelectKw.is_keyword());
        assert!(TokenKind::YearKw.is_keyword());
        assert!(TokenKind::AddKw.is_keyword());
        assert!(!TokenKind::Ident.is_keyword());
        assert!(!TokenKind::Error.is_keyword());
    }
}
