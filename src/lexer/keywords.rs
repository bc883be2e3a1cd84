// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Case-insensitive keyword table.
//!
//! The scanner produces a generic [`TokenKind::Ident`]; a hit in this table
//! replaces the kind with the specific keyword kind. The table is broader
//! than the set of words the parser treats as reserved: every keyword is
//! still accepted wherever an identifier fits (see the grammar helpers).

use super::token::TokenKind;
use indexmap::IndexMap;
use lazy_static::lazy_static;

/// Keyword spellings, upper-cased. Keep alphabetically sorted.
static KEYWORDS: &[(&str, TokenKind)] = &[
    ("ADD", TokenKind::AddKw),
    ("AFTER", TokenKind::AfterKw),
    ("ALIAS", TokenKind::AliasKw),
    ("ALL", TokenKind::AllKw),
    ("ALTER", TokenKind::AlterKw),
    ("AND", TokenKind::AndKw),
    ("ANTI", TokenKind::AntiKw),
    ("ANY", TokenKind::AnyKw),
    ("APPLY", TokenKind::ApplyKw),
    ("ARRAY", TokenKind::ArrayKw),
    ("AS", TokenKind::AsKw),
    ("ASC", TokenKind::AscKw),
    ("ASCENDING", TokenKind::AscendingKw),
    ("ASOF", TokenKind::AsofKw),
    ("ATTACH", TokenKind::AttachKw),
    ("BEGIN", TokenKind::BeginKw),
    ("BETWEEN", TokenKind::BetweenKw),
    ("BOTH", TokenKind::BothKw),
    ("BY", TokenKind::ByKw),
    ("CASE", TokenKind::CaseKw),
    ("CAST", TokenKind::CastKw),
    ("CHECK", TokenKind::CheckKw),
    ("CLEAR", TokenKind::ClearKw),
    ("CLUSTER", TokenKind::ClusterKw),
    ("CODEC", TokenKind::CodecKw),
    ("COLLATE", TokenKind::CollateKw),
    ("COLLECTION", TokenKind::CollectionKw),
    ("COLUMN", TokenKind::ColumnKw),
    ("COLUMNS", TokenKind::ColumnsKw),
    ("COMMENT", TokenKind::CommentKw),
    ("COMMIT", TokenKind::CommitKw),
    ("COMPRESSION", TokenKind::CompressionKw),
    ("CONSTRAINT", TokenKind::ConstraintKw),
    ("CREATE", TokenKind::CreateKw),
    ("CROSS", TokenKind::CrossKw),
    ("CUBE", TokenKind::CubeKw),
    ("CURRENT", TokenKind::CurrentKw),
    ("DATABASE", TokenKind::DatabaseKw),
    ("DATABASES", TokenKind::DatabasesKw),
    ("DATE", TokenKind::DateKw),
    ("DAY", TokenKind::DayKw),
    ("DEDUPLICATE", TokenKind::DeduplicateKw),
    ("DEFAULT", TokenKind::DefaultKw),
    ("DELETE", TokenKind::DeleteKw),
    ("DESC", TokenKind::DescKw),
    ("DESCENDING", TokenKind::DescendingKw),
    ("DESCRIBE", TokenKind::DescribeKw),
    ("DETACH", TokenKind::DetachKw),
    ("DICTIONARIES", TokenKind::DictionariesKw),
    ("DICTIONARY", TokenKind::DictionaryKw),
    ("DISTINCT", TokenKind::DistinctKw),
    ("DIV", TokenKind::DivKw),
    ("DROP", TokenKind::DropKw),
    ("ELSE", TokenKind::ElseKw),
    ("END", TokenKind::EndKw),
    ("ENGINE", TokenKind::EngineKw),
    ("EPHEMERAL", TokenKind::EphemeralKw),
    ("EXCEPT", TokenKind::ExceptKw),
    ("EXCHANGE", TokenKind::ExchangeKw),
    ("EXISTS", TokenKind::ExistsKw),
    ("EXPLAIN", TokenKind::ExplainKw),
    ("EXTRACT", TokenKind::ExtractKw),
    ("FALSE", TokenKind::FalseKw),
    ("FETCH", TokenKind::FetchKw),
    ("FILL", TokenKind::FillKw),
    ("FILTER", TokenKind::FilterKw),
    ("FINAL", TokenKind::FinalKw),
    ("FIRST", TokenKind::FirstKw),
    ("FOLLOWING", TokenKind::FollowingKw),
    ("FOR", TokenKind::ForKw),
    ("FORMAT", TokenKind::FormatKw),
    ("FREEZE", TokenKind::FreezeKw),
    ("FROM", TokenKind::FromKw),
    ("FULL", TokenKind::FullKw),
    ("FUNCTION", TokenKind::FunctionKw),
    ("GLOBAL", TokenKind::GlobalKw),
    ("GRANT", TokenKind::GrantKw),
    ("GRANTS", TokenKind::GrantsKw),
    ("GROUP", TokenKind::GroupKw),
    ("GROUPING", TokenKind::GroupingKw),
    ("GROUPS", TokenKind::GroupsKw),
    ("HAVING", TokenKind::HavingKw),
    ("HOUR", TokenKind::HourKw),
    ("IDENTIFIED", TokenKind::IdentifiedKw),
    ("IF", TokenKind::IfKw),
    ("IGNORE", TokenKind::IgnoreKw),
    ("ILIKE", TokenKind::IlikeKw),
    ("IN", TokenKind::InKw),
    ("INDEX", TokenKind::IndexKw),
    ("INF", TokenKind::InfKw),
    ("INFILE", TokenKind::InfileKw),
    ("INNER", TokenKind::InnerKw),
    ("INSERT", TokenKind::InsertKw),
    ("INTERSECT", TokenKind::IntersectKw),
    ("INTERVAL", TokenKind::IntervalKw),
    ("INTO", TokenKind::IntoKw),
    ("IS", TokenKind::IsKw),
    ("JOIN", TokenKind::JoinKw),
    ("KEY", TokenKind::KeyKw),
    ("LAST", TokenKind::LastKw),
    ("LEADING", TokenKind::LeadingKw),
    ("LEFT", TokenKind::LeftKw),
    ("LIKE", TokenKind::LikeKw),
    ("LIMIT", TokenKind::LimitKw),
    ("MATERIALIZE", TokenKind::MaterializeKw),
    ("MATERIALIZED", TokenKind::MaterializedKw),
    ("MINUTE", TokenKind::MinuteKw),
    ("MOD", TokenKind::ModKw),
    ("MODIFY", TokenKind::ModifyKw),
    ("MONTH", TokenKind::MonthKw),
    ("NAMED", TokenKind::NamedKw),
    ("NAN", TokenKind::NanKw),
    ("NEXT", TokenKind::NextKw),
    ("NOT", TokenKind::NotKw),
    ("NULL", TokenKind::NullKw),
    ("NULLS", TokenKind::NullsKw),
    ("OFFSET", TokenKind::OffsetKw),
    ("ON", TokenKind::OnKw),
    ("ONLY", TokenKind::OnlyKw),
    ("OPTIMIZE", TokenKind::OptimizeKw),
    ("OR", TokenKind::OrKw),
    ("ORDER", TokenKind::OrderKw),
    ("OUTER", TokenKind::OuterKw),
    ("OUTFILE", TokenKind::OutfileKw),
    ("OVER", TokenKind::OverKw),
    ("PARTITION", TokenKind::PartitionKw),
    ("PASTE", TokenKind::PasteKw),
    ("PERMANENTLY", TokenKind::PermanentlyKw),
    ("POLICY", TokenKind::PolicyKw),
    ("POPULATE", TokenKind::PopulateKw),
    ("PRECEDING", TokenKind::PrecedingKw),
    ("PREWHERE", TokenKind::PrewhereKw),
    ("PRIMARY", TokenKind::PrimaryKw),
    ("PRIVILEGES", TokenKind::PrivilegesKw),
    ("PROFILE", TokenKind::ProfileKw),
    ("PROJECTION", TokenKind::ProjectionKw),
    ("QUALIFY", TokenKind::QualifyKw),
    ("QUARTER", TokenKind::QuarterKw),
    ("QUOTA", TokenKind::QuotaKw),
    ("RANGE", TokenKind::RangeKw),
    ("REGEXP", TokenKind::RegexpKw),
    ("REMOVE", TokenKind::RemoveKw),
    ("RENAME", TokenKind::RenameKw),
    ("REPLACE", TokenKind::ReplaceKw),
    ("RESOURCE", TokenKind::ResourceKw),
    ("RESPECT", TokenKind::RespectKw),
    ("RIGHT", TokenKind::RightKw),
    ("ROLE", TokenKind::RoleKw),
    ("ROLLBACK", TokenKind::RollbackKw),
    ("ROLLUP", TokenKind::RollupKw),
    ("ROW", TokenKind::RowKw),
    ("ROWS", TokenKind::RowsKw),
    ("SAMPLE", TokenKind::SampleKw),
    ("SECOND", TokenKind::SecondKw),
    ("SELECT", TokenKind::SelectKw),
    ("SEMI", TokenKind::SemiKw),
    ("SET", TokenKind::SetKw),
    ("SETTING", TokenKind::SettingKw),
    ("SETTINGS", TokenKind::SettingsKw),
    ("SHOW", TokenKind::ShowKw),
    ("STATISTICS", TokenKind::StatisticsKw),
    ("STEP", TokenKind::StepKw),
    ("SUBSTRING", TokenKind::SubstringKw),
    ("SYNC", TokenKind::SyncKw),
    ("SYSTEM", TokenKind::SystemKw),
    ("TABLE", TokenKind::TableKw),
    ("TABLES", TokenKind::TablesKw),
    ("TEMPORARY", TokenKind::TemporaryKw),
    ("THEN", TokenKind::ThenKw),
    ("TIES", TokenKind::TiesKw),
    ("TIMESTAMP", TokenKind::TimestampKw),
    ("TO", TokenKind::ToKw),
    ("TOP", TokenKind::TopKw),
    ("TOTALS", TokenKind::TotalsKw),
    ("TRAILING", TokenKind::TrailingKw),
    ("TRANSACTION", TokenKind::TransactionKw),
    ("TRIM", TokenKind::TrimKw),
    ("TRUE", TokenKind::TrueKw),
    ("TRUNCATE", TokenKind::TruncateKw),
    ("TTL", TokenKind::TtlKw),
    ("UNBOUNDED", TokenKind::UnboundedKw),
    ("UNION", TokenKind::UnionKw),
    ("UPDATE", TokenKind::UpdateKw),
    ("USE", TokenKind::UseKw),
    ("USER", TokenKind::UserKw),
    ("USING", TokenKind::UsingKw),
    ("UUID", TokenKind::UuidKw),
    ("VALUES", TokenKind::ValuesKw),
    ("VIEW", TokenKind::ViewKw),
    ("WEEK", TokenKind::WeekKw),
    ("WHEN", TokenKind::WhenKw),
    ("WHERE", TokenKind::WhereKw),
    ("WINDOW", TokenKind::WindowKw),
    ("WITH", TokenKind::WithKw),
    ("WORKLOAD", TokenKind::WorkloadKw),
    ("YEAR", TokenKind::YearKw),
];

lazy_static! {
    static ref KEYWORD_TABLE: IndexMap<&'static str, TokenKind> =
        KEYWORDS.iter().copied().collect();
}

/// Resolves a bare identifier against the keyword table.
pub fn keyword_kind(ident: &str) -> Option<TokenKind> {
    if ident.len() > 16 || !ident.is_ascii() {
        return None;
    }
    KEYWORD_TABLE
        .get(ident.to_ascii_uppercase().as_str())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(keyword_kind("select"), Some(TokenKind::SelectKw));
        assert_eq!(keyword_kind("SeLeCt"), Some(TokenKind::SelectKw));
        assert_eq!(keyword_kind("PREWHERE"), Some(TokenKind::PrewhereKw));
        assert_eq!(keyword_kind("rowcount"), None);
    }

    #[test]
    fn table_is_sorted_and_unique() {
        for pair in KEYWORDS.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} vs {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn every_entry_is_a_keyword_kind() {
        for (_, kind) in KEYWORDS {
            assert!(kind.is_keyword(), "{kind}");
        }
    }
}
