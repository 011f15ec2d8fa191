//! The tabbed, searchable and paginated transaction list of the dashboard.

use maud::{Markup, html};
use time::Date;

use crate::{
    api::TransactionRecord,
    category::{FALLBACK_CATEGORY, TransactionKind},
    html::{
        CATEGORY_BADGE_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    period::DATE_FORMAT,
};

/// The tabs of the transaction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Expenses only.
    #[default]
    Expenses,
    /// Revenue only.
    Revenue,
    /// Everything, newest first.
    History,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Tab; 3] = [Tab::Expenses, Tab::Revenue, Tab::History];

    /// Read the tab from the `aba` query value, defaulting to [Tab::Expenses].
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("receitas") => Tab::Revenue,
            Some("historico") => Tab::History,
            _ => Tab::Expenses,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Expenses => "despesas",
            Tab::Revenue => "receitas",
            Tab::History => "historico",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Expenses => "Despesas",
            Tab::Revenue => "Receitas",
            Tab::History => "Histórico",
        }
    }

    fn includes(self, kind: TransactionKind) -> bool {
        match self {
            Tab::Expenses => kind == TransactionKind::Expense,
            Tab::Revenue => kind == TransactionKind::Revenue,
            Tab::History => true,
        }
    }
}

fn matches_search(transaction: &TransactionRecord, search: &str) -> bool {
    [&transaction.description, &transaction.establishment]
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(search))
}

/// The transactions shown in `tab` that match `search`, newest first.
///
/// The search ignores case and looks at the description and establishment.
/// Transactions without a date are listed last.
pub fn visible_transactions<'a>(
    transactions: &'a [TransactionRecord],
    tab: Tab,
    search: &str,
) -> Vec<&'a TransactionRecord> {
    let search = search.trim().to_lowercase();

    let mut visible = transactions
        .iter()
        .filter(|transaction| tab.includes(transaction.kind))
        .filter(|transaction| search.is_empty() || matches_search(transaction, &search))
        .collect::<Vec<_>>();

    visible.sort_by(|a, b| b.date.cmp(&a.date));

    visible
}

/// The day and month of a backend date, e.g. "07/03".
fn short_date(date: Option<&str>) -> String {
    date.and_then(|date| date.get(..10))
        .and_then(|date| Date::parse(date, DATE_FORMAT).ok())
        .map(|date| format!("{:02}/{:02}", date.day(), u8::from(date.month())))
        .unwrap_or_else(|| "-".to_owned())
}

fn amount_view(transaction: &TransactionRecord) -> Markup {
    match transaction.kind {
        TransactionKind::Expense => html! {
            span class="text-red-600 dark:text-red-400" { "-" (format_currency(transaction.amount)) }
        },
        TransactionKind::Revenue => html! {
            span class="text-green-600 dark:text-green-400" { (format_currency(transaction.amount)) }
        },
    }
}

/// The table of `transactions`.
pub fn transactions_table(transactions: &[&TransactionRecord]) -> Markup {
    if transactions.is_empty() {
        return html! {
            p id="transactions-empty" class="py-8 text-center text-gray-500 dark:text-gray-400"
            {
                "Nenhuma transação encontrada."
            }
        };
    }

    html! {
        div class="overflow-x-auto rounded-lg shadow"
        {
            table id="transactions" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Data" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Descrição" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Categoria" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Valor" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Nota" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (transaction_row(transaction))
                    }
                }
            }
        }
    }
}

fn transaction_row(transaction: &TransactionRecord) -> Markup {
    let description = transaction
        .description
        .as_deref()
        .filter(|description| !description.is_empty())
        .or(transaction.establishment.as_deref())
        .unwrap_or_default();
    let category = transaction
        .category
        .as_deref()
        .unwrap_or(FALLBACK_CATEGORY);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) { (short_date(transaction.date.as_deref())) }
            td class=(TABLE_CELL_STYLE) { (description) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (category) }
                @if let Some(subcategory) = transaction.subcategory.as_deref().filter(|s| !s.is_empty()) {
                    span class="ml-1 text-xs" { (subcategory) }
                }
            }
            td class=(TABLE_CELL_STYLE) { (amount_view(transaction)) }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(url) = transaction.receipt_url.as_deref().filter(|url| !url.is_empty()) {
                    a href=(url) target="_blank" class=(LINK_STYLE) { "Ver" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Tab, short_date, visible_transactions};
    use crate::{api::TransactionRecord, category::TransactionKind};

    fn record(id: i64, kind: TransactionKind, date: Option<&str>, description: &str) -> TransactionRecord {
        TransactionRecord {
            id,
            kind,
            amount: 10.0,
            date: date.map(str::to_owned),
            category: None,
            subcategory: None,
            description: Some(description.to_owned()),
            establishment: None,
            receipt_url: None,
        }
    }

    #[test]
    fn reads_tab_with_default() {
        assert_eq!(Tab::from_query(Some("receitas")), Tab::Revenue);
        assert_eq!(Tab::from_query(Some("historico")), Tab::History);
        assert_eq!(Tab::from_query(Some("outra")), Tab::Expenses);
        assert_eq!(Tab::from_query(None), Tab::Expenses);
    }

    #[test]
    fn history_lists_newest_first_without_date_last() {
        let transactions = vec![
            record(1, TransactionKind::Expense, Some("2025-03-02"), "a"),
            record(2, TransactionKind::Revenue, None, "b"),
            record(3, TransactionKind::Revenue, Some("2025-03-20"), "c"),
        ];

        let got = visible_transactions(&transactions, Tab::History, "")
            .into_iter()
            .map(|transaction| transaction.id)
            .collect::<Vec<_>>();

        assert_eq!(got, [3, 1, 2]);
    }

    #[test]
    fn tabs_filter_by_kind() {
        let transactions = vec![
            record(1, TransactionKind::Expense, Some("2025-03-02"), "a"),
            record(2, TransactionKind::Revenue, Some("2025-03-03"), "b"),
        ];

        assert_eq!(visible_transactions(&transactions, Tab::Expenses, "")[0].id, 1);
        assert_eq!(visible_transactions(&transactions, Tab::Revenue, "")[0].id, 2);
    }

    #[test]
    fn search_ignores_case() {
        let mut with_establishment = record(2, TransactionKind::Expense, None, "");
        with_establishment.establishment = Some("Peixaria Sul".to_owned());
        let transactions = vec![
            record(1, TransactionKind::Expense, None, "Gelo para sexta"),
            with_establishment,
        ];

        assert_eq!(visible_transactions(&transactions, Tab::Expenses, "GELO").len(), 1);
        assert_eq!(visible_transactions(&transactions, Tab::Expenses, " peixaria ")[0].id, 2);
    }

    #[test]
    fn shows_day_and_month() {
        assert_eq!(short_date(Some("2025-03-07")), "07/03");
        assert_eq!(short_date(Some("2025-12-25T10:00:00")), "25/12");
        assert_eq!(short_date(Some("ontem")), "-");
        assert_eq!(short_date(None), "-");
    }
}
