//! The catalog of expense and revenue categories.
//!
//! Expense categories own an ordered list of subcategories. Revenue categories
//! are flat. Every category and subcategory has a fixed chart color so that the
//! same category is drawn with the same color on every page.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// The category used when nothing better is known.
pub const FALLBACK_CATEGORY: &str = "Outros";

/// The category pre-selected in the review form when neither the file name nor
/// the extracted data suggest one.
pub const DEFAULT_EXPENSE_CATEGORY: &str = "Insumos";

/// The label used for expenses recorded without a subcategory.
pub const NO_SUBCATEGORY: &str = "Sem subcategoria";

const EXPENSE_FALLBACK_COLOR: &str = "#6c757d";
const SUBCATEGORY_FALLBACK_COLOR: &str = "#6c757d";
const REVENUE_FALLBACK_COLOR: &str = "#198754";

/// Whether a transaction records money going out or coming in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money spent by the business.
    #[default]
    #[serde(rename = "DESPESA")]
    Expense,
    /// Money received by the business.
    #[serde(rename = "RECEITA")]
    Revenue,
}

impl TransactionKind {
    /// The value used by the backend API and in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Expense => "DESPESA",
            TransactionKind::Revenue => "RECEITA",
        }
    }

    /// The capitalised name shown in titles, e.g. "Nova Despesa".
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Expense => "Despesa",
            TransactionKind::Revenue => "Receita",
        }
    }

    /// The name used when reporting counts, e.g. "3 despesa(s) salva(s)".
    pub fn count_label(self) -> &'static str {
        match self {
            TransactionKind::Expense => "despesa(s)",
            TransactionKind::Revenue => "receita(s)",
        }
    }

    /// The categories a user may pick for this kind of transaction.
    pub fn category_options(self) -> Vec<CategoryOption> {
        match self {
            TransactionKind::Expense => EXPENSE_CATEGORIES
                .iter()
                .map(|category| CategoryOption {
                    value: category.name,
                    label: category.name,
                })
                .collect(),
            TransactionKind::Revenue => REVENUE_CATEGORY_OPTIONS.to_vec(),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DESPESA" => Ok(TransactionKind::Expense),
            "RECEITA" => Ok(TransactionKind::Revenue),
            other => Err(format!("unknown transaction kind \"{other}\"")),
        }
    }
}

/// A value that can be chosen in a `<select>` and the text shown for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryOption {
    /// The value submitted with the form.
    pub value: &'static str,
    /// The text displayed to the user.
    pub label: &'static str,
}

const fn option(value: &'static str, label: &'static str) -> CategoryOption {
    CategoryOption { value, label }
}

/// An expense category with its chart color and subcategories.
#[derive(Debug, Clone, Copy)]
pub struct ExpenseCategory {
    /// The category name as stored by the backend.
    pub name: &'static str,
    /// The color used to draw this category in charts.
    pub color: &'static str,
    /// The subcategories in display order.
    pub subcategories: &'static [CategoryOption],
}

/// The expense categories in display order.
pub const EXPENSE_CATEGORIES: &[ExpenseCategory] = &[
    ExpenseCategory {
        name: "Insumos",
        color: "#28a745",
        subcategories: &[
            option("Frutos do Mar", "🦐 Frutos do Mar"),
            option("Carnes e Aves", "🥩 Carnes e Aves"),
            option("Hortifruti", "🥬 Hortifruti"),
            option("Laticínios", "🧀 Laticínios"),
            option("Frutas", "🍎 Frutas"),
            option("Alimento (Variado)", "🥘 Alimento (Variado)"),
            option("Gelo", "🧊 Gelo"),
            option("Outros", "📋 Outros"),
        ],
    },
    ExpenseCategory {
        name: "Bebidas",
        color: "#ffc107",
        subcategories: &[
            option("Bebidas", "🥤 Bebidas"),
            option("Cervejas", "🍺 Cervejas"),
            option("Destilados", "🍸 Destilados"),
            option("Vinhos", "🍾 Vinhos"),
            option("Energético", "⚡ Energético"),
            option("Outros", "📋 Outros"),
        ],
    },
    ExpenseCategory {
        name: "Operacional",
        color: "#17a2b8",
        subcategories: &[
            option("Embalagens", "📦 Embalagens"),
            option("Limpeza", "🧹 Limpeza"),
            option("Manutenção", "🔧 Manutenção"),
            option("Gás", "🔥 Gás"),
            option("Organização", "📁 Organização"),
            option("Outros", "📋 Outros"),
        ],
    },
    ExpenseCategory {
        name: "Pessoal",
        color: "#5c6bc0",
        subcategories: &[
            option("Pessoal", "👥 Pessoal"),
            option("Pro Labore", "💼 Pro Labore"),
            option("Salário", "💰 Salário"),
            option("Freelancer", "🧑‍💻 Freelancer"),
            option("Gorjeta", "💵 Gorjeta"),
            option("Venda de Férias", "🏖️ Venda de Férias"),
            option("Venda de Folga", "📅 Venda de Folga"),
            option("Vale Transporte", "🚌 Vale Transporte"),
            option("Vale Refeição", "🍽️ Vale Refeição"),
            option("DJ/Músicos", "🎵 DJ/Músicos"),
            option("Hora Extra", "⏰ Hora Extra"),
            option("Outros", "📋 Outros"),
        ],
    },
    ExpenseCategory {
        name: "Infraestrutura",
        color: "#8d6e63",
        subcategories: &[
            option("Aluguel", "🏠 Aluguel"),
            option("Energia", "💡 Energia"),
            option("Seguros", "🛡️ Seguros"),
            option("Outros", "📋 Outros"),
        ],
    },
    ExpenseCategory {
        name: "Administrativo",
        color: "#455a64",
        subcategories: &[
            option("Impostos", "🏛️ Impostos"),
            option("Transporte", "🚚 Transporte"),
            option("Outros", "📋 Outros"),
        ],
    },
    ExpenseCategory {
        name: "Marketing e Eventos",
        color: "#651fff",
        subcategories: &[
            option("Eventos", "🎉 Eventos"),
            option("Marketing", "📢 Marketing"),
            option("Aluguel", "🏠 Aluguel"),
            option("Outros", "📋 Outros"),
        ],
    },
    ExpenseCategory {
        name: "Outros",
        color: "#6c757d",
        subcategories: &[option("Outros", "📋 Outros")],
    },
];

/// The revenue categories accepted by the backend, in filter order.
pub const REVENUE_CATEGORIES: &[&str] = &["Vendas", "Caixa", "PIX", "Cartão", "Transferência", "Outros"];

/// The revenue categories offered when reviewing uploaded receipts.
pub const REVENUE_CATEGORY_OPTIONS: &[CategoryOption] = &[
    option("PIX", "📱 PIX"),
    option("Cartão", "💳 Cartão"),
    option("Transferência", "🏦 Transferência"),
    option("Vendas", "🛒 Vendas"),
    option("Outros", "📋 Outros"),
];

const REVENUE_COLORS: &[(&str, &str)] = &[
    ("Vendas", "#198754"),
    ("PIX", "#20c997"),
    ("Cartão", "#0d6efd"),
    ("Transferência", "#6610f2"),
    ("Outros", "#6c757d"),
];

const SUBCATEGORY_COLORS: &[(&str, &str)] = &[
    ("Frutos do Mar", "#00D4FF"),
    ("Carnes e Aves", "#FF4757"),
    ("Hortifruti", "#2ED573"),
    ("Laticínios", "#FFA502"),
    ("Frutas", "#FF6B81"),
    ("Alimento (Variado)", "#A55EEA"),
    ("Gelo", "#70A1FF"),
    ("Bebidas", "#FFD93D"),
    ("Cervejas", "#FF9F43"),
    ("Destilados", "#9B59B6"),
    ("Vinhos", "#E91E63"),
    ("Energético", "#FF5252"),
    ("Embalagens", "#54A0FF"),
    ("Limpeza", "#00CEC9"),
    ("Manutenção", "#F39C12"),
    ("Gás", "#E74C3C"),
    ("Organização", "#EC407A"),
    ("Pessoal", "#3498DB"),
    ("Pro Labore", "#E74C3C"),
    ("Salário", "#27AE60"),
    ("Freelancer", "#F39C12"),
    ("Gorjeta", "#9B59B6"),
    ("Venda de Férias", "#1ABC9C"),
    ("Venda de Folga", "#E67E22"),
    ("Vale Transporte", "#3498DB"),
    ("Vale Refeição", "#E91E63"),
    ("Aluguel", "#D35400"),
    ("Energia", "#F1C40F"),
    ("Seguros", "#16A085"),
    ("Impostos", "#576574"),
    ("Transporte", "#10AC84"),
    ("Eventos", "#B33771"),
    ("Marketing", "#00B894"),
    ("Outros", "#95A5A6"),
    (NO_SUBCATEGORY, "#BDC3C7"),
];

fn find_expense_category(name: &str) -> Option<&'static ExpenseCategory> {
    EXPENSE_CATEGORIES
        .iter()
        .find(|category| category.name == name)
        .or_else(|| {
            let name = name.to_lowercase();
            EXPENSE_CATEGORIES
                .iter()
                .find(|category| category.name.to_lowercase() == name)
        })
}

/// The subcategory options of the expense category `category`.
///
/// Unknown categories get the subcategories of "Outros".
pub fn subcategories_for(category: &str) -> &'static [CategoryOption] {
    find_expense_category(category)
        .or_else(|| find_expense_category(FALLBACK_CATEGORY))
        .map(|category| category.subcategories)
        .unwrap_or_default()
}

/// Find the option in `options` whose value matches `name`, ignoring case.
pub fn find_option<'a>(options: &'a [CategoryOption], name: &str) -> Option<&'a CategoryOption> {
    let name = name.to_lowercase();
    options
        .iter()
        .find(|option| option.value.to_lowercase() == name)
}

/// Map `name` onto one of the categories known for `kind`.
///
/// Exact matches win over case-insensitive ones. Anything else becomes
/// [FALLBACK_CATEGORY].
pub fn normalize_category(kind: TransactionKind, name: &str) -> &'static str {
    let known: Vec<&'static str> = match kind {
        TransactionKind::Expense => EXPENSE_CATEGORIES.iter().map(|c| c.name).collect(),
        TransactionKind::Revenue => REVENUE_CATEGORIES.to_vec(),
    };

    if let Some(exact) = known.iter().find(|category| **category == name) {
        return *exact;
    }

    let lowercase_name = name.to_lowercase();
    known
        .into_iter()
        .find(|category| category.to_lowercase() == lowercase_name)
        .unwrap_or(FALLBACK_CATEGORY)
}

/// Whether `name` is one of the revenue categories.
pub fn is_revenue_category(name: &str) -> bool {
    REVENUE_CATEGORIES.contains(&name)
}

/// The chart color of an expense category.
pub fn expense_color(category: &str) -> &'static str {
    find_expense_category(category)
        .map(|category| category.color)
        .unwrap_or(EXPENSE_FALLBACK_COLOR)
}

/// The chart color of an expense subcategory.
pub fn subcategory_color(subcategory: &str) -> &'static str {
    lookup_color(SUBCATEGORY_COLORS, subcategory).unwrap_or(SUBCATEGORY_FALLBACK_COLOR)
}

/// The chart color of a revenue category.
pub fn revenue_color(category: &str) -> &'static str {
    lookup_color(REVENUE_COLORS, category).unwrap_or(REVENUE_FALLBACK_COLOR)
}

fn lookup_color(table: &[(&str, &'static str)], name: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, color)| *color)
}
