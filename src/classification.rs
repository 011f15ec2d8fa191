//! Suggests a category for a receipt from its file name.
//!
//! Users tend to name scanned receipts after the supplier, e.g.
//! "peixaria_jan.pdf". A fixed, ordered list of rules maps those names onto an
//! expense category and subcategory. The first rule whose pattern matches wins.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

/// A category suggested by a classification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// The suggested expense category.
    pub category: &'static str,
    /// The suggested subcategory within `category`.
    pub subcategory: &'static str,
}

/// A rule that classifies file names matching `pattern` (case-insensitive).
struct ClassificationRule {
    pattern: Regex,
    classification: Classification,
}

const RULE_TABLE: &[(&str, &str, &str)] = &[
    // Payment processors, sales and transfers
    (r"pag\s*free|pagfree|pag\s*seguro|pagseguro", "Administrativo", "Outros"),
    (r"volga|vendas?\s*volga", "Administrativo", "Outros"),
    (r"getnet|cielo|rede|stone|sumup|mercado\s*pago", "Administrativo", "Outros"),
    (r"pix|transferencia|ted|doc", "Administrativo", "Outros"),
    (r"caixa|vendas|venda", "Administrativo", "Outros"),
    // Insumos
    (r"peixaria|peixe|pescado|frutos?\s*do\s*mar|camar[aã]o", "Insumos", "Frutos do Mar"),
    (r"açougue|a[cç]ougue|carne|frango|boi", "Insumos", "Carnes e Aves"),
    (r"hortifruti|hortifrutti|verdura|legume|salada", "Insumos", "Hortifruti"),
    (r"latic[ií]nio|queijo|leite|manteiga", "Insumos", "Laticínios"),
    (r"fruta|banana|laranja|lim[aã]o|abacaxi", "Insumos", "Frutas"),
    (r"gelo|gelada|freezer", "Insumos", "Gelo"),
    // Bebidas
    (r"cerveja|budweiser|heineken|stella|corona|brahma|skol", "Bebidas", "Cervejas"),
    (r"destilado|gin|vodka|whisky|rum|tequila|cacha[cç]a", "Bebidas", "Destilados"),
    (r"vinho|champagne|espumante", "Bebidas", "Vinhos"),
    (r"red\s*bull|monster|energ[eé]tico", "Bebidas", "Energético"),
    (r"bebida|refrigerante|[aá]gua|suco|coca", "Bebidas", "Bebidas"),
    // Operacional
    (r"embalagem|descart[aá]vel|guardanapo|sacola", "Operacional", "Embalagens"),
    (r"limpeza|higiene|detergente|desinfetante", "Operacional", "Limpeza"),
    (r"manuten[cç][aã]o|reparo|conserto|pe[cç]a", "Operacional", "Manutenção"),
    (r"g[aá]s|botij[aã]o|glp", "Operacional", "Gás"),
    // Pessoal
    (r"sal[aá]rio|folha|pagamento|holerite", "Pessoal", "Salário"),
    (r"pro\s*labore|prolabore|s[oó]cio", "Pessoal", "Pro Labore"),
    // "pag free" is claimed by the first rule, so a bare "free" here is a freelancer.
    (r"freelancer|aut[oô]nomo|prestador|\bfree\b", "Pessoal", "Freelancer"),
    (r"gorjeta|tip|gratifica[cç][aã]o", "Pessoal", "Gorjeta"),
    (r"venda\s*de\s*folga|folga\s*vendida", "Pessoal", "Venda de Folga"),
    (r"\bvt\b|vale\s*transporte", "Pessoal", "Vale Transporte"),
    (r"\bvr\b|vale\s*refei[cç][aã]o", "Pessoal", "Vale Refeição"),
    // Infraestrutura
    (r"aluguel|rent|loca[cç][aã]o", "Infraestrutura", "Aluguel"),
    (r"energia|luz|eletric|celesc|copel", "Infraestrutura", "Energia"),
    (r"seguro|seguradora|porto|mapfre", "Infraestrutura", "Seguros"),
    // Administrativo
    (r"imposto|taxa|darf|das|simples|icms|iss", "Administrativo", "Impostos"),
    (r"transporte|frete|uber|99|combustivel|gasolina", "Administrativo", "Transporte"),
    // Marketing e Eventos
    (r"evento|festa|show|confraterniza", "Marketing e Eventos", "Eventos"),
    (
        r"marketing|propaganda|anuncio|publicidade|instagram|facebook",
        "Marketing e Eventos",
        "Marketing",
    ),
];

fn rules() -> &'static [ClassificationRule] {
    static RULES: OnceLock<Vec<ClassificationRule>> = OnceLock::new();

    RULES.get_or_init(|| {
        RULE_TABLE
            .iter()
            .map(|&(pattern, category, subcategory)| ClassificationRule {
                pattern: RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .expect("invalid classification rule pattern"),
                classification: Classification {
                    category,
                    subcategory,
                },
            })
            .collect()
    })
}

/// Suggest a category for the receipt named `file_name`.
///
/// Returns the classification of the first rule that matches the lowercased
/// name, or `None` if the name is empty or no rule matches.
pub fn classify_filename(file_name: &str) -> Option<Classification> {
    if file_name.is_empty() {
        return None;
    }

    let file_name = file_name.to_lowercase();

    rules()
        .iter()
        .find(|rule| rule.pattern.is_match(&file_name))
        .map(|rule| rule.classification)
}
