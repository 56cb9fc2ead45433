//! Suggested catalog vocabularies.
//!
//! Brand, style and type are free text on a product; these lists are what
//! the entry forms offer. Nothing rejects a value that is not listed.

/// Brands the shop carries.
pub const BRANDS: &[&str] = &[
    "Eudora",
    "O Boticário",
    "Jequiti",
    "Avon",
    "Mary Kay",
    "Natura",
    "Oui-Original-Unique-Individuel",
    "Pierre Alexander",
    "Tupperware",
    "Outra",
];

/// Shelf sections.
pub const STYLES: &[&str] = &[
    "Perfumaria",
    "Skincare",
    "Cabelo",
    "Corpo e Banho",
    "Make",
    "Masculinos",
    "Infantil",
    "Casa",
    "Solar",
    "Teen",
    "Kits e Presentes",
    "Lançamentos",
    "Outro",
];

/// Product kinds.
pub const TYPES: &[&str] = &[
    "Perfumaria masculina",
    "Perfumaria feminina",
    "Body splash",
    "Eau de parfum",
    "Desodorantes",
    "Anti-idade",
    "Protetor solar facial",
    "Shampoo",
    "Condicionador",
    "Finalizador",
    "Boca",
    "Olhos",
    "Unhas",
    "Hidratante",
    "Barba",
    "Óleo corporal",
    "Colônias",
    "Sabonete líquido",
    "Sabonete em barra",
    "Kits de perfumes",
    "Máscara",
    "Garrafas",
    "Outro",
];

/// Whether `value` is one of the suggested entries (case-insensitive).
pub fn is_suggested(list: &[&str], value: &str) -> bool {
    let value = value.trim().to_lowercase();
    list.iter().any(|entry| entry.to_lowercase() == value)
}
