// Shared test fixtures built from the bundled sample taxonomy.

use super::{Catalog, Domain};

const SAMPLE_TAXONOMY: &str = include_str!("../../data/taxonomy.yaml");

pub fn catalog() -> Catalog {
    Catalog::from_yaml_str(SAMPLE_TAXONOMY).expect("bundled taxonomy must be valid")
}

pub fn technology() -> Domain {
    catalog()
        .domain("technology-computer-science")
        .cloned()
        .expect("bundled taxonomy has a technology domain")
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}
