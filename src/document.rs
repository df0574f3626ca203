// 🪪 Taxpayer documents - CPF (individuals) and CNPJ (companies)
//
// Both use weighted modulo-11 check digits:
// - CPF:  11 digits, weights 10..2 then 11..2
// - CNPJ: 14 digits, cyclic weights 5..2,9..2 then 6..2,9..2
//
// Producers store the canonical punctuated form, so "12345678909" and
// "123.456.789-09" are the same document.

use crate::error::{AgroError, AgroResult};

pub const CPF_LENGTH: usize = 11;
pub const CNPJ_LENGTH: usize = 14;

// ============================================================================
// DOCUMENT KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Cadastro de Pessoas Físicas (11 digits)
    Cpf,
    /// Cadastro Nacional da Pessoa Jurídica (14 digits)
    Cnpj,
}

impl DocumentKind {
    /// Detect the kind from a string of clean digits
    pub fn from_digits(digits: &str) -> Option<Self> {
        match digits.len() {
            CPF_LENGTH => Some(DocumentKind::Cpf),
            CNPJ_LENGTH => Some(DocumentKind::Cnpj),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Cpf => "CPF",
            DocumentKind::Cnpj => "CNPJ",
        }
    }
}

// ============================================================================
// CLEANING & FORMATTING
// ============================================================================

/// Strip every non-digit character
pub fn clean(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Render clean digits in canonical form.
///
/// 11 digits → `XXX.XXX.XXX-XX`, 14 digits → `XX.XXX.XXX/XXXX-XX`,
/// anything else is returned unchanged. Performs no validation.
pub fn format(digits: &str) -> String {
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return digits.to_string();
    }

    match digits.len() {
        CPF_LENGTH => format!(
            "{}.{}.{}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..11]
        ),
        CNPJ_LENGTH => format!(
            "{}.{}.{}/{}-{}",
            &digits[0..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..12],
            &digits[12..14]
        ),
        _ => digits.to_string(),
    }
}

// ============================================================================
// CHECKSUMS
// ============================================================================

fn to_digits(s: &str) -> Option<Vec<u32>> {
    s.chars().map(|c| c.to_digit(10)).collect()
}

fn all_identical(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

/// Weighted sum mod 11; remainder below 2 yields 0, otherwise 11 - remainder
fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

/// CNPJ weights for `len` digits: start at len - 7, count down, wrap to 9 below 2
fn cnpj_weights(len: usize) -> Vec<u32> {
    let mut weight = len as u32 - 7;
    let mut weights = Vec::with_capacity(len);
    for _ in 0..len {
        weights.push(weight);
        weight -= 1;
        if weight < 2 {
            weight = 9;
        }
    }
    weights
}

pub fn is_valid_cpf(digits: &str) -> bool {
    if digits.len() != CPF_LENGTH {
        return false;
    }
    let Some(d) = to_digits(digits) else {
        return false;
    };
    if all_identical(&d) {
        return false;
    }

    let first: Vec<u32> = (2..=10).rev().collect();
    let second: Vec<u32> = (2..=11).rev().collect();

    check_digit(&d[..9], &first) == d[9] && check_digit(&d[..10], &second) == d[10]
}

pub fn is_valid_cnpj(digits: &str) -> bool {
    if digits.len() != CNPJ_LENGTH {
        return false;
    }
    let Some(d) = to_digits(digits) else {
        return false;
    };
    if all_identical(&d) {
        return false;
    }

    check_digit(&d[..12], &cnpj_weights(12)) == d[12]
        && check_digit(&d[..13], &cnpj_weights(13)) == d[13]
}

/// Strip punctuation, then dispatch on length (11 → CPF, 14 → CNPJ)
pub fn is_valid_document(raw: &str) -> bool {
    let digits = clean(raw);
    match DocumentKind::from_digits(&digits) {
        Some(DocumentKind::Cpf) => is_valid_cpf(&digits),
        Some(DocumentKind::Cnpj) => is_valid_cnpj(&digits),
        None => false,
    }
}

/// Validate and canonicalize a raw document.
///
/// Wrong length and failed checksum both yield `InvalidDocument` carrying
/// the raw input.
pub fn normalize(raw: &str) -> AgroResult<String> {
    let digits = clean(raw);
    if DocumentKind::from_digits(&digits).is_none() {
        return Err(AgroError::InvalidDocument(raw.to_string()));
    }
    if !is_valid_document(&digits) {
        return Err(AgroError::InvalidDocument(raw.to_string()));
    }
    Ok(format(&digits))
}

// ============================================================================
// TESTS
// ============================================================================
