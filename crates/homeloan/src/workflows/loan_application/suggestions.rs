use serde::{Deserialize, Serialize};

use super::domain::OTHER_CHOICE;

const EMPLOYERS: &[&str] = &[
    "Tata Consultancy Services",
    "Infosys",
    "Wipro",
    "HCL Technologies",
    "Tech Mahindra",
    "Accenture",
    "Cognizant",
    "Capgemini",
    "Reliance Industries",
    "Larsen & Toubro",
    "HDFC Bank",
    "ICICI Bank",
    "State Bank of India",
    "Axis Bank",
    "Bharti Airtel",
    "Mahindra & Mahindra",
    OTHER_CHOICE,
];

const INDUSTRIES: &[&str] = &[
    "Information Technology",
    "Banking & Financial Services",
    "Healthcare",
    "Manufacturing",
    "Education",
    "Retail",
    "Telecommunications",
    "Construction & Real Estate",
    "Government",
    "Hospitality",
    "Pharmaceuticals",
    "Automobile",
    OTHER_CHOICE,
];

const DEVELOPERS: &[&str] = &[
    "Lodha Group",
    "Godrej Properties",
    "DLF Limited",
    "Prestige Group",
    "Sobha Limited",
    "Brigade Group",
    "Hiranandani Group",
    "Oberoi Realty",
    "Tata Housing",
    "Mahindra Lifespaces",
    "Puravankara",
    "Kolte-Patil Developers",
    OTHER_CHOICE,
];

/// Fields backed by a static suggestion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionField {
    Employer,
    Industry,
    Developer,
}

impl SuggestionField {
    pub const ALL: [SuggestionField; 3] = [
        SuggestionField::Employer,
        SuggestionField::Industry,
        SuggestionField::Developer,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "employer" | "company" => Some(Self::Employer),
            "industry" => Some(Self::Industry),
            "developer" => Some(Self::Developer),
            _ => None,
        }
    }

    pub fn index(self) -> SuggestionIndex {
        match self {
            SuggestionField::Employer => SuggestionIndex::new(EMPLOYERS),
            SuggestionField::Industry => SuggestionIndex::new(INDUSTRIES),
            SuggestionField::Developer => SuggestionIndex::new(DEVELOPERS),
        }
    }
}

/// Static autocomplete list; `"Other"` is always its last entry.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionIndex {
    entries: &'static [&'static str],
}

impl SuggestionIndex {
    const fn new(entries: &'static [&'static str]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [&'static str] {
        self.entries
    }

    pub fn all(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.to_string()).collect()
    }

    /// Case-insensitive substring filter; a blank query yields the full list.
    pub fn filter(&self, query: &str) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.all();
        }

        self.entries
            .iter()
            .filter(|entry| entry.to_lowercase().contains(&needle))
            .map(|entry| entry.to_string())
            .collect()
    }
}
