//! One-shot table bootstrap: the sample draws and the report each backend
//! returns after seeding them.

use quina_core::BackendKind;

/// A draw inserted by the bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleDraw {
    pub draw_number: i64,
    pub date: &'static str,
    pub numbers: [i64; 5],
}

impl SampleDraw {
    /// Numbers as stored in the `numbers` text column: a compact JSON array.
    pub fn encoded_numbers(&self) -> String {
        serde_json::Value::from(&self.numbers[..]).to_string()
    }
}

pub const SAMPLE_DRAWS: [SampleDraw; 2] = [
    SampleDraw {
        draw_number: 6907,
        date: "19th December 2025",
        numbers: [23, 41, 46, 58, 66],
    },
    SampleDraw {
        draw_number: 6906,
        date: "18th December 2025",
        numbers: [5, 32, 51, 55, 56],
    },
];

/// Outcome of a bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub backend: BackendKind,
    pub table: String,
    /// Sample rows actually inserted; zero when they were already present.
    pub inserted: usize,
}

impl std::fmt::Display for BootstrapReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "table \"{}\" ready on {} ({} of {} sample draws inserted)",
            self.table,
            self.backend,
            self.inserted,
            SAMPLE_DRAWS.len()
        )
    }
}
