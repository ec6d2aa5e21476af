use serde::Serialize;

/// Output column headers, in sink order.
pub const OUTPUT_HEADERS: [&str; 10] = [
    "姓名", "门店", "匠龄", "匠人独白", "标题1", "描述1", "标题2", "描述2", "标题3", "描述3",
];

/// One cleaned row. Constructed fresh per input row and immutable once
/// returned; titles and descriptions are always exactly three slots, padded
/// with empty strings, and position i pairs title i with description i.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Record {
    pub name: String,
    pub store: String,
    pub experience: String,
    pub monologue: String,
    pub titles: [String; 3],
    pub descriptions: [String; 3],
}

impl Record {
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn skill_count(&self) -> usize {
        self.titles
            .iter()
            .zip(&self.descriptions)
            .filter(|(t, d)| !t.is_empty() || !d.is_empty())
            .count()
    }

    /// Fields an operator would expect on a complete card but that came out
    /// empty; the driver warns off this list.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("姓名");
        }
        if self.store.is_empty() {
            missing.push("门店");
        }
        if self.experience.is_empty() {
            missing.push("匠龄");
        }
        if self.monologue.is_empty() {
            missing.push("匠人独白");
        }
        if self.skill_count() == 0 {
            missing.push("标题/描述");
        }
        missing
    }

    /// Cells in `OUTPUT_HEADERS` order, for the CSV sink.
    pub fn to_row(&self) -> [&str; 10] {
        [
            &self.name,
            &self.store,
            &self.experience,
            &self.monologue,
            &self.titles[0],
            &self.descriptions[0],
            &self.titles[1],
            &self.descriptions[1],
            &self.titles[2],
            &self.descriptions[2],
        ]
    }
}

// ── Tests ──
