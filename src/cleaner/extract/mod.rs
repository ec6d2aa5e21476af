pub mod experience;
pub mod monologue;
pub mod name;
pub mod skills;

use super::sections::Segments;
use crate::cleaner::normalize::normalize;
use crate::cleaner::RowInput;
use crate::record::Record;

/// Assemble the record from the segmented blob. Column-sourced values take
/// precedence where the field has a dedicated column; every non-empty output
/// field goes through the normalizer.
pub fn extract_all(row: &RowInput, segments: &Segments, raw: &str) -> Record {
    let name = name::resolve(row.name.as_deref(), &segments.technician);
    let store = row
        .store
        .as_deref()
        .map(normalize)
        .unwrap_or_default();
    let experience = experience::resolve(&segments.technician, raw, row.experience.as_deref());
    let monologue = monologue::resolve(segments.monologue.as_deref(), raw);
    let (titles, descriptions) = skills::resolve(&segments.skills);

    Record {
        name,
        store,
        experience,
        monologue,
        titles,
        descriptions,
    }
}
