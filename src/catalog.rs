use std::collections::BTreeSet;

use crate::table::{AGE_COLUMN, ColumnKind, WorkingTable};

pub const CATEGORIES: [(&str, &str); 10] = [
    ("ADVANCED GOALKEEPING", "Advanced_Goalkeeping"),
    ("GOALKEEPING", "Goalkeeping"),
    ("DEFENSIVE ACTIONS", "Defensive_Actions"),
    ("GOAL AND SHOT CREATION", "Goal_and_Shot_Creation"),
    ("MISCELLANEOUS", "Miscellaneous_Stats"),
    ("PASSING", "Passing"),
    ("PASS TYPES", "Pass_Types"),
    ("PLAYING TIME", "Playing_Time"),
    ("POSSESSION", "Possession"),
    ("SHOOTING", "Shooting"),
];

/// Columns never offered for ranking: the derived age and the 90s-played denominator.
pub const DEFAULT_RANK_EXCLUDED: [&str; 2] = [AGE_COLUMN, "minutes_90s"];

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeInfo {
    pub column: String,
    pub label: String,
    /// Upper slider bound; the lower bound is always 0.
    pub max: f64,
}

impl AttributeInfo {
    pub fn slider_bounds(&self) -> (f64, f64) {
        (0.0, self.max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub name: &'static str,
    pub prefix: &'static str,
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeCatalog {
    categories: Vec<CategoryGroup>,
}

impl AttributeCatalog {
    pub fn build(table: &WorkingTable) -> Self {
        let mut seen: BTreeSet<usize> = BTreeSet::new();
        let categories = CATEGORIES
            .iter()
            .map(|&(name, prefix)| {
                let attributes = table
                    .columns()
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.kind == ColumnKind::Numeric && c.name.starts_with(prefix))
                    .filter(|(idx, _)| seen.insert(*idx))
                    .map(|(idx, c)| AttributeInfo {
                        column: c.name.clone(),
                        label: stat_label(&c.name, prefix),
                        max: table.column_max(idx).unwrap_or(0.0).max(0.0),
                    })
                    .collect();
                CategoryGroup {
                    name,
                    prefix,
                    attributes,
                }
            })
            .collect();
        Self { categories }
    }

    pub fn categories(&self) -> &[CategoryGroup] {
        &self.categories
    }

    pub fn attributes(&self) -> impl Iterator<Item = &AttributeInfo> {
        self.categories.iter().flat_map(|c| c.attributes.iter())
    }

    pub fn columns(&self) -> Vec<&str> {
        self.attributes().map(|a| a.column.as_str()).collect()
    }

    pub fn attribute(&self, column: &str) -> Option<&AttributeInfo> {
        self.attributes().find(|a| a.column == column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.attribute(column).is_some()
    }

    pub fn category_of(&self, column: &str) -> Option<&'static str> {
        self.categories
            .iter()
            .find(|c| c.attributes.iter().any(|a| a.column == column))
            .map(|c| c.name)
    }

    pub fn len(&self) -> usize {
        self.attributes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// "Shooting_goals_per_90" under "Shooting" becomes "Goals Per 90".
pub fn stat_label(column: &str, prefix: &str) -> String {
    let rest = column.strip_prefix(prefix).unwrap_or(column);
    let rest = rest.strip_prefix('_').unwrap_or(rest);
    title_case(&rest.replace('_', " "))
}

pub fn title_case(raw: &str) -> String {
    raw.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn rankable_attributes(table: &WorkingTable, excluded: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = table
        .columns()
        .iter()
        .filter(|c| c.kind == ColumnKind::Numeric)
        .filter(|c| !excluded.contains(&c.name.as_str()))
        .map(|c| c.name.clone())
        .collect();
    out.sort();
    out.dedup();
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetSection {
    pub category: &'static str,
    pub stats: Vec<(String, f64)>,
}

pub fn player_sheet(table: &WorkingTable, catalog: &AttributeCatalog, row: usize) -> Vec<SheetSection> {
    let Some(record) = table.row(row) else {
        return Vec::new();
    };
    catalog
        .categories()
        .iter()
        .filter_map(|group| {
            let stats: Vec<(String, f64)> = group
                .attributes
                .iter()
                .filter_map(|attr| {
                    let idx = table.column_index(&attr.column)?;
                    let v = record.value(idx).as_number()?;
                    (v > 0.0).then(|| (attr.label.clone(), v))
                })
                .collect();
            if stats.is_empty() {
                None
            } else {
                Some(SheetSection {
                    category: group.name,
                    stats,
                })
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub nationalities: Vec<String>,
    pub positions: Vec<String>,
    pub clubs: Vec<String>,
    pub age_bounds: Option<(u32, u32)>,
}

pub fn filter_options(table: &WorkingTable) -> FilterOptions {
    let mut nationalities = BTreeSet::new();
    let mut positions = BTreeSet::new();
    let mut clubs = BTreeSet::new();
    let mut age_bounds: Option<(u32, u32)> = None;

    for row in table.rows() {
        nationalities.extend(split_tokens(&row.nationality));
        positions.extend(split_tokens(&row.position));
        if !row.team.is_empty() {
            clubs.insert(row.team.clone());
        }
        age_bounds = Some(match age_bounds {
            Some((lo, hi)) => (lo.min(row.age), hi.max(row.age)),
            None => (row.age, row.age),
        });
    }

    FilterOptions {
        nationalities: nationalities.into_iter().collect(),
        positions: positions.into_iter().collect(),
        clubs: clubs.into_iter().collect(),
        age_bounds,
    }
}

pub fn split_tokens(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_strip_prefix_and_title_case() {
        assert_eq!(stat_label("Shooting_goals_per_90", "Shooting"), "Goals Per 90");
        assert_eq!(stat_label("Pass_Types_live_ball", "Pass_Types"), "Live Ball");
        assert_eq!(title_case("GOAL AND SHOT CREATION"), "Goal And Shot Creation");
    }

    #[test]
    fn tokens_are_trimmed_and_non_empty() {
        let tokens: Vec<String> = split_tokens(" Brazil, Italy ,,").collect();
        assert_eq!(tokens, vec!["Brazil".to_string(), "Italy".to_string()]);
    }
}
