use serde::{Deserialize, Serialize};

/// A board property the evaluator measures.
///
/// Serialized in lowercase (`"height"`, `"holes"`, ...), which is also the
/// key format of [`Weights`](crate::weights::Weights) in JSON.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum Heuristic {
    /// Sum of all column heights.
    #[display("height")]
    Height,
    /// Empty cells below the top cell of their column.
    #[display("holes")]
    Holes,
    /// Sum of height differences between adjacent columns.
    #[display("bumpiness")]
    Bumpiness,
    /// Columns at least [`WELL_DEPTH`] lower than both neighbours.
    #[display("wells")]
    Wells,
    /// Completed rows, counted before they are cleared.
    #[display("lines")]
    Lines,
}

/// Minimum depth for a column to count as a well.
pub const WELL_DEPTH: u8 = 4;

impl Heuristic {
    pub const LEN: usize = 5;

    pub const ALL: [Self; Self::LEN] = [
        Self::Height,
        Self::Holes,
        Self::Bumpiness,
        Self::Wells,
        Self::Lines,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        let names: Vec<String> = Heuristic::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["height", "holes", "bumpiness", "wells", "lines"]);
        for heuristic in Heuristic::ALL {
            let json = serde_json::to_string(&heuristic).unwrap();
            assert_eq!(json, format!("\"{heuristic}\""));
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Holes".parse::<Heuristic>().ok(), Some(Heuristic::Holes));
        assert!("depth".parse::<Heuristic>().is_err());
    }
}
