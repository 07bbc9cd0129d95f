//! Line catalog.
//!
//! Static identity of the lines the planner routes on: names, colors, modes
//! and the routes each line runs. Loaded once at startup.

use std::collections::HashMap;

use crate::domain::{Line, LineId};

/// The set of lines available for routing.
///
/// Lines are kept sorted by id so graph building visits them in a stable
/// order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    lines: Vec<Line>,
    index: HashMap<LineId, usize>,
}

impl Catalog {
    /// Build a catalog. When several lines share an id the last one wins.
    pub fn new(lines: impl IntoIterator<Item = Line>) -> Self {
        let mut by_id: HashMap<LineId, Line> = HashMap::new();
        for line in lines {
            by_id.insert(line.id.clone(), line);
        }

        let mut lines: Vec<Line> = by_id.into_values().collect();
        lines.sort_by(|a, b| a.id.cmp(&b.id));

        let index = lines
            .iter()
            .enumerate()
            .map(|(i, line)| (line.id.clone(), i))
            .collect();

        Self { lines, index }
    }

    /// Look up a line by id.
    pub fn get(&self, id: &LineId) -> Option<&Line> {
        self.index.get(id).map(|&i| &self.lines[i])
    }

    /// All lines, sorted by id.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
