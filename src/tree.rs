//! A record of the game tree explored by a search

use std::fmt;

/// Who is to move at a recorded node
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Mover {
    /// The AI is to move
    Maximizer,
    /// The human is to move
    Minimizer,
    /// A move has been chosen but its drift has not been resolved yet
    Chance,
}

/// One explored game state
///
/// Nodes own their children, so a whole search is owned top-down by its
/// root. Children are kept in the order they were expanded.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchNode {
    pub mover: Mover,
    /// The column that led here from the parent (`None` at the root)
    pub column: Option<usize>,
    /// Distance from the root in tree levels
    pub depth: usize,
    /// The backed-up value, once resolved
    pub score: Option<f64>,
    /// Weight of this outcome under its chance parent
    pub probability: Option<f64>,
    pub is_best_child: bool,
    pub children: Vec<SearchNode>,
}

impl SearchNode {
    pub fn root(mover: Mover) -> Self {
        Self {
            mover,
            column: None,
            depth: 0,
            score: None,
            probability: None,
            is_best_child: false,
            children: Vec::new(),
        }
    }

    /// Appends a new child and returns it for the search to fill in
    pub fn add_child(
        &mut self,
        column: usize,
        mover: Mover,
        probability: Option<f64>,
    ) -> &mut SearchNode {
        self.children.push(SearchNode {
            mover,
            column: Some(column),
            depth: self.depth + 1,
            score: None,
            probability,
            is_best_child: false,
            children: Vec::new(),
        });
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Flags the child at `index` as the move this node selected
    pub fn mark_best(&mut self, index: usize) {
        debug_assert!(
            self.children.iter().all(|child| !child.is_best_child),
            "a node may select only one best child"
        );
        self.children[index].is_best_child = true;
    }

    pub fn best_child(&self) -> Option<&SearchNode> {
        self.children.iter().find(|child| child.is_best_child)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including this one
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(SearchNode::size).sum::<usize>()
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(SearchNode::leaf_count).sum()
        }
    }

    /// Length of the longest path below this node
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    fn label(&self) -> &'static str {
        match (self.mover, self.probability) {
            (Mover::Chance, _) => "CHANCE",
            (Mover::Maximizer, None) => "MAX",
            (Mover::Minimizer, None) => "MIN",
            (Mover::Maximizer, Some(_)) => "OUTCOME MAX",
            (Mover::Minimizer, Some(_)) => "OUTCOME MIN",
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, indent: &str, last: bool) -> fmt::Result {
        let connector = if last { "+-- " } else { "|-- " };
        write!(f, "{}{}{}", indent, connector, self.label())?;
        match self.column {
            Some(column) => write!(f, " move={}", column + 1)?,
            None => write!(f, " move=-")?,
        }
        match self.score {
            Some(score) => write!(f, " score={}", score)?,
            None => write!(f, " score=?")?,
        }
        write!(f, " depth={}", self.depth)?;
        if let Some(probability) = self.probability {
            write!(f, " p={}", probability)?;
        }
        if self.is_best_child {
            write!(f, " **")?;
        }
        writeln!(f)?;

        let indent = format!("{}{}", indent, if last { "    " } else { "|   " });
        for (i, child) in self.children.iter().enumerate() {
            child.write_tree(f, &indent, i + 1 == self.children.len())?;
        }
        Ok(())
    }
}

impl fmt::Display for SearchNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, "", true)
    }
}
