use crate::error::{YagaError, YagaResult};
use crate::grammar::{Grammar, ProductionId};
use crate::symbol::Symbol;

/// A parse-tree node. Always in exactly one of three states:
///
/// 1. a terminal leaf;
/// 2. an undeveloped nonterminal: the nonterminal is fixed but the
///    production it will embody is not yet chosen;
/// 3. a developed nonterminal bound to a production, whose children read
///    left to right spell that production's right-hand side.
///
/// Each variant carries exactly the data its state allows, so the invalid
/// combinations (a leaf with children, a developed node without a
/// production) cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Terminal(Symbol),
    Undeveloped(Symbol),
    Developed {
        symbol: Symbol,
        production: ProductionId,
        children: Vec<Node>,
    },
}

impl Node {
    /// A fresh leaf for `symbol`: undeveloped if the grammar can rewrite
    /// it, a terminal leaf otherwise.
    fn leaf(grammar: &Grammar, symbol: Symbol) -> Self {
        if grammar.is_nonterminal(&symbol) {
            Node::Undeveloped(symbol)
        } else {
            Node::Terminal(symbol)
        }
    }

    pub fn symbol(&self) -> &Symbol {
        match self {
            Node::Terminal(symbol) | Node::Undeveloped(symbol) => symbol,
            Node::Developed { symbol, .. } => symbol,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Developed { children, .. } => children,
            _ => &[],
        }
    }

    pub fn production(&self) -> Option<ProductionId> {
        match self {
            Node::Developed { production, .. } => Some(*production),
            _ => None,
        }
    }

    pub fn is_undeveloped(&self) -> bool {
        matches!(self, Node::Undeveloped(_))
    }

    /// Leaves are terminal leaves and undeveloped nonterminals alike.
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    fn leftmost_undeveloped(&self) -> Option<&Node> {
        if self.is_undeveloped() {
            return Some(self);
        }
        self.children()
            .iter()
            .find_map(Node::leftmost_undeveloped)
    }

    fn leftmost_undeveloped_mut(&mut self) -> Option<&mut Node> {
        if self.is_undeveloped() {
            return Some(self);
        }
        match self {
            Node::Developed { children, .. } => {
                children.iter_mut().find_map(Node::leftmost_undeveloped_mut)
            }
            _ => None,
        }
    }

    fn fmt_at_depth(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.symbol(), indent = 2 * depth)?;
        for child in self.children() {
            child.fmt_at_depth(f, depth + 1)?;
        }
        Ok(())
    }
}

/// A parse tree over a fixed grammar: the pair (grammar, root node).
///
/// Trees are immutable from the outside. Every transformation clones the
/// tree and mutates the clone, so in-flight developments never observe one
/// another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree<'g> {
    grammar: &'g Grammar,
    root: Node,
}

impl<'g> ParseTree<'g> {
    /// A single-node tree for the grammar's start symbol.
    pub fn new(grammar: &'g Grammar) -> YagaResult<Self> {
        let start = grammar.start_symbol()?.clone();
        Ok(Self {
            grammar,
            root: Node::leaf(grammar, start),
        })
    }

    pub fn from_root(grammar: &'g Grammar, root: Node) -> Self {
        Self { grammar, root }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Lazy pre-order traversal: root first, then children left to right.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            stack: vec![&self.root],
        }
    }

    pub fn has_undeveloped(&self) -> bool {
        self.root.leftmost_undeveloped().is_some()
    }

    /// The symbol of the leftmost undeveloped node in pre-order, if any.
    pub fn undeveloped_symbol(&self) -> Option<&Symbol> {
        self.root.leftmost_undeveloped().map(Node::symbol)
    }

    pub fn size(&self) -> usize {
        self.preorder().count()
    }

    pub fn leaf_count(&self) -> usize {
        self.preorder().filter(|n| n.is_leaf()).count()
    }

    pub fn is_fully_developed(&self) -> bool {
        !self.has_undeveloped()
    }

    /// The yield: leaf symbols, left to right.
    pub fn leaves(&self) -> impl Iterator<Item = &Symbol> {
        self.preorder().filter(|n| n.is_leaf()).map(Node::symbol)
    }

    /// A new tree in which the leftmost undeveloped node is developed by
    /// production `index`. `self` is untouched; the clone's target node
    /// gains one child per right-hand-side symbol, each a terminal leaf or
    /// a fresh undeveloped nonterminal as the grammar dictates.
    pub fn apply_production(&self, index: ProductionId) -> YagaResult<ParseTree<'g>> {
        let production = self.grammar.get(index)?;

        let mut developed = self.clone();
        let target = developed
            .root
            .leftmost_undeveloped_mut()
            .ok_or(YagaError::NothingToDevelop)?;
        if target.symbol() != &production.lhs {
            return Err(YagaError::HeadMismatch {
                head: production.lhs.clone(),
                undeveloped: target.symbol().clone(),
            });
        }

        *target = Node::Developed {
            symbol: production.lhs.clone(),
            production: index,
            children: production
                .rhs
                .iter()
                .map(|sym| Node::leaf(self.grammar, sym.clone()))
                .collect(),
        };
        Ok(developed)
    }

    /// One tree per production of the leftmost undeveloped symbol, in
    /// grammar order. Empty when the tree is fully developed.
    pub fn develop_first(&self) -> YagaResult<Vec<ParseTree<'g>>> {
        let Some(symbol) = self.undeveloped_symbol() else {
            return Ok(Vec::new());
        };
        let indices: Vec<ProductionId> =
            self.grammar.iter_by_lhs(symbol).map(|(id, _)| id).collect();
        indices
            .into_iter()
            .map(|id| self.apply_production(id))
            .collect()
    }

    /// Every developed node's children spell the right-hand side of its
    /// bound production.
    pub fn verify_children(&self) -> bool {
        self.preorder().all(|node| match node {
            Node::Developed {
                production,
                children,
                ..
            } => self.grammar.get(*production).is_ok_and(|p| {
                children.len() == p.rhs.len()
                    && children.iter().zip(&p.rhs).all(|(c, sym)| c.symbol() == sym)
            }),
            _ => true,
        })
    }

    /// Read the indented textual form back into a tree.
    ///
    /// One node per line, `2·depth` leading spaces, the node's symbol as
    /// the next whitespace-delimited token. Internal nodes are bound to the
    /// production their children spell; leaves become terminal leaves or
    /// undeveloped nonterminals by the grammar's classification.
    pub fn read(grammar: &'g Grammar, text: &str) -> YagaResult<ParseTree<'g>> {
        let mut entries = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let indent = line.len() - line.trim_start_matches(' ').len();
            let number = index + 1;
            if indent % 2 != 0 {
                return Err(YagaError::RaggedIndent { line: number });
            }
            let symbol = line
                .split_whitespace()
                .next()
                .map(Symbol::from)
                .ok_or(YagaError::RaggedIndent { line: number })?;
            entries.push(Entry {
                line: number,
                depth: indent / 2,
                symbol,
            });
        }

        if entries.is_empty() {
            return Err(YagaError::EmptyTree);
        }
        if entries[0].depth != 0 {
            return Err(YagaError::OrphanNode {
                line: entries[0].line,
            });
        }

        let mut pos = 0;
        let root = read_node(&entries, &mut pos, 0)?;
        if pos < entries.len() {
            return Err(YagaError::ForestInput {
                line: entries[pos].line,
            });
        }
        Ok(Self {
            grammar,
            root: bind(grammar, root)?,
        })
    }
}

impl std::fmt::Display for ParseTree<'_> {
    /// The indented form: one symbol per line, two spaces per depth level.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.root.fmt_at_depth(f, 0)
    }
}

pub struct Preorder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

struct Entry {
    line: usize,
    depth: usize,
    symbol: Symbol,
}

struct RawNode {
    symbol: Symbol,
    children: Vec<RawNode>,
}

fn read_node(entries: &[Entry], pos: &mut usize, depth: usize) -> YagaResult<RawNode> {
    let symbol = entries[*pos].symbol.clone();
    *pos += 1;

    let mut children = Vec::new();
    while let Some(next) = entries.get(*pos) {
        if next.depth <= depth {
            break;
        }
        if next.depth > depth + 1 {
            return Err(YagaError::OrphanNode { line: next.line });
        }
        children.push(read_node(entries, pos, depth + 1)?);
    }
    Ok(RawNode { symbol, children })
}

fn bind(grammar: &Grammar, raw: RawNode) -> YagaResult<Node> {
    if raw.children.is_empty() {
        return Ok(Node::leaf(grammar, raw.symbol));
    }

    let spelled = crate::grammar::Production::new(
        raw.symbol.clone(),
        raw.children.iter().map(|c| c.symbol.clone()).collect(),
    );
    let production = grammar
        .index_of(&spelled)
        .ok_or(YagaError::UnknownProduction {
            symbol: raw.symbol.clone(),
        })?;

    Ok(Node::Developed {
        symbol: raw.symbol,
        production,
        children: raw
            .children
            .into_iter()
            .map(|child| bind(grammar, child))
            .collect::<YagaResult<Vec<Node>>>()?,
    })
}

/// The cap-bounded derivation enumerator.
///
/// A worklist of in-progress trees, seeded with the start tree: pop, drop
/// anything whose leaf count exceeds the cap, emit fully developed trees,
/// and push every one-step development of the rest. Termination is up to
/// the grammar/cap combination; the iterator itself is lazy.
pub struct Derivations<'g> {
    stack: Vec<ParseTree<'g>>,
    cap: usize,
}

impl<'g> Derivations<'g> {
    pub fn new(grammar: &'g Grammar, cap: usize) -> YagaResult<Self> {
        Ok(Self {
            stack: vec![ParseTree::new(grammar)?],
            cap,
        })
    }
}

impl<'g> Iterator for Derivations<'g> {
    type Item = YagaResult<ParseTree<'g>>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(tree) = self.stack.pop() {
            if tree.leaf_count() > self.cap {
                continue;
            }
            if tree.is_fully_developed() {
                return Some(Ok(tree));
            }
            match tree.develop_first() {
                Ok(developed) => self.stack.extend(developed),
                Err(err) => {
                    self.stack.clear();
                    return Some(Err(err));
                }
            }
        }
        None
    }
}
