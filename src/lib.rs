//! Enumeration of regular-expression strings by closure.
//!
//! Starting from the symbols of an [`Alphabet`], the [`Enumerator`]
//! repeatedly applies concatenation, alternation and Kleene star to every
//! ordered pair of expressions found so far, collecting each newly rendered
//! string until either a size limit is hit or a whole round produces nothing
//! new.
//!
//! # Architecture
//!
//! ```text
//! Alphabet ──seed──> working set ──(x, y) pairs──> OperationRenderer ──> next set
//!                        ^                                                 │
//!                        └──────────────── next round ─────────────────────┘
//! ```
//!
//! Expressions are carried around purely as their rendered text.  Two strings
//! are the same expression exactly when they are equal, so `a+b` and `(a+b)`
//! are distinct members of the working set even though they denote the same
//! language.
//!
//! ## Bracketing
//!
//! Because no syntax tree is kept, [`OperationRenderer`] cannot know the
//! operator structure of its operands.  It uses the operand's length as a
//! stand-in: anything longer than two characters is treated as compound and
//! parenthesised when it becomes an alternation operand.  Under
//! [`BracketMode::Necessary`] a single clean-up pass
//! ([`strip_redundant_brackets`]) then removes the leftmost innermost pair of
//! parentheses again.  The output of this heuristic is what the enumerator
//! produces and is pinned by the golden tests at the bottom of this file; it
//! is not a minimal parenthesisation.
//!
//! For precedence-correct output, build an [`Expr`] tree instead and call
//! [`Expr::render`], which compares each child's operator against its
//! parent's.
//!
//! ## Termination
//!
//! Each round either grows the working set or ends the enumeration, and
//! growth stops as soon as `limit` strings are present.  With at least one
//! symbol the unbounded closure is infinite (concatenation always yields a
//! longer string), so in practice the limit is what ends a run.  Only the
//! empty alphabet reaches a fixpoint, immediately.

use std::borrow::Cow;
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use itertools::Itertools;

/// The symbol for the language containing only the empty string.
pub const EPSILON: char = '\u{03B5}';

/// The symbol for the empty language.
pub const EMPTY: char = '\u{2205}';

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// An error returned for invalid arguments or configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// [`Enumerator::enumerate`] was asked for zero expressions.
    ZeroLimit,
    /// An operator glyph contains a parenthesis, which would be confused
    /// with the brackets the renderer inserts itself.
    InvalidGlyph { operator: Operator, glyph: String },
    /// A bracket mode name that [`BracketMode::from_str`] does not know.
    UnknownBracketMode(String),
    /// A sort order name that [`SortOrder::from_str`] does not know.
    UnknownSortOrder(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLimit => write!(f, "limit must be at least 1"),
            Self::InvalidGlyph { operator, glyph } => {
                write!(f, "{} glyph {:?} must not contain parentheses", operator, glyph)
            }
            Self::UnknownBracketMode(name) => {
                write!(f, "unknown bracket mode {:?} (expected none, necessary or all)", name)
            }
            Self::UnknownSortOrder(name) => {
                write!(f, "unknown sort order {:?} (expected unsorted, asc or desc)", name)
            }
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Alphabet
// ---------------------------------------------------------------------------

/// An insertion-ordered set of single-character symbols.
///
/// The order in which symbols are added is the order in which they seed the
/// enumeration.  An alphabet created with `include_specials` starts with
/// [`EPSILON`] and [`EMPTY`] and refuses to remove them afterwards.
#[derive(Debug, Clone, Default)]
pub struct Alphabet {
    symbols: IndexSet<char>,
    protect_specials: bool,
}

impl Alphabet {
    pub fn new(include_specials: bool) -> Self {
        let mut symbols = IndexSet::new();
        if include_specials {
            symbols.insert(EPSILON);
            symbols.insert(EMPTY);
        }
        Self {
            symbols,
            protect_specials: include_specials,
        }
    }

    /// Shorthand for [`new`](Self::new) followed by
    /// [`add_symbols`](Self::add_symbols).
    pub fn with_symbols(include_specials: bool, symbols: impl IntoIterator<Item = char>) -> Self {
        let mut alphabet = Self::new(include_specials);
        alphabet.add_symbols(symbols);
        alphabet
    }

    /// Add symbols in order.  Symbols already present keep their original
    /// position.
    pub fn add_symbols(&mut self, symbols: impl IntoIterator<Item = char>) {
        self.symbols.extend(symbols);
    }

    /// Remove `symbol`, unless it is a protected special symbol.
    pub fn remove_symbol(&mut self, symbol: char) {
        if self.protect_specials && is_special(symbol) {
            return;
        }
        self.symbols.shift_remove(&symbol);
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    /// A snapshot of the symbols in insertion order.  Later changes to the
    /// alphabet are not reflected in the returned vector.
    pub fn symbols(&self) -> Vec<char> {
        self.symbols.iter().copied().collect()
    }

    /// Whether [`EPSILON`] and [`EMPTY`] were added at construction and are
    /// protected from removal.
    pub fn includes_specials(&self) -> bool {
        self.protect_specials
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}

fn is_special(symbol: char) -> bool {
    symbol == EPSILON || symbol == EMPTY
}

// ---------------------------------------------------------------------------
// Operation rendering
// ---------------------------------------------------------------------------

/// One of the three production rules of the closure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Concat,
    Alternation,
    Kleene,
}

impl Operator {
    /// The order in which operators are applied to each pair of a round.
    pub const ALL: [Operator; 3] = [Operator::Concat, Operator::Alternation, Operator::Kleene];
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Concat => "concatenation",
            Self::Alternation => "alternation",
            Self::Kleene => "Kleene star",
        })
    }
}

/// How aggressively the renderer inserts parentheses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BracketMode {
    /// Only the brackets the operators themselves need.
    #[default]
    None,
    /// Skip the wrap around star operands and run
    /// [`strip_redundant_brackets`] over every alternation.
    Necessary,
    /// Wrap the result of every operation in one more pair of parentheses.
    All,
}

impl FromStr for BracketMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "necessary" | "minimal" => Ok(Self::Necessary),
            "all" => Ok(Self::All),
            _ => Err(Error::UnknownBracketMode(s.to_owned())),
        }
    }
}

/// Glyphs and bracket policy for an [`OperationRenderer`].
///
/// Override single fields with struct update syntax:
///
/// ```
/// use regex_enumerator::{BracketMode, RendererConfig};
///
/// let config = RendererConfig {
///     brackets: BracketMode::All,
///     ..Default::default()
/// };
/// assert_eq!(config.concat, "·");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RendererConfig {
    pub concat: String,
    pub alternation: String,
    pub kleene: String,
    pub brackets: BracketMode,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            concat: "·".to_owned(),
            alternation: "+".to_owned(),
            kleene: "*".to_owned(),
            brackets: BracketMode::None,
        }
    }
}

/// Renders operator applications on textual sub-expressions.
#[derive(Clone, Debug, Default)]
pub struct OperationRenderer {
    config: RendererConfig,
}

impl OperationRenderer {
    /// Create a renderer, rejecting glyphs that contain `(` or `)`.
    pub fn new(config: RendererConfig) -> Result<Self, Error> {
        let glyphs = [
            (Operator::Concat, &config.concat),
            (Operator::Alternation, &config.alternation),
            (Operator::Kleene, &config.kleene),
        ];
        for (operator, glyph) in glyphs {
            if glyph.contains(['(', ')']) {
                return Err(Error::InvalidGlyph {
                    operator,
                    glyph: glyph.clone(),
                });
            }
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// `a·b`.  Operands are never wrapped individually.
    pub fn concat(&self, a: &str, b: &str) -> String {
        self.wrap_all(format!("{}{}{}", a, self.config.concat, b))
    }

    /// `a+b`, wrapping each operand longer than two characters.
    pub fn alternation(&self, a: &str, b: &str) -> String {
        let result = self.wrap_all(format!(
            "{}{}{}",
            wrap_compound(a),
            self.config.alternation,
            wrap_compound(b)
        ));
        if self.config.brackets == BracketMode::Necessary {
            strip_redundant_brackets(&result)
        } else {
            result
        }
    }

    /// `(a)*`, or `a*` under [`BracketMode::Necessary`].
    pub fn kleene(&self, a: &str) -> String {
        let result = match self.config.brackets {
            BracketMode::Necessary => format!("{}{}", a, self.config.kleene),
            BracketMode::None | BracketMode::All => format!("({}){}", a, self.config.kleene),
        };
        self.wrap_all(result)
    }

    /// Apply `operator` to `a` and `b`.  [`Operator::Kleene`] ignores `b`.
    pub fn apply(&self, operator: Operator, a: &str, b: &str) -> String {
        match operator {
            Operator::Concat => self.concat(a, b),
            Operator::Alternation => self.alternation(a, b),
            Operator::Kleene => self.kleene(a),
        }
    }

    fn wrap_all(&self, result: String) -> String {
        if self.config.brackets == BracketMode::All {
            format!("({})", result)
        } else {
            result
        }
    }
}

/// Length is counted in `char`s: `ε·ε` is three characters long.
fn wrap_compound(operand: &str) -> Cow<'_, str> {
    if operand.chars().count() > 2 {
        Cow::Owned(format!("({})", operand))
    } else {
        Cow::Borrowed(operand)
    }
}

/// Remove the leftmost pair of parentheses that encloses a non-empty span
/// without parentheses of its own.
///
/// This is a purely textual pass and removes at most one pair per call:
///
/// ```
/// use regex_enumerator::strip_redundant_brackets;
///
/// assert_eq!(strip_redundant_brackets("(a·b)+(c·d)"), "a·b+(c·d)");
/// assert_eq!(strip_redundant_brackets("((a))"), "(a)");
/// assert_eq!(strip_redundant_brackets("a+b"), "a+b");
/// ```
pub fn strip_redundant_brackets(s: &str) -> String {
    let mut open = None;
    for (idx, c) in s.char_indices() {
        match c {
            '(' => open = Some(idx),
            ')' => {
                if let Some(start) = open.filter(|&start| idx > start + 1) {
                    return format!("{}{}{}", &s[..start], &s[start + 1..idx], &s[idx + 1..]);
                }
                open = None;
            }
            _ => {}
        }
    }
    s.to_owned()
}

// ---------------------------------------------------------------------------
// Enumerator
// ---------------------------------------------------------------------------

/// Ordering applied to the result of [`Enumerator::enumerate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Discovery order.  Reproducible, but carries no meaning.
    #[default]
    Unsorted,
    /// Shortest first, equal lengths in lexicographic order.
    AscendingLength,
    /// Longest first, equal lengths in lexicographic order.
    DescendingLength,
}

impl SortOrder {
    pub fn sort(self, exprs: &mut [String]) {
        match self {
            Self::Unsorted => {}
            Self::AscendingLength => exprs.sort_by_cached_key(|e| (e.chars().count(), e.clone())),
            Self::DescendingLength => {
                exprs.sort_by_cached_key(|e| (Reverse(e.chars().count()), e.clone()))
            }
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unsorted" | "none" => Ok(Self::Unsorted),
            "asc" | "ascending" => Ok(Self::AscendingLength),
            "desc" | "descending" => Ok(Self::DescendingLength),
            _ => Err(Error::UnknownSortOrder(s.to_owned())),
        }
    }
}

/// Closes an alphabet under concatenation, alternation and Kleene star.
///
/// The alphabet is borrowed for the lifetime of the enumerator and each
/// [`enumerate`](Self::enumerate) call works on its own working set, so one
/// enumerator can be used any number of times.
#[derive(Debug)]
pub struct Enumerator<'a> {
    alphabet: &'a Alphabet,
    renderer: OperationRenderer,
}

impl<'a> Enumerator<'a> {
    pub fn new(alphabet: &'a Alphabet, renderer: OperationRenderer) -> Self {
        Self { alphabet, renderer }
    }

    pub fn renderer(&self) -> &OperationRenderer {
        &self.renderer
    }

    /// The strings every enumeration starts from: [`EPSILON`] and [`EMPTY`]
    /// if the alphabet contains them, then every symbol in alphabet order.
    pub fn seed(&self) -> Vec<String> {
        self.seed_set(usize::MAX).into_iter().collect()
    }

    /// Produce at most `limit` distinct expression strings.
    ///
    /// Rounds run until `limit` strings have been found or a round adds
    /// nothing.  Within a round every ordered pair `(x, y)` of the previous
    /// round's strings yields `x·y`, `x+y` and `x*`, in that order, and the
    /// round stops at the first insertion that reaches `limit`.
    ///
    /// Returns [`Error::ZeroLimit`] if `limit` is zero.
    pub fn enumerate(&self, limit: usize, order: SortOrder) -> Result<Vec<String>, Error> {
        if limit == 0 {
            return Err(Error::ZeroLimit);
        }

        let mut regexes = self.seed_set(limit);
        while regexes.len() < limit {
            let mut next = regexes.clone();
            let reached = self.extend_round(&regexes, &mut next, limit);
            if !reached && next.len() == regexes.len() {
                break;
            }
            regexes = next;
        }

        let mut result: Vec<String> = regexes.into_iter().collect();
        order.sort(&mut result);
        Ok(result)
    }

    fn seed_set(&self, limit: usize) -> IndexSet<String> {
        let specials = [EPSILON, EMPTY]
            .into_iter()
            .filter(|&symbol| self.alphabet.contains(symbol));
        let mut seed = IndexSet::new();
        for symbol in specials.chain(self.alphabet.iter()) {
            if seed.len() >= limit {
                break;
            }
            seed.insert(symbol.to_string());
        }
        seed
    }

    /// Apply every operator to every ordered pair of `current`, adding the
    /// results to `next`.  Returns `true` as soon as `next` holds `limit`
    /// strings.
    fn extend_round(&self, current: &IndexSet<String>, next: &mut IndexSet<String>, limit: usize) -> bool {
        for (x, y) in current.iter().cartesian_product(current.iter()) {
            for operator in Operator::ALL {
                next.insert(self.renderer.apply(operator, x, y));
                if next.len() >= limit {
                    return true;
                }
            }
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Expression tree
// ---------------------------------------------------------------------------

/// A regular expression as a syntax tree.
///
/// Unlike the strings produced by [`OperationRenderer`], a tree knows its
/// own structure, so [`render`](Self::render) can decide on parentheses by
/// operator precedence: star binds tightest, then concatenation, then
/// alternation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    Symbol(char),
    Concat(Box<Expr>, Box<Expr>),
    Alternation(Box<Expr>, Box<Expr>),
    Star(Box<Expr>),
}

impl Expr {
    pub fn symbol(symbol: char) -> Self {
        Self::Symbol(symbol)
    }

    pub fn concat(left: Expr, right: Expr) -> Self {
        Self::Concat(Box::new(left), Box::new(right))
    }

    pub fn alternation(left: Expr, right: Expr) -> Self {
        Self::Alternation(Box::new(left), Box::new(right))
    }

    pub fn star(operand: Expr) -> Self {
        Self::Star(Box::new(operand))
    }

    const ATOM: u8 = 4;

    fn precedence(&self) -> u8 {
        match self {
            Self::Alternation(..) => 1,
            Self::Concat(..) => 2,
            Self::Star(_) => 3,
            Self::Symbol(_) => Self::ATOM,
        }
    }

    /// Render with the fewest parentheses that keep the tree's meaning.
    ///
    /// Concatenation and alternation are associative, so a child with the
    /// same operator as its parent is printed bare.  Only
    /// [`RendererConfig`]'s glyphs are used; its bracket mode is ignored.
    pub fn render(&self, config: &RendererConfig) -> String {
        let mut out = String::new();
        self.write_minimal(config, &mut out);
        out
    }

    /// Render with every compound sub-expression parenthesised.
    pub fn render_full(&self, config: &RendererConfig) -> String {
        let mut out = String::new();
        self.write_full(config, &mut out);
        out
    }

    fn write_minimal(&self, config: &RendererConfig, out: &mut String) {
        match self {
            Self::Symbol(symbol) => out.push(*symbol),
            Self::Concat(left, right) => {
                left.write_operand(self.precedence(), config, out);
                out.push_str(&config.concat);
                right.write_operand(self.precedence(), config, out);
            }
            Self::Alternation(left, right) => {
                left.write_operand(self.precedence(), config, out);
                out.push_str(&config.alternation);
                right.write_operand(self.precedence(), config, out);
            }
            Self::Star(operand) => {
                // `a**` is not accepted by every regex dialect.
                operand.write_operand(Self::ATOM, config, out);
                out.push_str(&config.kleene);
            }
        }
    }

    fn write_operand(&self, parent: u8, config: &RendererConfig, out: &mut String) {
        if self.precedence() < parent {
            out.push('(');
            self.write_minimal(config, out);
            out.push(')');
        } else {
            self.write_minimal(config, out);
        }
    }

    fn write_full(&self, config: &RendererConfig, out: &mut String) {
        match self {
            Self::Symbol(symbol) => out.push(*symbol),
            Self::Concat(left, right) => {
                left.write_full_operand(config, out);
                out.push_str(&config.concat);
                right.write_full_operand(config, out);
            }
            Self::Alternation(left, right) => {
                left.write_full_operand(config, out);
                out.push_str(&config.alternation);
                right.write_full_operand(config, out);
            }
            Self::Star(operand) => {
                operand.write_full_operand(config, out);
                out.push_str(&config.kleene);
            }
        }
    }

    fn write_full_operand(&self, config: &RendererConfig, out: &mut String) {
        if let Self::Symbol(symbol) = self {
            out.push(*symbol);
        } else {
            out.push('(');
            self.write_full(config, out);
            out.push(')');
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&RendererConfig::default()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
