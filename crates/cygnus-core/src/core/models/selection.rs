//! Atom selection language.
//!
//! Selector strings follow the MDAnalysis/VMD conventions used in analysis scripts:
//!
//! - `all`: every atom
//! - `name OE1 OE2`: atom name is any of the listed values
//! - `resname GLU ASP`: residue name is any of the listed values
//! - `resid 10 12:15 20-22`: residue numbers, single values or inclusive ranges
//! - `index 0 5:9`: zero-based atom indices
//! - `bynum 1 6:10`: one-based atom serials
//! - `protein`: atoms of standard amino-acid residues
//! - `backbone`: `N`, `CA`, `C`, `O` of protein residues
//!
//! Terms combine with `and`, `or`, `not` and parentheses (`not` binds tightest, then
//! `and`, then `or`). Keywords are case-insensitive; values match exactly.

use super::atom::Atom;
use super::frame::Frame;
use super::topology::Topology;
use nalgebra::Point3;
use phf::{Set, phf_set};
use thiserror::Error;

static PROTEIN_RESIDUES: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    "HSD", "HSE", "HSP", "HID", "HIE", "HIP", "CYX", "ASH", "GLH", "LYN",
};

static BACKBONE_ATOMS: Set<&'static str> = phf_set! { "N", "CA", "C", "O" };

const KEYWORDS: &[&str] = &[
    "and", "or", "not", "all", "name", "resname", "resid", "index", "bynum", "protein",
    "backbone",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid selection '{expression}': {reason}")]
    Syntax { expression: String, reason: String },
    #[error("Selection '{0}' matched no atoms")]
    Empty(String),
}

/// An inclusive integer range used by `resid`, `index` and `bynum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: i64,
    end: i64,
}

impl Span {
    fn contains(&self, value: i64) -> bool {
        value >= self.start && value <= self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Selector {
    All,
    Name(Vec<String>),
    ResName(Vec<String>),
    ResId(Vec<Span>),
    Index(Vec<Span>),
    ByNum(Vec<Span>),
    Protein,
    Backbone,
    Not(Box<Selector>),
    And(Box<Selector>, Box<Selector>),
    Or(Box<Selector>, Box<Selector>),
}

impl Selector {
    fn matches(&self, atom: &Atom) -> bool {
        match self {
            Self::All => true,
            Self::Name(names) => names.iter().any(|n| n == &atom.name),
            Self::ResName(names) => names.iter().any(|n| n == &atom.resname),
            Self::ResId(spans) => spans.iter().any(|s| s.contains(atom.resid as i64)),
            Self::Index(spans) => spans.iter().any(|s| s.contains(atom.index as i64)),
            Self::ByNum(spans) => spans.iter().any(|s| s.contains(atom.serial() as i64)),
            Self::Protein => PROTEIN_RESIDUES.contains(atom.resname.as_str()),
            Self::Backbone => {
                PROTEIN_RESIDUES.contains(atom.resname.as_str())
                    && BACKBONE_ATOMS.contains(atom.name.as_str())
            }
            Self::Not(inner) => !inner.matches(atom),
            Self::And(l, r) => l.matches(atom) && r.matches(atom),
            Self::Or(l, r) => l.matches(atom) || r.matches(atom),
        }
    }
}

/// A parsed selector string, ready to be resolved against any topology.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    expression: String,
    root: Selector,
}

impl Selection {
    /// Parses a selector string.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Syntax`] if the expression is malformed.
    pub fn parse(expression: &str) -> Result<Self, SelectionError> {
        let syntax = |reason: String| SelectionError::Syntax {
            expression: expression.to_string(),
            reason,
        };
        let mut parser = Parser::new(tokenize(expression));
        let root = parser.parse_or().map_err(syntax)?;
        if let Some(extra) = parser.peek() {
            return Err(syntax(format!("unexpected token '{}'", extra)));
        }
        Ok(Self {
            expression: expression.to_string(),
            root,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Resolves the selection to the matching atoms, in topology order.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Empty`] if no atom matches.
    pub fn resolve(&self, topology: &Topology) -> Result<AtomGroup, SelectionError> {
        let indices: Vec<usize> = topology
            .atoms()
            .iter()
            .filter(|atom| self.root.matches(atom))
            .map(|atom| atom.index)
            .collect();
        if indices.is_empty() {
            return Err(SelectionError::Empty(self.expression.clone()));
        }
        Ok(AtomGroup {
            expression: self.expression.clone(),
            indices,
        })
    }
}

/// A non-empty set of atoms chosen by a selector string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomGroup {
    expression: String,
    indices: Vec<usize>,
}

impl AtomGroup {
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Reads the group's positions from a frame.
    ///
    /// Returns `None` if the frame has fewer atoms than the group refers to.
    pub fn positions(&self, frame: &Frame) -> Option<Vec<Point3<f64>>> {
        frame.gather(&self.indices)
    }
}

fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    for ch in input.chars() {
        if ch.is_whitespace() || ch == '(' || ch == ')' {
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
            if ch == '(' || ch == ')' {
                tokens.push(ch.to_string());
            }
        } else {
            word.push(ch);
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

fn is_keyword(token: &str) -> bool {
    token == "(" || token == ")" || KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(token))
}

fn parse_span(token: &str) -> Result<Span, String> {
    let bad = || format!("invalid number or range '{}'", token);
    let (start, end) = if let Some((a, b)) = token.split_once(':') {
        (a, b)
    } else if let Some((split, _)) = token.char_indices().skip(1).find(|&(_, c)| c == '-') {
        (&token[..split], &token[split + 1..])
    } else {
        (token, token)
    };
    let start: i64 = start.parse().map_err(|_| bad())?;
    let end: i64 = end.parse().map_err(|_| bad())?;
    if end < start {
        return Err(format!("range '{}' is reversed", token));
    }
    Ok(Span { start, end })
}

struct Parser {
    tokens: Vec<String>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<String>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(|s| s.as_str())
    }

    fn next(&mut self) -> Option<String> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_is(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|t| t.eq_ignore_ascii_case(keyword))
    }

    fn parse_or(&mut self) -> Result<Selector, String> {
        let mut left = self.parse_and()?;
        while self.peek_is("or") {
            self.next();
            let right = self.parse_and()?;
            left = Selector::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Selector, String> {
        let mut left = self.parse_not()?;
        while self.peek_is("and") {
            self.next();
            let right = self.parse_not()?;
            left = Selector::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Selector, String> {
        if self.peek_is("not") {
            self.next();
            let inner = self.parse_not()?;
            Ok(Selector::Not(Box::new(inner)))
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> Result<Selector, String> {
        let token = self
            .next()
            .ok_or_else(|| "unexpected end of selection".to_string())?;

        match token.to_ascii_lowercase().as_str() {
            "(" => {
                let inner = self.parse_or()?;
                match self.next() {
                    Some(t) if t == ")" => Ok(inner),
                    _ => Err("expected ')'".to_string()),
                }
            }
            "all" => Ok(Selector::All),
            "protein" => Ok(Selector::Protein),
            "backbone" => Ok(Selector::Backbone),
            "name" => Ok(Selector::Name(self.parse_values(&token)?)),
            "resname" => Ok(Selector::ResName(self.parse_values(&token)?)),
            "resid" => Ok(Selector::ResId(self.parse_spans(&token)?)),
            "index" => Ok(Selector::Index(self.parse_spans(&token)?)),
            "bynum" => Ok(Selector::ByNum(self.parse_spans(&token)?)),
            _ => Err(format!("unexpected token '{}'", token)),
        }
    }

    fn parse_values(&mut self, keyword: &str) -> Result<Vec<String>, String> {
        let mut values = Vec::new();
        while let Some(token) = self.peek() {
            if is_keyword(token) {
                break;
            }
            values.push(token.to_string());
            self.pos += 1;
        }
        if values.is_empty() {
            return Err(format!("expected value after '{}'", keyword));
        }
        Ok(values)
    }

    fn parse_spans(&mut self, keyword: &str) -> Result<Vec<Span>, String> {
        self.parse_values(keyword)?
            .iter()
            .map(|v| parse_span(v))
            .collect()
    }
}
