use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// Parser-side metadata for an operator. The lexer only looks at symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operator {
    pub precedence: u32,
    pub associativity: Associativity,
}

impl Operator {
    pub fn left(precedence: u32) -> Self {
        Operator {
            precedence,
            associativity: Associativity::Left,
        }
    }

    pub fn right(precedence: u32) -> Self {
        Operator {
            precedence,
            associativity: Associativity::Right,
        }
    }
}

/// The operators registered by extensions at the time a lexer is built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperatorSet {
    unary: BTreeMap<String, Operator>,
    binary: BTreeMap<String, Operator>,
}

impl OperatorSet {
    pub fn new() -> Self {
        OperatorSet::default()
    }

    /// The table shipped with the core extension.
    pub fn standard() -> Self {
        let mut set = OperatorSet::new();
        set.add_unary("not", Operator::left(50))
            .add_unary("-", Operator::left(500))
            .add_unary("+", Operator::left(500));

        let binary = [
            ("or", Operator::left(10)),
            ("and", Operator::left(15)),
            ("b-or", Operator::left(16)),
            ("b-xor", Operator::left(17)),
            ("b-and", Operator::left(18)),
            ("==", Operator::left(20)),
            ("!=", Operator::left(20)),
            ("<", Operator::left(20)),
            (">", Operator::left(20)),
            (">=", Operator::left(20)),
            ("<=", Operator::left(20)),
            ("not in", Operator::left(20)),
            ("in", Operator::left(20)),
            ("matches", Operator::left(20)),
            ("starts with", Operator::left(20)),
            ("ends with", Operator::left(20)),
            ("..", Operator::left(25)),
            ("+", Operator::left(30)),
            ("-", Operator::left(30)),
            ("~", Operator::left(40)),
            ("*", Operator::left(60)),
            ("/", Operator::left(60)),
            ("//", Operator::left(60)),
            ("%", Operator::left(60)),
            ("is", Operator::left(100)),
            ("is not", Operator::left(100)),
            ("**", Operator::right(200)),
            ("??", Operator::right(300)),
        ];
        for (symbol, operator) in binary {
            set.add_binary(symbol, operator);
        }
        set
    }

    pub fn add_unary(&mut self, symbol: &str, operator: Operator) -> &mut Self {
        self.unary.insert(String::from(symbol), operator);
        self
    }

    pub fn add_binary(&mut self, symbol: &str, operator: Operator) -> &mut Self {
        self.binary.insert(String::from(symbol), operator);
        self
    }

    pub fn unary(&self) -> &BTreeMap<String, Operator> {
        &self.unary
    }

    pub fn binary(&self) -> &BTreeMap<String, Operator> {
        &self.binary
    }

    /// Every registered symbol, unary first, duplicates included.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.unary
            .keys()
            .chain(self.binary.keys())
            .map(|s| s.as_str())
    }
}
