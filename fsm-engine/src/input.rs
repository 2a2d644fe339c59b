// Input tokenization
//
// Splits a line of text into the symbols a DFA consumes.

/// Iterate over the characters of `input` as one-character symbols
pub fn chars(input: &str) -> impl Iterator<Item = &str> + '_ {
    input
        .char_indices()
        .map(move |(start, c)| &input[start..start + c.len_utf8()])
}

/// How a line of text is split into symbols
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Tokenizer {
    /// Every character is one symbol
    #[default]
    Chars,

    /// Symbols are separated by whitespace
    Whitespace,

    /// Symbols are separated by a fixed delimiter
    Delimited(String),
}

impl Tokenizer {
    /// Split `line` into symbols. An empty line is the empty string.
    pub fn tokenize<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Tokenizer::Chars => chars(line).collect(),
            Tokenizer::Whitespace => line.split_whitespace().collect(),
            Tokenizer::Delimited(delimiter) if delimiter.is_empty() => chars(line).collect(),
            Tokenizer::Delimited(_) if line.is_empty() => Vec::new(),
            Tokenizer::Delimited(delimiter) => line.split(delimiter.as_str()).collect(),
        }
    }
}
