//! Recursive-descent parser for selector parameter text.
//!
//! Parsing is pure: it turns text into an [`Expression`] tree and never
//! touches a provider. Evaluation lives in the evaluator module. Parameter
//! lists nest at most [`SELECTOR_MAX_DEPTH`] levels deep, which also bounds
//! how deeply evaluation recurses.
//!
//! ```text
//! parameters = ws* ( "(" ws* ( parameter ( ws* "," ws* parameter )* )? ws* ")" ws* )?
//! parameter  = call | number | string
//! call       = name ( ws* "(" ... ")" )?
//! number     = "-"? digit+ ( "." digit+ )?
//! string     = '"' ( escape | [^"\\] )* '"'
//! escape     = '\' ( '"' | '\' | "'" | "n" | "r" | "t" | "0" )
//! ```

use crate::name::{is_name_initial, is_name_part};
use crate::{Name, PluginError, PluginKind};

/// How deeply parameter lists may nest, counting the selector's own list.
pub const SELECTOR_MAX_DEPTH: usize = 64;

/// A parsed selector parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression<K: PluginKind> {
    /// A nested plugin reference, with or without a parameter list.
    Call {
        /// The referenced plugin.
        name: Name<K>,
        /// Its parameters, empty for a bare name.
        parameters: Vec<Expression<K>>,
    },
    /// A numeric literal.
    Number(f64),
    /// A double quoted string literal with escapes already applied.
    String(String),
}

/// Parses the parameter part of `text`, starting at character offset `start`.
///
/// `text` is the complete selector text so that errors report offsets and
/// characters exactly as they appear in the input.
pub(crate) fn parse_parameters<K: PluginKind>(
    text: &str,
    start: usize,
) -> Result<Vec<Expression<K>>, PluginError> {
    let mut parser = Parser::new(text, start);
    parser.skip_whitespace();
    if parser.peek().is_none() {
        return Ok(Vec::new());
    }

    parser.expect('(', "'('")?;
    let parameters = parser.parse_parameter_list()?;
    parser.skip_whitespace();
    if parser.peek().is_some() {
        return Err(parser.invalid_character(parser.position));
    }
    Ok(parameters)
}

struct Parser<'a> {
    text: &'a str,
    chars: Vec<char>,
    position: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, start: usize) -> Self {
        Self {
            text,
            chars: text.chars().collect(),
            position: start,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let character = self.peek();
        if character.is_some() {
            self.position += 1;
        }
        character
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn invalid_character(&self, position: usize) -> PluginError {
        match self.chars.get(position) {
            Some(character) => PluginError::InvalidCharacter {
                text: self.text.to_owned(),
                character: *character,
                position,
            },
            None => self.end_of_text("more text"),
        }
    }

    fn end_of_text(&self, expected: &'static str) -> PluginError {
        PluginError::EndOfText {
            text: self.text.to_owned(),
            expected,
        }
    }

    fn expect(&mut self, wanted: char, expected: &'static str) -> Result<(), PluginError> {
        match self.peek() {
            Some(character) if character == wanted => {
                self.position += 1;
                Ok(())
            }
            Some(_) => Err(self.invalid_character(self.position)),
            None => Err(self.end_of_text(expected)),
        }
    }

    /// Parses everything after an opening `(` up to and including the
    /// matching `)`.
    fn parse_parameter_list<K: PluginKind>(&mut self) -> Result<Vec<Expression<K>>, PluginError> {
        if self.depth == SELECTOR_MAX_DEPTH {
            return Err(PluginError::NestingTooDeep {
                text: self.text.to_owned(),
                position: self.position - 1,
                max: SELECTOR_MAX_DEPTH,
            });
        }
        self.depth += 1;
        let parameters = self.parse_parameter_items()?;
        self.depth -= 1;
        Ok(parameters)
    }

    fn parse_parameter_items<K: PluginKind>(&mut self) -> Result<Vec<Expression<K>>, PluginError> {
        let mut parameters = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.position += 1;
            return Ok(parameters);
        }

        loop {
            self.skip_whitespace();
            parameters.push(self.parse_parameter()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.position += 1,
                Some(')') => {
                    self.position += 1;
                    return Ok(parameters);
                }
                Some(_) => return Err(self.invalid_character(self.position)),
                None => return Err(self.end_of_text("',' or ')'")),
            }
        }
    }

    fn parse_parameter<K: PluginKind>(&mut self) -> Result<Expression<K>, PluginError> {
        match self.peek() {
            Some('"') => self.parse_string(),
            Some(character) if character == '-' || character.is_ascii_digit() => {
                self.parse_number()
            }
            Some(character) if is_name_initial(character) => self.parse_call(),
            Some(_) => Err(self.invalid_character(self.position)),
            None => Err(self.end_of_text("parameter")),
        }
    }

    fn parse_call<K: PluginKind>(&mut self) -> Result<Expression<K>, PluginError> {
        let start = self.position;
        match self.peek() {
            Some(character) if is_name_initial(character) => self.position += 1,
            Some(_) => return Err(self.invalid_character(start)),
            None => return Err(self.end_of_text("name")),
        }
        while self.peek().is_some_and(is_name_part) {
            self.position += 1;
        }

        let text: String = self.chars[start..self.position].iter().collect();
        let name = Name::parse(&text).map_err(|error| error.within(self.text, start))?;

        // Whitespace between a name and its parameter list is allowed, but
        // whitespace followed by anything else belongs to the enclosing list.
        let after_name = self.position;
        self.skip_whitespace();
        if self.peek() == Some('(') {
            self.position += 1;
            let parameters = self.parse_parameter_list()?;
            return Ok(Expression::Call { name, parameters });
        }
        self.position = after_name;

        Ok(Expression::Call {
            name,
            parameters: Vec::new(),
        })
    }

    fn parse_number<K: PluginKind>(&mut self) -> Result<Expression<K>, PluginError> {
        let start = self.position;
        if self.peek() == Some('-') {
            self.position += 1;
        }
        self.digits()?;
        if self.peek() == Some('.') {
            self.position += 1;
            self.digits()?;
        }

        let literal: String = self.chars[start..self.position].iter().collect();
        literal
            .parse::<f64>()
            .map(Expression::Number)
            .map_err(|_| self.invalid_character(start))
    }

    fn digits(&mut self) -> Result<(), PluginError> {
        match self.peek() {
            Some(character) if character.is_ascii_digit() => {}
            Some(_) => return Err(self.invalid_character(self.position)),
            None => return Err(self.end_of_text("digit")),
        }
        while self.peek().is_some_and(|character| character.is_ascii_digit()) {
            self.position += 1;
        }
        Ok(())
    }

    fn parse_string<K: PluginKind>(&mut self) -> Result<Expression<K>, PluginError> {
        self.expect('"', "'\"'")?;
        let mut value = String::new();

        loop {
            match self.advance() {
                Some('"') => return Ok(Expression::String(value)),
                Some('\\') => {
                    let escaped = match self.advance() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('\'') => '\'',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('0') => '\0',
                        Some(_) => return Err(self.invalid_character(self.position - 1)),
                        None => return Err(self.end_of_text("escaped character")),
                    };
                    value.push(escaped);
                }
                Some(character) => value.push(character),
                None => return Err(self.end_of_text("closing '\"'")),
            }
        }
    }
}
