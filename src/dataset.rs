use std::collections::{HashMap, HashSet};
use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use log::info;

use crate::error::AppError;
use crate::model::Recipe;

/// Lowercase, trimmed form used for every ingredient comparison.
pub fn normalize(ingredient: &str) -> String {
    ingredient.trim().to_lowercase()
}

/// In-memory recipe table plus the index of every known ingredient name.
///
/// Built once at startup and shared read-only for the process lifetime. The
/// index holds exactly the normalized ingredient names appearing in any
/// recipe's ingredient map.
#[derive(Debug)]
pub struct Dataset {
    recipes: Vec<Recipe>,
    ingredient_index: HashSet<String>,
}

impl Dataset {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        let dataset = Self::parse(&raw)?;
        info!(
            "Loaded {} recipes with {} distinct ingredients",
            dataset.recipes.len(),
            dataset.ingredient_index.len()
        );
        Ok(dataset)
    }

    /// Parse the tabular dataset format: a header row naming at least
    /// `name`, `url` and `ingredients`, then one recipe per line. The
    /// `ingredients` column holds a mapping literal such as
    /// `{'Мука': '2 стак.', 'Яйцо': '3 шт'}`.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let mut lines = raw
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let header = match lines.next() {
            Some((number, line)) => Columns::from_header(line, number + 1)?,
            None => return Ok(Self::from_recipes(Vec::new())),
        };

        let mut recipes = Vec::new();
        for (number, line) in lines {
            recipes.push(header.parse_row(line, number + 1)?);
        }

        Ok(Self::from_recipes(recipes))
    }

    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        let mut ingredient_index = HashSet::new();
        for recipe in &recipes {
            for name in recipe.ingredients.keys() {
                ingredient_index.insert(name.clone());
            }
        }

        Self {
            recipes,
            ingredient_index,
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// O(1) membership test. Expects an already normalized name.
    pub fn contains(&self, normalized_ingredient: &str) -> bool {
        self.ingredient_index.contains(normalized_ingredient)
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredient_index.len()
    }
}

/// Column positions resolved from the header row.
struct Columns {
    name: usize,
    url: usize,
    ingredients: usize,
}

impl Columns {
    fn from_header(line: &str, line_number: usize) -> Result<Self, AppError> {
        let fields = split_record(line);
        let position = |column: &str| {
            fields
                .iter()
                .position(|f| f.trim().eq_ignore_ascii_case(column))
                .ok_or_else(|| AppError::DatasetFormat {
                    line: line_number,
                    message: format!("missing '{column}' column in header"),
                })
        };

        Ok(Self {
            name: position("name")?,
            url: position("url")?,
            ingredients: position("ingredients")?,
        })
    }

    fn parse_row(&self, line: &str, line_number: usize) -> Result<Recipe, AppError> {
        let fields = split_record(line);
        let field = |index: usize| {
            fields.get(index).ok_or_else(|| AppError::DatasetFormat {
                line: line_number,
                message: format!("expected at least {} columns, got {}", index + 1, fields.len()),
            })
        };

        let name = field(self.name)?.clone();
        let url = field(self.url)?.clone();
        let literal = field(self.ingredients)?;

        let mut ingredients = HashMap::new();
        for (key, amount) in
            parse_mapping_literal(literal).map_err(|message| AppError::DatasetFormat {
                line: line_number,
                message,
            })?
        {
            ingredients.insert(normalize(&key), amount);
        }

        Ok(Recipe {
            name,
            url,
            ingredients,
        })
    }
}

/// Split one comma-separated record into fields. Double-quoted fields may
/// contain commas; a doubled quote inside a quoted field is an escape.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);

    fields
}

/// Parse a mapping literal of the shape `{'key': 'value', ...}`.
///
/// Keys and values may be single- or double-quoted (with backslash escapes)
/// or bare tokens. This is the serialization the dataset ships with, not
/// JSON, hence the hand-rolled parser.
fn parse_mapping_literal(raw: &str) -> Result<HashMap<String, String>, String> {
    LiteralParser::new(raw.trim()).parse_map()
}

struct LiteralParser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> LiteralParser<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            chars: raw.chars().peekable(),
        }
    }

    fn parse_map(mut self) -> Result<HashMap<String, String>, String> {
        self.expect('{')?;
        let mut map = HashMap::new();

        self.skip_whitespace();
        if self.eat('}') {
            return self.finish(map);
        }

        loop {
            self.skip_whitespace();
            let key = self.value(&[':'])?;
            self.skip_whitespace();
            self.expect(':')?;
            self.skip_whitespace();
            let value = self.value(&[',', '}'])?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.chars.next() {
                Some(',') => {
                    self.skip_whitespace();
                    // Trailing comma before the closing brace is accepted.
                    if self.eat('}') {
                        break;
                    }
                }
                Some('}') => break,
                Some(c) => return Err(format!("unexpected '{c}' in mapping literal")),
                None => return Err("unterminated mapping literal".to_string()),
            }
        }

        self.finish(map)
    }

    fn finish(mut self, map: HashMap<String, String>) -> Result<HashMap<String, String>, String> {
        self.skip_whitespace();
        match self.chars.next() {
            Some(c) => Err(format!("trailing '{c}' after mapping literal")),
            None => Ok(map),
        }
    }

    /// A quoted string, or a bare token running up to one of `stops`.
    fn value(&mut self, stops: &[char]) -> Result<String, String> {
        match self.chars.peek() {
            Some(&quote @ ('\'' | '"')) => {
                self.chars.next();
                self.quoted(quote)
            }
            Some(_) => self.bare(stops),
            None => Err("unterminated mapping literal".to_string()),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, String> {
        let mut out = String::new();
        while let Some(c) = self.chars.next() {
            match c {
                '\\' => match self.chars.next() {
                    Some(escaped) => out.push(escaped),
                    None => return Err("dangling escape in mapping literal".to_string()),
                },
                c if c == quote => return Ok(out),
                c => out.push(c),
            }
        }
        Err("unterminated string in mapping literal".to_string())
    }

    fn bare(&mut self, stops: &[char]) -> Result<String, String> {
        let mut out = String::new();
        while let Some(&c) = self.chars.peek() {
            if stops.contains(&c) {
                break;
            }
            out.push(c);
            self.chars.next();
        }

        let out = out.trim().to_string();
        if out.is_empty() {
            Err("empty token in mapping literal".to_string())
        } else {
            Ok(out)
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), String> {
        match self.chars.next() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(format!("expected '{expected}', found '{c}'")),
            None => Err(format!("expected '{expected}', found end of input")),
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek() == Some(&expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }
}
