//! Name search patterns.
//!
//! A pattern containing `%` is a raw SQL `LIKE` pattern: `%` matches any run
//! of characters and `_` matches exactly one. Anything else is a literal
//! substring search, so `_` in plain text only matches an underscore. An
//! empty pattern matches everything. Matching ignores ASCII case, the same way
//! SQLite's `LIKE` does.

/// Escape character for literal `%`, `_` and `\` in a `LIKE` operand.
pub const LIKE_ESCAPE: char = '\\';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    like: String,
}

impl SearchPattern {
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        let like = if raw.is_empty() {
            "%".to_string()
        } else if raw.contains('%') {
            raw.to_string()
        } else {
            let mut like = String::with_capacity(raw.len() + 2);
            like.push('%');
            for c in raw.chars() {
                if matches!(c, '_' | '\\') {
                    like.push(LIKE_ESCAPE);
                }
                like.push(c);
            }
            like.push('%');
            like
        };
        Self { like }
    }

    /// The pattern as a `LIKE` operand, escaped with [`LIKE_ESCAPE`].
    pub fn as_like(&self) -> &str {
        &self.like
    }

    pub fn matches(&self, name: &str) -> bool {
        let pattern = tokens(&self.like);
        let text: Vec<char> = name.chars().map(|c| c.to_ascii_lowercase()).collect();
        like_match(&pattern, &text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Any,
    One,
    Literal(char),
}

fn tokens(like: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let mut chars = like.chars();
    while let Some(c) = chars.next() {
        out.push(match c {
            '%' => Token::Any,
            '_' => Token::One,
            LIKE_ESCAPE => match chars.next() {
                Some(escaped) => Token::Literal(escaped.to_ascii_lowercase()),
                None => Token::Literal(LIKE_ESCAPE),
            },
            other => Token::Literal(other.to_ascii_lowercase()),
        });
    }
    out
}

// Iterative wildcard match with single-star backtracking.
fn like_match(pattern: &[Token], text: &[char]) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        let step = match pattern.get(p) {
            Some(Token::One) => true,
            Some(Token::Literal(c)) => *c == text[t],
            _ => false,
        };
        if step {
            p += 1;
            t += 1;
        } else if pattern.get(p) == Some(&Token::Any) {
            star = Some((p, t));
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&tok| tok == Token::Any)
}
