use crate::{Cursor, Line};

/// Span of source text between two cursors.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRange<'a> {
    start: Cursor<'a>,
    end: Cursor<'a>,
}

impl<'a> From<(Cursor<'a>, Cursor<'a>)> for SourceRange<'a> {
    fn from((start, end): (Cursor<'a>, Cursor<'a>)) -> Self {
        Self::new(start, end)
    }
}

impl<'a> SourceRange<'a> {
    pub fn new(start: Cursor<'a>, end: Cursor<'a>) -> Self {
        assert!(start.shares_source(&end), "range ends point into different sources");
        assert!(start.offset() <= end.offset());
        Self { start, end }
    }

    /// Empty range at the given position.
    pub fn at(cursor: Cursor<'a>) -> Self {
        Self { start: cursor.clone(), end: cursor }
    }

    pub fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.end)
    }

    /// Line on which the range starts.
    pub fn line(&self) -> Line {
        self.start.line()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lexeme_and_line() {
        let mut cursor = Cursor::new("1\n\"a\nb\"");
        cursor.next();
        cursor.next();
        let start = cursor.clone();
        cursor.eat_while(|_| true);

        let range = SourceRange::new(start, cursor.clone());
        assert_eq!(range.lexeme(), "\"a\nb\"");
        assert_eq!(range.line(), Line(2));

        let empty = SourceRange::at(cursor);
        assert_eq!(empty.lexeme(), "");
        assert_eq!(empty.line(), Line(3));
    }

    #[test]
    #[should_panic]
    fn reversed_range() {
        let start = Cursor::new("ab");
        let mut end = start.clone();
        end.next();
        SourceRange::new(end, start);
    }

    #[test]
    #[should_panic(expected = "different sources")]
    fn ranges_stay_in_one_source() {
        let source = "abc".to_string();
        let copy = source.clone();
        let mut end = Cursor::new(&copy);
        end.eat_while(|_| true);
        SourceRange::new(Cursor::new(&source), end);
    }
}
