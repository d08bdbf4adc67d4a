//! Brace-balance block scanner.
//!
//! Counts every `{` and `}` on every line. It has no idea about strings,
//! template literals, regexes or comments, so a brace inside any of those
//! shifts the detected end of a block. Callers treat the result as an
//! approximation.

/// Outcome of scanning for the end of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockEnd {
    /// 0-based index of the last line of the block
    pub line: usize,
    /// False when the input ran out before the block closed
    pub closed: bool,
}

/// Line-based brace counter
#[derive(Debug, Default, Clone, Copy)]
pub struct BraceScanner;

impl BraceScanner {
    /// End of a component starting at `start` (0-based).
    ///
    /// A declaration that ends with `;` before any brace opens is a
    /// single-statement component (`const A = () => <div/>;`).
    pub fn find_component_end(lines: &[&str], start: usize) -> BlockEnd {
        Self::scan(lines, start, true)
    }

    /// End of a class body whose header is on or after `start` (0-based)
    pub fn find_class_end(lines: &[&str], start: usize) -> BlockEnd {
        Self::scan(lines, start, false)
    }

    fn scan(lines: &[&str], start: usize, allow_statement: bool) -> BlockEnd {
        if lines.is_empty() {
            return BlockEnd { line: 0, closed: false };
        }
        let start = start.min(lines.len() - 1);
        let mut depth: i64 = 0;
        let mut opened = false;

        for (idx, line) in lines.iter().enumerate().skip(start) {
            for ch in line.chars() {
                match ch {
                    '{' => {
                        depth += 1;
                        opened = true;
                    }
                    '}' => depth -= 1,
                    _ => {}
                }
            }
            if opened && depth <= 0 {
                return BlockEnd { line: idx, closed: true };
            }
            if !opened && allow_statement && line.trim_end().ends_with(';') {
                return BlockEnd { line: idx, closed: true };
            }
        }

        BlockEnd {
            line: lines.len() - 1,
            closed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<&str> {
        src.lines().collect()
    }

    #[test]
    fn test_simple_block() {
        let src = lines("function App() {\n  if (x) {\n    y();\n  }\n  return null;\n}\nconst z = 1;");
        assert_eq!(
            BraceScanner::find_component_end(&src, 0),
            BlockEnd { line: 5, closed: true }
        );
    }

    #[test]
    fn test_single_line_arrow() {
        let src = lines("const A = () => <div/>;\nconst B = 2;");
        assert_eq!(BraceScanner::find_component_end(&src, 0).line, 0);
    }

    #[test]
    fn test_missing_close_runs_to_eof() {
        let src = lines("class A {\n  m() {\n  }\n");
        let end = BraceScanner::find_class_end(&src, 0);
        assert!(!end.closed);
        assert_eq!(end.line, 2);
    }

    #[test]
    fn test_brace_in_string_shifts_end() {
        // The true end is line 3; the unmatched `{` in the string keeps the
        // counter open until the file runs out.
        let src = lines("const A = () => {\n  const s = \"{\";\n  return s;\n};\nconst after = () => {\n};");
        let end = BraceScanner::find_component_end(&src, 0);
        assert_ne!(end.line, 3);
    }

    #[test]
    fn test_class_header_on_later_line() {
        let src = lines("@Component({})\nexport class Hero\n{\n  x = 1;\n}");
        assert_eq!(BraceScanner::find_class_end(&src, 1).line, 4);
    }
}
