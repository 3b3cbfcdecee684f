//! Fenced code block extraction
//!
//! Models are asked to return the modified file inside a fenced block. This
//! module isolates the first such block from the surrounding prose.

use thiserror::Error;

const MIN_FENCE: usize = 3;

/// Reasons a model response yielded no usable code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The text contains no opening fence
    #[error("response contains no fenced code block")]
    NoFence,
    /// An opening fence was found but never closed
    #[error("fenced code block starting on line {line} is not terminated")]
    Unterminated { line: usize },
}

/// Extract the body of the first fenced code block in `text`.
///
/// The opening fence may carry a language tag (```` ```java ````), which is
/// discarded. The block is closed by a line of at least as many backticks as
/// the opening fence, so a four-backtick fence can wrap three-backtick
/// examples. The body is returned byte for byte, line endings included,
/// except for the single line break that precedes the closing fence. An
/// empty block yields an empty string.
pub fn extract_code(text: &str) -> Result<String, ExtractError> {
    let mut offset = 0;
    let mut lines = text.split_inclusive('\n').enumerate();

    let (open_line, fence_len) = loop {
        let Some((idx, line)) = lines.next() else {
            return Err(ExtractError::NoFence);
        };
        offset += line.len();
        let run = backtick_run(line.trim_start());
        if run >= MIN_FENCE {
            break (idx, run);
        }
    };

    let body_start = offset;
    for (_, line) in lines {
        if is_closing_fence(line, fence_len) {
            let body = strip_line_break(&text[body_start..offset]);
            return Ok(body.to_string());
        }
        offset += line.len();
    }

    Err(ExtractError::Unterminated {
        line: open_line + 1,
    })
}

fn backtick_run(s: &str) -> usize {
    s.bytes().take_while(|&b| b == b'`').count()
}

fn is_closing_fence(line: &str, fence_len: usize) -> bool {
    let trimmed = line.trim();
    backtick_run(trimmed) >= fence_len && trimmed.trim_start_matches('`').is_empty()
}

fn strip_line_break(body: &str) -> &str {
    body.strip_suffix("\r\n")
        .or_else(|| body.strip_suffix('\n'))
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tagged_block() {
        let text = "```java\n// documented code\n```";
        assert_eq!(extract_code(text).unwrap(), "// documented code");
    }

    #[test]
    fn test_extract_untagged_block_with_prose() {
        let text = "Here is the documented file:\n\n```\n/// Adds.\nfn add() {}\n```\n\nLet me know!";
        assert_eq!(extract_code(text).unwrap(), "/// Adds.\nfn add() {}");
    }

    #[test]
    fn test_only_first_block_is_used() {
        let text = "```rust\nfirst\n```\nand\n```rust\nsecond\n```";
        assert_eq!(extract_code(text).unwrap(), "first");
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(extract_code("```java\n```").unwrap(), "");
    }

    #[test]
    fn test_no_fence() {
        assert_eq!(
            extract_code("public class TestClass {}"),
            Err(ExtractError::NoFence)
        );
    }

    #[test]
    fn test_unterminated_fence() {
        let text = "intro\n```java\npublic class A {}\n";
        assert_eq!(
            extract_code(text),
            Err(ExtractError::Unterminated { line: 2 })
        );
    }

    #[test]
    fn test_single_line_fence_is_not_code() {
        // Everything after the opening backticks is a language tag.
        assert!(extract_code("```code```").is_err());
    }

    #[test]
    fn test_crlf_line_endings_are_kept() {
        let text = "```python\r\ndef f():\r\n    return 1\r\n```\r\n";
        assert_eq!(extract_code(text).unwrap(), "def f():\r\n    return 1");
    }

    #[test]
    fn test_blank_lines_inside_block_are_kept() {
        let text = "```\na\n\nb\n\n```";
        assert_eq!(extract_code(text).unwrap(), "a\n\nb\n");
    }

    #[test]
    fn test_indented_fences() {
        let text = "  ```java\n  int x;\n  ```";
        assert_eq!(extract_code(text).unwrap(), "  int x;");
    }

    #[test]
    fn test_longer_fence_wraps_shorter_fences() {
        let text = "````markdown\n# Usage\n```rust\nfn a() {}\n```\n````\n";
        assert_eq!(
            extract_code(text).unwrap(),
            "# Usage\n```rust\nfn a() {}\n```"
        );
    }

    #[test]
    fn test_shorter_closing_fence_does_not_close() {
        let text = "````\ncode\n```\n";
        assert_eq!(
            extract_code(text),
            Err(ExtractError::Unterminated { line: 1 })
        );
    }
}
