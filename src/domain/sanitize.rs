//! Markup stripping for plain-text message bodies.
//!
//! The rewrite rules run in a fixed order and each one operates on the
//! output of the previous (bold before italic, so `**x**` is not mistaken
//! for nested `*` pairs). All patterns are non-greedy. Fenced code blocks
//! keep their inner content, same as every other delimiter pair.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD_STARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern"));
static BOLD_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(.*?)__").expect("bold pattern"));
static ITALIC_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("italic pattern"));
static ITALIC_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_(.*?)_").expect("italic pattern"));
static STRIKETHROUGH: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.*?)~~").expect("strike pattern"));
static FENCED_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(.*?)```").expect("fence pattern"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("inline pattern"));
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]\(.*?\)").expect("link pattern"));

/// Strips lightweight markup delimiters, keeping the delimited text.
pub fn strip_markup(text: &str) -> String {
    let text = BOLD_STARS.replace_all(text, "$1");
    let text = BOLD_UNDERSCORES.replace_all(&text, "$1");
    let text = ITALIC_STAR.replace_all(&text, "$1");
    let text = ITALIC_UNDERSCORE.replace_all(&text, "$1");
    let text = STRIKETHROUGH.replace_all(&text, "$1");
    let text = FENCED_CODE.replace_all(&text, "$1");
    let text = INLINE_CODE.replace_all(&text, "$1");
    LINK.replace_all(&text, "$1").into_owned()
}
