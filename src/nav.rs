//! Pure index-arithmetic navigation over a parsed [`Token`] array.
//!
//! Every function here takes the full preorder token slice produced by a
//! single [`crate::parse_buffer`] call plus an index into it, and returns
//! another index (or `None`). None of them allocate, recurse, or look past
//! `level()`/`is_last()` — the same contract the original C walker
//! (`mu_json_find_*`) keeps by storing only those two fields per token.

use std::borrow::Cow;
use std::io;

use ptree::{Style, TreeItem};

use crate::token::Token;

/// The first token of the slice, i.e. the parsed document's top-level value.
pub fn root(tokens: &[Token]) -> Option<usize> {
    if tokens.is_empty() {
        None
    } else {
        Some(0)
    }
}

/// The token immediately following `index` in preorder, with no regard for
/// tree structure. Usually not what you want directly; prefer
/// [`child`]/[`next_sibling`].
pub fn next(tokens: &[Token], index: usize) -> Option<usize> {
    let next = index + 1;
    if next < tokens.len() {
        Some(next)
    } else {
        None
    }
}

/// The token immediately preceding `index` in preorder.
pub fn prev(tokens: &[Token], index: usize) -> Option<usize> {
    index.checked_sub(1)
}

/// The enclosing `Object`/`Array` token one level up from `index`, or `None`
/// if `index` is already the root.
pub fn parent(tokens: &[Token], index: usize) -> Option<usize> {
    let level = tokens[index].level();
    if level == 0 {
        return None;
    }
    let mut i = index;
    while i > 0 {
        i -= 1;
        if tokens[i].level() < level {
            return Some(i);
        }
    }
    None
}

/// The first child of `index`, i.e. the next token one level deeper, if any.
pub fn child(tokens: &[Token], index: usize) -> Option<usize> {
    let next = index + 1;
    if next < tokens.len() && tokens[next].level() == tokens[index].level() + 1 {
        Some(next)
    } else {
        None
    }
}

/// The next token at the same level as `index` that shares its parent, or
/// `None` if `index` is the last child of its parent (or the root).
pub fn next_sibling(tokens: &[Token], index: usize) -> Option<usize> {
    if tokens[index].is_last() {
        return None;
    }
    let level = tokens[index].level();
    let mut i = index + 1;
    while i < tokens.len() {
        let candidate_level = tokens[i].level();
        if candidate_level < level {
            return None;
        }
        if candidate_level == level {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// The previous token at the same level as `index` that shares its parent,
/// or `None` if `index` is the first child of its parent (or the root).
pub fn prev_sibling(tokens: &[Token], index: usize) -> Option<usize> {
    let level = tokens[index].level();
    if index == 0 {
        return None;
    }
    let mut i = index;
    while i > 0 {
        i -= 1;
        let candidate_level = tokens[i].level();
        if candidate_level < level {
            return None;
        }
        if candidate_level == level {
            return Some(i);
        }
    }
    None
}

/// Count of `index`'s direct children, by walking [`next_sibling`] from
/// [`child`]. `O(children)`, not `O(1)`: the flat array has no count field.
pub fn child_count(tokens: &[Token], index: usize) -> usize {
    let mut count = 0;
    let mut cursor = child(tokens, index);
    while let Some(i) = cursor {
        count += 1;
        cursor = next_sibling(tokens, i);
    }
    count
}

/// A [`ptree`]-renderable view of the subtree rooted at one token, for
/// debugging a parse visually (`ptree::print_tree(&TokenTree::new(...))`).
#[derive(Clone, Copy)]
pub struct TokenTree<'a> {
    tokens: &'a [Token],
    input: &'a [u8],
    index: usize,
}

impl<'a> TokenTree<'a> {
    pub fn new(tokens: &'a [Token], input: &'a [u8], index: usize) -> Self {
        Self {
            tokens,
            input,
            index,
        }
    }

    /// A view rooted at the document's top-level value.
    pub fn of_document(tokens: &'a [Token], input: &'a [u8]) -> Option<Self> {
        root(tokens).map(|index| Self::new(tokens, input, index))
    }
}

impl<'a> TreeItem for TokenTree<'a> {
    type Child = Self;

    fn write_self<W: io::Write>(&self, f: &mut W, _: &Style) -> io::Result<()> {
        let token = self.tokens[self.index];
        let extent = String::from_utf8_lossy(token.extent(self.input));
        write!(f, "{}: {}", token.token_type(), extent)
    }

    fn children(&self) -> Cow<[Self::Child]> {
        let mut kids = Vec::new();
        let mut cursor = child(self.tokens, self.index);
        while let Some(i) = cursor {
            kids.push(TokenTree::new(self.tokens, self.input, i));
            cursor = next_sibling(self.tokens, i);
        }
        Cow::from(kids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_str, Token};

    fn parse(input: &str) -> (Vec<Token>, usize) {
        let mut tokens = vec![Token::default(); 200];
        let n = parse_str(input, &mut tokens).unwrap();
        tokens.truncate(n);
        (tokens, n)
    }

    #[test]
    fn root_is_first_token() {
        let (tokens, _) = parse(r#"{"a":1}"#);
        assert_eq!(root(&tokens), Some(0));
    }

    #[test]
    fn child_and_next_sibling_walk_object_members() {
        let (tokens, _) = parse(r#"{"a":1,"b":2,"c":3}"#);
        let key_a = child(&tokens, 0).unwrap();
        assert_eq!(tokens[key_a].extent_str(r#"{"a":1,"b":2,"c":3}"#), "\"a\"");

        let val_a = next_sibling(&tokens, key_a).unwrap();
        assert_eq!(tokens[val_a].extent_str(r#"{"a":1,"b":2,"c":3}"#), "1");

        let key_b = next_sibling(&tokens, val_a).unwrap();
        assert_eq!(tokens[key_b].extent_str(r#"{"a":1,"b":2,"c":3}"#), "\"b\"");

        let val_b = next_sibling(&tokens, key_b).unwrap();
        let key_c = next_sibling(&tokens, val_b).unwrap();
        let val_c = next_sibling(&tokens, key_c).unwrap();
        assert_eq!(tokens[val_c].extent_str(r#"{"a":1,"b":2,"c":3}"#), "3");
        assert_eq!(next_sibling(&tokens, val_c), None);
    }

    #[test]
    fn prev_sibling_is_inverse_of_next_sibling() {
        let (tokens, _) = parse(r#"[1,2,3]"#);
        let first = child(&tokens, 0).unwrap();
        let second = next_sibling(&tokens, first).unwrap();
        let third = next_sibling(&tokens, second).unwrap();

        assert_eq!(prev_sibling(&tokens, third), Some(second));
        assert_eq!(prev_sibling(&tokens, second), Some(first));
        assert_eq!(prev_sibling(&tokens, first), None);
    }

    #[test]
    fn parent_and_child_are_inverses_across_nesting() {
        let (tokens, _) = parse(r#"{"outer":{"inner":[1,2]}}"#);
        let outer_key = child(&tokens, 0).unwrap();
        let inner_obj = next_sibling(&tokens, outer_key).unwrap();
        let inner_key = child(&tokens, inner_obj).unwrap();
        let array = next_sibling(&tokens, inner_key).unwrap();

        assert_eq!(parent(&tokens, array), Some(inner_obj));
        assert_eq!(parent(&tokens, inner_obj), Some(0));
        assert_eq!(parent(&tokens, 0), None);
    }

    #[test]
    fn skips_over_nested_subtrees_when_finding_siblings() {
        let (tokens, _) = parse(r#"[[1,2,3],[4,5],6]"#);
        let first = child(&tokens, 0).unwrap();
        let second = next_sibling(&tokens, first).unwrap();
        let third = next_sibling(&tokens, second).unwrap();

        assert_eq!(tokens[second].level(), tokens[first].level());
        assert_eq!(
            tokens[third].extent_str(r#"[[1,2,3],[4,5],6]"#),
            "6"
        );
        assert_eq!(next_sibling(&tokens, third), None);
    }

    #[test]
    fn child_count_matches_member_count() {
        let (tokens, _) = parse(r#"{"a":1,"b":2,"c":3}"#);
        assert_eq!(child_count(&tokens, 0), 6); // 3 keys + 3 values
        let (tokens, _) = parse("[]");
        assert_eq!(child_count(&tokens, 0), 0);
    }

    #[test]
    fn token_tree_renders_without_panicking() {
        let (tokens, _) = parse(r#"{"a":[1,2],"b":true}"#);
        let input = r#"{"a":[1,2],"b":true}"#.as_bytes();
        let tree = TokenTree::of_document(&tokens, input).unwrap();
        let mut buf = Vec::new();
        ptree::write_tree(&tree, &mut buf).unwrap();
        assert!(!buf.is_empty());
    }
}
