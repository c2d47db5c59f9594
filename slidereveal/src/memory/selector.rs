//! Minimal CSS selector matching for the in-memory document.
//!
//! Supported: type (`div`), universal (`*`), id (`#panel`), class (`.menu`),
//! attribute presence and equality (`[role]`, `[role="dialog"]`), compounds of
//! those, the descendant combinator (`nav a`) and selector lists (`a, b`).

/// Element view used while matching.
pub(crate) trait SelectorElement: Sized {
    fn tag(&self) -> &str;
    fn attr(&self, name: &str) -> Option<&str>;
    fn parent_element(&self) -> Option<Self>;

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Simple {
    Tag(String),
    Id(String),
    Class(String),
    Attr(String, Option<String>),
}

impl Simple {
    fn matches<E: SelectorElement>(&self, el: &E) -> bool {
        match self {
            Simple::Tag(tag) => el.tag().eq_ignore_ascii_case(tag),
            Simple::Id(id) => el.attr("id") == Some(id.as_str()),
            Simple::Class(class) => el.has_class(class),
            Simple::Attr(name, None) => el.attr(name).is_some(),
            Simple::Attr(name, Some(value)) => el.attr(name) == Some(value.as_str()),
        }
    }
}

/// Simple selectors that must all match one element. Empty means `*`.
type Compound = Vec<Simple>;

/// Parsed selector list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Selector {
    // Each alternative is a descendant chain, outermost compound first.
    alternatives: Vec<Vec<Compound>>,
}

impl Selector {
    /// Parse a selector list. Returns `None` on syntax this engine does not support.
    pub(crate) fn parse(input: &str) -> Option<Self> {
        let mut alternatives = Vec::new();
        for part in input.split(',') {
            let chain = part
                .split_whitespace()
                .map(parse_compound)
                .collect::<Option<Vec<_>>>()?;
            if chain.is_empty() {
                return None;
            }
            alternatives.push(chain);
        }
        Some(Self { alternatives })
    }

    pub(crate) fn matches<E: SelectorElement>(&self, el: &E) -> bool {
        self.alternatives.iter().any(|chain| matches_chain(chain, el))
    }
}

fn matches_compound<E: SelectorElement>(compound: &Compound, el: &E) -> bool {
    compound.iter().all(|s| s.matches(el))
}

fn matches_chain<E: SelectorElement>(chain: &[Compound], el: &E) -> bool {
    let Some((last, ancestors)) = chain.split_last() else {
        return false;
    };
    if !matches_compound(last, el) {
        return false;
    }
    // Greedy ancestor walk is exact for descendant-only chains
    let mut remaining = ancestors;
    let mut current = el.parent_element();
    while let Some((wanted, rest)) = remaining.split_last() {
        match current {
            Some(node) => {
                if matches_compound(wanted, &node) {
                    remaining = rest;
                }
                current = node.parent_element();
            }
            None => return false,
        }
    }
    true
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &[char], pos: &mut usize) -> Option<String> {
    let start = *pos;
    while *pos < chars.len() && is_ident_char(chars[*pos]) {
        *pos += 1;
    }
    (*pos > start).then(|| chars[start..*pos].iter().collect())
}

fn parse_compound(token: &str) -> Option<Compound> {
    let chars: Vec<char> = token.chars().collect();
    let mut pos = 0;
    let mut compound = Vec::new();

    if chars.first() == Some(&'*') {
        pos = 1;
    } else if chars.first().copied().is_some_and(is_ident_char) {
        compound.push(Simple::Tag(take_ident(&chars, &mut pos)?));
    }

    while pos < chars.len() {
        match chars[pos] {
            '#' => {
                pos += 1;
                compound.push(Simple::Id(take_ident(&chars, &mut pos)?));
            }
            '.' => {
                pos += 1;
                compound.push(Simple::Class(take_ident(&chars, &mut pos)?));
            }
            '[' => {
                pos += 1;
                let name = take_ident(&chars, &mut pos)?;
                let value = match chars.get(pos) {
                    Some(']') => None,
                    Some('=') => {
                        pos += 1;
                        let quote = chars.get(pos).copied().filter(|c| *c == '"' || *c == '\'');
                        let value = match quote {
                            Some(q) => {
                                pos += 1;
                                let start = pos;
                                while pos < chars.len() && chars[pos] != q {
                                    pos += 1;
                                }
                                if pos >= chars.len() {
                                    return None;
                                }
                                let v: String = chars[start..pos].iter().collect();
                                pos += 1;
                                v
                            }
                            None => take_ident(&chars, &mut pos)?,
                        };
                        if chars.get(pos) != Some(&']') {
                            return None;
                        }
                        Some(value)
                    }
                    _ => return None,
                };
                pos += 1;
                compound.push(Simple::Attr(name, value));
            }
            _ => return None,
        }
    }

    Some(compound)
}
