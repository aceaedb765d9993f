//! Span resolution
//!
//! Turns an overlapping, unordered token list into disjoint styled spans
//! covering the whole text. Conceptually every token paints its style
//! over its range in ascending priority order; the sweep below computes
//! the same result directly from the token boundaries.

use std::collections::{BinaryHeap, HashMap};

use super::style::{Span, StyleAttributes};
use super::theme::{SelectorPolicy, Theme};
use super::tokenizer::Token;

/// A token with its resolved style and priority
struct Layer<'t> {
    start: usize,
    end: usize,
    priority: i32,
    style: &'t StyleAttributes,
}

/// Resolve tokens to spans with the best-match cascade
pub fn resolve_spans(tokens: &[Token<'_>], theme: &Theme, text_len: usize) -> Vec<Span> {
    resolve_spans_with(tokens, theme, text_len, SelectorPolicy::BestMatch)
}

/// Resolve tokens to disjoint spans covering `[0, text_len)`
///
/// Each offset gets the style of the covering token with the highest
/// specificity; equal specificities go to the token that comes later in
/// `tokens`. Uncovered text gets the theme's base style. Adjacent spans
/// with equal styles are merged.
pub fn resolve_spans_with(
    tokens: &[Token<'_>],
    theme: &Theme,
    text_len: usize,
    policy: SelectorPolicy,
) -> Vec<Span> {
    let mut resolved: HashMap<&str, (&StyleAttributes, i32)> = HashMap::new();
    let layers: Vec<Layer<'_>> = tokens
        .iter()
        .filter_map(|token| {
            let start = token.start.min(text_len);
            let end = token.end.min(text_len);
            if start >= end {
                return None;
            }
            let (style, priority) = *resolved
                .entry(token.scope)
                .or_insert_with(|| theme.resolve_with(token.scope, policy));
            Some(Layer {
                start,
                end,
                priority,
                style,
            })
        })
        .collect();

    let mut cuts: Vec<usize> = layers
        .iter()
        .flat_map(|layer| [layer.start, layer.end])
        .chain([0, text_len])
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut by_start: Vec<usize> = (0..layers.len()).collect();
    by_start.sort_by_key(|&i| layers[i].start);

    // Max-heap on (priority, token index); finished layers are dropped lazily
    let mut active: BinaryHeap<(i32, usize)> = BinaryHeap::new();
    let mut next = 0;
    let mut spans: Vec<Span> = Vec::new();

    for window in cuts.windows(2) {
        let (start, end) = (window[0], window[1]);

        while let Some(&i) = by_start.get(next) {
            if layers[i].start > start {
                break;
            }
            active.push((layers[i].priority, i));
            next += 1;
        }
        while let Some(&(_, i)) = active.peek() {
            if layers[i].end > start {
                break;
            }
            active.pop();
        }

        let style = active
            .peek()
            .map_or(theme.base(), |&(_, i)| layers[i].style);
        match spans.last_mut() {
            Some(last) if last.end == start && last.style == *style => last.end = end,
            _ => spans.push(Span::new(start, end, style.clone())),
        }
    }

    tracing::trace!(tokens = tokens.len(), spans = spans.len(), "resolved spans");
    spans
}
