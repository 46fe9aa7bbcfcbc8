//! Packs extracted units into retrieval-sized documents

use crate::types::TextUnit;

/// Merges small units and splits oversized ones against a token budget.
///
/// - `tokens > limit`: split into `ceil(tokens / limit)` chunks labelled
///   `<label>#000001`, `<label>#000002`, ...
/// - `tokens < limit / 5`: held back and merged with its neighbours once the
///   held tokens reach `limit / 2`
/// - anything else passes through unchanged
///
/// Output follows input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentPacker {
    token_limit: usize,
}

impl DocumentPacker {
    /// Create a packer. A limit of zero is treated as one.
    pub fn new(token_limit: usize) -> Self {
        Self {
            token_limit: token_limit.max(1),
        }
    }

    /// Token budget per packed document
    pub fn token_limit(&self) -> usize {
        self.token_limit
    }

    fn is_small(&self, unit: &TextUnit) -> bool {
        unit.tokens.saturating_mul(5) < self.token_limit
    }

    /// Pack `units` into retrieval documents
    pub fn pack<I>(&self, units: I) -> Vec<TextUnit>
    where
        I: IntoIterator<Item = TextUnit>,
    {
        let mut packed = Vec::new();
        let mut waiting: Vec<TextUnit> = Vec::new();
        let mut waiting_tokens = 0usize;

        for unit in units {
            if unit.tokens > self.token_limit {
                flush(&mut waiting, &mut waiting_tokens, &mut packed);
                packed.extend(self.split(unit));
            } else if self.is_small(&unit) {
                waiting_tokens += unit.tokens;
                waiting.push(unit);
                if waiting_tokens.saturating_mul(2) >= self.token_limit {
                    flush(&mut waiting, &mut waiting_tokens, &mut packed);
                }
            } else {
                flush(&mut waiting, &mut waiting_tokens, &mut packed);
                packed.push(unit);
            }
        }

        flush(&mut waiting, &mut waiting_tokens, &mut packed);
        packed
    }

    /// Split an oversized unit into near-equal character spans
    fn split(&self, unit: TextUnit) -> Vec<TextUnit> {
        let chunk_count = unit.tokens.div_ceil(self.token_limit).max(1);
        let chars: Vec<char> = unit.content.chars().collect();
        let span = chars.len().div_ceil(chunk_count).max(1);

        let mut remaining = unit.tokens;
        (0..chunk_count)
            .map(|i| {
                let start = (i * span).min(chars.len());
                let end = ((i + 1) * span).min(chars.len());
                let tokens = remaining.min(self.token_limit);
                remaining -= tokens;

                TextUnit::new(
                    format!("{}#{:06}", unit.label, i + 1),
                    chars[start..end].iter().collect::<String>(),
                    tokens,
                )
            })
            .collect()
    }
}

/// Emit the held units: a lone unit unchanged, several as one merged unit
fn flush(waiting: &mut Vec<TextUnit>, waiting_tokens: &mut usize, packed: &mut Vec<TextUnit>) {
    match waiting.len() {
        0 => {}
        1 => packed.append(waiting),
        n => {
            let content = waiting
                .iter()
                .map(|u| u.content.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            packed.push(TextUnit::new(format!("Merged_{}_docs", n), content, *waiting_tokens));
            waiting.clear();
        }
    }
    *waiting_tokens = 0;
}
