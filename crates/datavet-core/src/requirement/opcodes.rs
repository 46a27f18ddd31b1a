//! Longest-matching-block sequence alignment
//!
//! Produces the same opcodes and similarity ratio as the classic
//! Ratcliff/Obershelp matcher: recursively take the longest common block,
//! then align what is left on either side of it. When the second sequence
//! has 200 or more items, elements occurring in more than 1% of it are not
//! used to seed matches.

use std::collections::HashMap;
use std::hash::Hash;

/// Edit operation over `a[i1..i2]` and `b[j1..j2]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Replace,
    Delete,
    Insert,
    Equal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: Tag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Block {
    i: usize,
    j: usize,
    size: usize,
}

const AUTOJUNK_MIN_LEN: usize = 200;

pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, item) in b.iter().enumerate() {
            b2j.entry(item).or_default().push(j);
        }
        if b.len() >= AUTOJUNK_MIN_LEN {
            let threshold = b.len() / 100 + 1;
            b2j.retain(|_, indices| indices.len() <= threshold);
        }
        Self { a, b, b2j }
    }

    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(indices) = self.b2j.get(&self.a[i]) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Extend across elements that were excluded from seeding.
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }
        Block {
            i: besti,
            j: bestj,
            size: bestsize,
        }
    }

    fn matching_blocks(&self) -> Vec<Block> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            if alo < block.i && blo < block.j {
                queue.push((alo, block.i, blo, block.j));
            }
            if block.i + block.size < ahi && block.j + block.size < bhi {
                queue.push((block.i + block.size, ahi, block.j + block.size, bhi));
            }
            blocks.push(block);
        }
        blocks.sort();

        let mut collapsed = Vec::with_capacity(blocks.len() + 1);
        let mut current = Block { i: 0, j: 0, size: 0 };
        for block in blocks {
            if current.i + current.size == block.i && current.j + current.size == block.j {
                current.size += block.size;
            } else {
                if current.size > 0 {
                    collapsed.push(current);
                }
                current = block;
            }
        }
        if current.size > 0 {
            collapsed.push(current);
        }
        collapsed.push(Block {
            i: la,
            j: lb,
            size: 0,
        });
        collapsed
    }

    pub fn opcodes(&self) -> Vec<Opcode> {
        let (mut i, mut j) = (0, 0);
        let mut ops = Vec::new();
        for block in self.matching_blocks() {
            let tag = match (i < block.i, j < block.j) {
                (true, true) => Some(Tag::Replace),
                (true, false) => Some(Tag::Delete),
                (false, true) => Some(Tag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                ops.push(Opcode {
                    tag,
                    i1: i,
                    i2: block.i,
                    j1: j,
                    j2: block.j,
                });
            }
            i = block.i + block.size;
            j = block.j + block.size;
            if block.size > 0 {
                ops.push(Opcode {
                    tag: Tag::Equal,
                    i1: block.i,
                    i2: i,
                    j1: block.j,
                    j2: j,
                });
            }
        }
        ops
    }

    /// Similarity in `[0, 1]`: twice the matched length over the total length.
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matched: usize = self.matching_blocks().iter().map(|b| b.size).sum();
        2.0 * matched as f64 / total as f64
    }
}

/// Character-level similarity of two strings.
pub fn string_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    SequenceMatcher::new(&a, &b).ratio()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(a: &str, b: &str) -> Vec<(Tag, usize, usize, usize, usize)> {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        SequenceMatcher::new(&a, &b)
            .opcodes()
            .into_iter()
            .map(|op| (op.tag, op.i1, op.i2, op.j1, op.j2))
            .collect()
    }

    #[test]
    fn test_opcodes_classic_example() {
        assert_eq!(
            tags("qabxcd", "abycdf"),
            vec![
                (Tag::Delete, 0, 1, 0, 0),
                (Tag::Equal, 1, 3, 0, 2),
                (Tag::Replace, 3, 4, 2, 3),
                (Tag::Equal, 4, 6, 3, 5),
                (Tag::Insert, 6, 6, 5, 6),
            ]
        );
    }

    #[test]
    fn test_opcodes_empty_inputs() {
        assert!(tags("", "").is_empty());
        assert_eq!(tags("", "ab"), vec![(Tag::Insert, 0, 0, 0, 2)]);
        assert_eq!(tags("ab", ""), vec![(Tag::Delete, 0, 2, 0, 0)]);
    }

    #[test]
    fn test_string_ratio() {
        assert_eq!(string_ratio("aaax", "aaaa"), 0.75);
        assert_eq!(string_ratio("bbyy", "bbbb"), 0.5);
        assert_eq!(string_ratio("", ""), 1.0);
        assert_eq!(string_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_popular_elements_still_extend_matches() {
        let a: Vec<u32> = (0..300).map(|i| i % 2).collect();
        let b = a.clone();
        let ops = SequenceMatcher::new(&a, &b).opcodes();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].tag, Tag::Equal);
    }
}
